mod client;
pub mod config;
pub mod console;
mod error;
pub mod lifecycle;
pub mod report;
pub mod runner;
pub mod scenario;
mod session;
#[cfg(test)]
mod tests;

pub use client::{HttpConnector, McpSession};
pub use config::{Args, Config, ConnectionConfig, TransportKind};
pub use error::{BoxError, Error, Result};
pub use lifecycle::{Lifecycle, State};
pub use session::{
    Arguments, Connector, RemoteTool, Session, ToolDescriptor, find_tool, with_session,
};
