use crate::{
    ConnectionConfig, Error, Result,
    lifecycle::{Lifecycle, State},
};
use serde_json::{Map, Value};
use std::future::Future;

/// Tool call arguments, in insertion order.
pub type Arguments = Map<String, Value>;

/// A tool as advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: Option<String>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Binds the descriptor to the session it was listed from.
    pub fn bind<'s, S: Session>(&'s self, session: &'s S) -> RemoteTool<'s, S> {
        RemoteTool {
            descriptor: self,
            session,
        }
    }
}

/// A named tool that can be invoked through its session.
pub struct RemoteTool<'s, S> {
    descriptor: &'s ToolDescriptor,
    session: &'s S,
}

impl<S: Session> RemoteTool<'_, S> {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub async fn invoke(&self, args: Arguments) -> Result<Value> {
        self.session.call_tool(&self.descriptor.name, args).await
    }
}

/// Opens connections to a tool server.
pub trait Connector {
    type Session: Session;

    fn connect(&self, config: &ConnectionConfig) -> impl Future<Output = Result<Self::Session>>;
}

/// An open connection to a tool server.
pub trait Session {
    fn list_tools(&self) -> impl Future<Output = Result<Vec<ToolDescriptor>>>;

    fn call_tool(&self, name: &str, args: Arguments) -> impl Future<Output = Result<Value>>;

    /// Ends the connection. Consumes the session so it cannot be closed twice.
    fn close(self) -> impl Future<Output = Result<()>>;
}

/// Finds `name` among `tools` and binds it to `session`.
pub fn find_tool<'s, S: Session>(
    tools: &'s [ToolDescriptor],
    session: &'s S,
    name: &str,
) -> Result<RemoteTool<'s, S>> {
    tools
        .iter()
        .find(|tool| tool.name == name)
        .map(|tool| tool.bind(session))
        .ok_or_else(|| Error::ToolNotFound(name.to_string()))
}

/// Connects, runs `body` against the session and always closes it
/// afterwards, exactly once.
///
/// An error from `body` wins over an error from closing. A close failure
/// after a successful body fails the whole scope.
pub async fn with_session<C, T, F>(
    connector: &C,
    config: &ConnectionConfig,
    lifecycle: &mut Lifecycle,
    body: F,
) -> Result<T>
where
    C: Connector,
    F: AsyncFnOnce(&C::Session, &mut Lifecycle) -> Result<T>,
{
    lifecycle.advance(State::Connecting);
    let session = match connector.connect(config).await {
        Ok(session) => session,
        Err(err) => {
            lifecycle.advance(State::Errored);
            return Err(err);
        }
    };
    lifecycle.advance(State::Connected);

    let result = body(&session, &mut *lifecycle).await;
    if result.is_err() {
        lifecycle.advance(State::Errored);
    }

    lifecycle.advance(State::Disconnecting);
    let closed = session.close().await;
    lifecycle.advance(State::Disconnected);

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            tracing::warn!(error = %close_err, "failed to close session after error");
            Err(err)
        }
        (Ok(_), Err(close_err)) => Err(close_err),
    }
}
