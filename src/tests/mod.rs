//! Scenario tests against a mock connector and an in-process MCP server.

mod end_to_end;

use crate::{
    Arguments, Config, ConnectionConfig, Connector, Error, Result, Session, ToolDescriptor,
    console::Console, scenario::Scenario,
};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

pub use server::TestServer;

pub const TOKEN: &str = "test-pat";
pub const ORGANIZATION: &str = "contoso";

pub fn config(server_url: &str) -> Config {
    Config::new(server_url)
        .with_token(TOKEN)
        .with_organization(ORGANIZATION)
}

/// Runs one scenario against `connector`, capturing what it prints.
pub async fn run<C: Connector>(scenario: Scenario, connector: &C, config: &Config) -> (bool, String) {
    let mut console = Console::plain(Vec::new());
    let passed = scenario.run(connector, config, &mut console).await;
    let output = String::from_utf8(console.into_inner()).unwrap();
    (passed, output)
}

/// Which mock operations fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub connect: bool,
    pub list: bool,
    pub call: bool,
    pub close: bool,
}

/// Counts what the scenarios did to the mock.
#[derive(Debug, Default)]
pub struct Stats {
    connects: AtomicUsize,
    lists: AtomicUsize,
    closes: AtomicUsize,
    calls: Mutex<Vec<(String, Arguments)>>,
}

impl Stats {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(String, Arguments)> {
        self.calls.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    tools: Vec<String>,
    responses: HashMap<String, Value>,
    failures: Failures,
    stats: Arc<Stats>,
}

impl MockConnector {
    pub fn new<'a>(tools: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            tools: tools.into_iter().map(str::to_owned).collect(),
            ..Default::default()
        }
    }

    pub fn with_response(mut self, tool: &str, value: Value) -> Self {
        self.responses.insert(tool.to_string(), value);
        self
    }

    pub fn failing(mut self, failures: Failures) -> Self {
        self.failures = failures;
        self
    }

    pub fn stats(&self) -> Arc<Stats> {
        self.stats.clone()
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    async fn connect(&self, config: &ConnectionConfig) -> Result<MockSession> {
        self.stats.connects.fetch_add(1, Ordering::SeqCst);
        if self.failures.connect {
            return Err(Error::Connect {
                url: config.url.to_string(),
                source: "connection refused".into(),
            });
        }
        Ok(MockSession {
            connector: self.clone(),
        })
    }
}

pub struct MockSession {
    connector: MockConnector,
}

impl Session for MockSession {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let connector = &self.connector;
        connector.stats.lists.fetch_add(1, Ordering::SeqCst);
        if connector.failures.list {
            return Err(Error::ListTools("stream closed".into()));
        }
        Ok(connector
            .tools
            .iter()
            .map(|name| ToolDescriptor::new(name.as_str()))
            .collect())
    }

    async fn call_tool(&self, name: &str, args: Arguments) -> Result<Value> {
        let connector = &self.connector;
        connector
            .stats
            .calls
            .lock()
            .unwrap()
            .push((name.to_string(), args));
        if connector.failures.call {
            return Err(Error::CallTool {
                name: name.to_string(),
                source: "internal server error".into(),
            });
        }
        Ok(connector.responses.get(name).cloned().unwrap_or(Value::Null))
    }

    async fn close(self) -> Result<()> {
        let connector = &self.connector;
        connector.stats.closes.fetch_add(1, Ordering::SeqCst);
        if connector.failures.close {
            return Err(Error::Disconnect("session already gone".into()));
        }
        Ok(())
    }
}
