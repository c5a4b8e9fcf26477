use crate::{
    ConnectionConfig, Error, Result, TransportKind,
    session::{Arguments, Connector, Session, ToolDescriptor},
};
use http::{HeaderMap, HeaderName, HeaderValue, header::AUTHORIZATION};
use rmcp::{
    RoleClient, ServiceExt,
    model::{CallToolRequestParam, ClientCapabilities, ClientInfo, Implementation},
    service::RunningService,
    transport::{
        StreamableHttpClientTransport, streamable_http_client::StreamableHttpClientTransportConfig,
    },
};
use serde_json::Value;

/// Connects to MCP servers over the transport named in the connection
/// config.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector;

impl HttpConnector {
    pub fn new() -> Self {
        Self
    }

    fn http_client(config: &ConnectionConfig) -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header = HeaderName::try_from(name.as_str())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            let mut value = HeaderValue::try_from(value.as_str())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            if header == AUTHORIZATION {
                value.set_sensitive(true);
            }
            headers.insert(header, value);
        }

        reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(Error::HttpClient)
    }
}

impl Connector for HttpConnector {
    type Session = McpSession;

    async fn connect(&self, config: &ConnectionConfig) -> Result<McpSession> {
        let url = config.url.to_string();
        tracing::debug!(%url, transport = %config.transport, "connecting");

        let transport = match config.transport {
            TransportKind::StreamableHttp => StreamableHttpClientTransport::with_client(
                Self::http_client(config)?,
                StreamableHttpClientTransportConfig::with_uri(url.as_str()),
            ),
        };

        let client_info = ClientInfo {
            protocol_version: Default::default(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation::from_build_env(),
        };

        let service = client_info
            .serve(transport)
            .await
            .inspect_err(|err| tracing::debug!(%url, error = ?err, "connect failed"))
            .map_err(|err| Error::Connect {
                url: url.clone(),
                source: Box::new(err),
            })?;

        if let Some(info) = service.peer_info() {
            tracing::debug!(
                server = %info.server_info.name,
                version = %info.server_info.version,
                "connected"
            );
        }

        Ok(McpSession { service })
    }
}

/// A live MCP client session.
pub struct McpSession {
    service: RunningService<RoleClient, ClientInfo>,
}

impl Session for McpSession {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let tools = self
            .service
            .list_all_tools()
            .await
            .map_err(|err| Error::ListTools(Box::new(err)))?;
        tracing::debug!(count = tools.len(), "listed tools");

        Ok(tools
            .into_iter()
            .map(|tool| ToolDescriptor {
                name: tool.name.to_string(),
                description: tool.description.as_deref().map(str::to_owned),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, args: Arguments) -> Result<Value> {
        tracing::debug!(tool = name, "calling tool");
        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(args),
            })
            .await
            .map_err(|err| Error::CallTool {
                name: name.to_string(),
                source: Box::new(err),
            })?;

        let result = serde_json::to_value(result).map_err(|err| Error::CallTool {
            name: name.to_string(),
            source: Box::new(err),
        })?;
        tool_output(name, result)
    }

    async fn close(self) -> Result<()> {
        let reason = self
            .service
            .cancel()
            .await
            .map_err(|err| Error::Disconnect(Box::new(err)))?;
        tracing::debug!(?reason, "disconnected");
        Ok(())
    }
}

/// Turns a serialized `CallToolResult` into the value the tool produced.
///
/// Structured content is preferred. Otherwise text items are decoded as
/// JSON where possible: one item is returned as is, several become an
/// array, none becomes `null`.
pub(crate) fn tool_output(name: &str, result: Value) -> Result<Value> {
    let mut items: Vec<Value> = result
        .get("content")
        .and_then(Value::as_array)
        .map(|content| content.iter().map(content_value).collect())
        .unwrap_or_default();

    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        let message = items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        return Err(Error::ToolFailed {
            name: name.to_string(),
            message,
        });
    }

    if let Some(structured) = result.get("structuredContent").filter(|v| !v.is_null()) {
        return Ok(structured.clone());
    }

    Ok(match items.len() {
        0 => Value::Null,
        1 => items.remove(0),
        _ => Value::Array(items),
    })
}

fn content_value(item: &Value) -> Value {
    match item.get("text").and_then(Value::as_str) {
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.into())),
        None => item.clone(),
    }
}
