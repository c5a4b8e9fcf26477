use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::{collections::BTreeMap, fmt};
use url::Url;

pub const TOKEN_VAR: &str = "AZURE_DEVOPS_PAT";
pub const ORGANIZATION_VAR: &str = "AZURE_DEVOPS_ORG_NAME";
pub const SERVER_URL_VAR: &str = "MCP_SERVER_URL";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const ORGANIZATION_HEADER: &str = "x-ado-organization";

/// Command line arguments. Every connection setting falls back to its
/// environment variable.
#[derive(Debug, clap::Parser)]
#[command(version, about = "Smoke test an Azure DevOps MCP server over streamable HTTP")]
pub struct Args {
    /// Personal access token sent as a bearer token
    #[arg(long, env = TOKEN_VAR, default_value = "", hide_env_values = true)]
    pub token: String,

    /// Azure DevOps organization name
    #[arg(long, env = ORGANIZATION_VAR, default_value = "")]
    pub organization: String,

    /// Base url of the MCP server
    #[arg(long, env = SERVER_URL_VAR, default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    pub fn config(&self) -> Config {
        Config::new(&self.server_url)
            .with_token(&self.token)
            .with_organization(&self.organization)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub token: String,
    pub organization: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_url", &self.server_url)
            .field("token", &redact(&self.token))
            .field("organization", &self.organization)
            .finish()
    }
}

impl Config {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: String::new(),
            organization: String::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Token and organization must both be non-empty. Their contents,
    /// whitespace included, are left to the server.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(Error::MissingConfig(TOKEN_VAR));
        }
        if self.organization.is_empty() {
            return Err(Error::MissingConfig(ORGANIZATION_VAR));
        }
        Ok(())
    }

    /// The `/mcp` endpoint under the server url.
    pub fn endpoint(&self) -> Result<Url> {
        let base = self.server_url.trim_end_matches('/');
        let url = format!("{base}/mcp");
        Url::parse(&url).map_err(|source| Error::InvalidUrl { url, source })
    }

    pub fn connection(&self) -> Result<ConnectionConfig> {
        let mut headers = BTreeMap::new();
        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            format!("Bearer {}", self.token),
        );
        headers.insert(ORGANIZATION_HEADER.to_string(), self.organization.clone());

        Ok(ConnectionConfig {
            url: self.endpoint()?,
            transport: TransportKind::StreamableHttp,
            headers,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransportKind {
    #[serde(rename = "streamable-http")]
    StreamableHttp,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::StreamableHttp => "streamable-http",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to open one connection. Built once per scenario and
/// never mutated.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionConfig {
    pub url: Url,
    pub transport: TransportKind,
    #[serde(serialize_with = "serialize_headers")]
    pub headers: BTreeMap<String, String>,
}

impl ConnectionConfig {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url.as_str())
            .field("transport", &self.transport)
            .field("headers", &redacted_headers(&self.headers))
            .finish()
    }
}

/// Compact JSON with the credential redacted.
impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn serialize_headers<S: Serializer>(
    headers: &BTreeMap<String, String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    redacted_headers(headers).serialize(serializer)
}

fn redacted_headers(headers: &BTreeMap<String, String>) -> BTreeMap<&str, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
                match value.split_once(' ') {
                    Some((scheme, secret)) => format!("{scheme} {}", redact(secret)),
                    None => redact(value),
                }
            } else {
                value.clone()
            };
            (name.as_str(), value)
        })
        .collect()
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}
