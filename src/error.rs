pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required setting was empty. Carries the environment variable to set.
    #[error("missing required environment variable {0}")]
    MissingConfig(&'static str),

    #[error("invalid server url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to list tools")]
    ListTools(#[source] BoxError),

    #[error("tool '{0}' not found")]
    ToolNotFound(String),

    #[error("call to tool '{name}' failed")]
    CallTool {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The server answered the call but flagged the result as an error.
    #[error("tool '{name}' reported an error: {message}")]
    ToolFailed { name: String, message: String },

    #[error("failed to disconnect")]
    Disconnect(#[source] BoxError),
}

impl Error {
    /// Short name of the failure, printed next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingConfig(_) => "MissingConfig",
            Error::InvalidUrl { .. } => "InvalidUrl",
            Error::InvalidHeader(_) => "InvalidHeader",
            Error::HttpClient(_) => "HttpClient",
            Error::Connect { .. } => "Connect",
            Error::ListTools(_) => "ListTools",
            Error::ToolNotFound(_) => "ToolNotFound",
            Error::CallTool { .. } => "CallTool",
            Error::ToolFailed { .. } => "ToolFailed",
            Error::Disconnect(_) => "Disconnect",
        }
    }

    /// Whether the failure happened before any connection was attempted.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::MissingConfig(_) | Error::InvalidUrl { .. } | Error::InvalidHeader(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
