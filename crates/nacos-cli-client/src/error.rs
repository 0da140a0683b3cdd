//! Client error types for the Nacos CLI client

/// Coarse failure category, for callers that branch on the kind of failure
/// rather than on its details.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Authentication,
    Application,
    ProtocolMismatch,
    Configuration,
}

/// Error type for Nacos client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth failed: {0}")]
    AuthFailed(String),

    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("server returned error: code={code}, message={message}")]
    ServerError { code: i32, message: String },

    #[error("unexpected response shape: {0}")]
    ProtocolMismatch(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::AuthFailed(_) => ErrorKind::Authentication,
            Self::RequestFailed { .. } | Self::ServerError { .. } => ErrorKind::Application,
            Self::ProtocolMismatch(_) => ErrorKind::ProtocolMismatch,
            Self::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }

    /// Whether the server answered that the endpoint does not exist.
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::RequestFailed { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
