use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("failed to connect: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("http client error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connect(err)
        } else {
            Self::Http(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Failure of a single gateway operation.
///
/// Every variant carries the operation name so the failure can be attributed
/// without the caller keeping track of which call produced it.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failure: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("server rejected request with status {status}: {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        code: ErrorCode,
        message: String,
    },
    #[error("malformed response: {source}")]
    Malformed {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("session store failure: {source}")]
    Session {
        operation: &'static str,
        #[source]
        source: SessionError,
    },
}

impl GatewayError {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Transport { operation, .. }
            | Self::Rejected { operation, .. }
            | Self::Malformed { operation, .. }
            | Self::Encode { operation, .. }
            | Self::Session { operation, .. } => operation,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Rejected { code, .. } => *code,
            Self::Malformed { .. } | Self::Encode { .. } => ErrorCode::Validation,
            Self::Transport { .. } | Self::Session { .. } => ErrorCode::Unknown,
        }
    }

    /// True when the stored credential is missing, expired or refused.
    pub fn requires_reauth(&self) -> bool {
        matches!(self.code(), ErrorCode::Unauthorized)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
