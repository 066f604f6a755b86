use thiserror::Error;

/// Failure of a backend request
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never got an HTTP response
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    /// A 2xx payload that does not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
