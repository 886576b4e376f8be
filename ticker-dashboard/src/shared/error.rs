use thiserror::Error;

/// All errors generated while fetching a dashboard payload.
///
/// Carries rendered messages instead of the source errors so outcomes can be
/// cloned into the dashboard state and compared in tests.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded with HTTP {0}")]
    Status(u16),

    #[error("failed to read payload file: {0}")]
    Io(String),

    #[error("malformed payload: {0}")]
    Decode(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("invalid payload source: {0}")]
    Source(String),
}

impl FetchError {
    /// Determine if the error is likely to clear on the next poll without the
    /// payload producer changing anything.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::Io(_) => true,
            FetchError::Status(status) => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::Status(status.as_u16()),
            None if value.is_decode() => Self::Decode(value.to_string()),
            None => Self::Transport(value.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}
