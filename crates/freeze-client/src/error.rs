use thiserror::Error;

/// Failures of the freeze-status HTTP API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API key was rejected; retrying will not help until it is changed
    #[error(
        "API key is invalid or unauthorized ({0}). Please check your API key in the extension settings."
    )]
    Unauthorized(u16),

    #[error("API returned {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
