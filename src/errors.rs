use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid state value. Must be 0, 1, or 2. Sent: {0}")]
    InvalidState(String),

    #[error("Only the authorized reviewer can change the status")]
    Forbidden,

    #[error("Document not found")]
    NotFound,

    #[error("Store failure: {0}")]
    StoreFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Status hint for the transport layer. Only a missing identity is
    /// distinguished; every other failure keeps the generic 500 contract.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            _ => 500,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
