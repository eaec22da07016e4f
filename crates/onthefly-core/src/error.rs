use thiserror::Error;

/// Application-wide error types for onthefly.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream returned a non-success HTTP status.
    #[error("HTTP {status} from upstream")]
    FetchFailed { status: u16 },

    /// Request timed out before any response arrived.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error (DNS, TCP, TLS).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body could not be read (and too little of it was
    /// salvaged to be usable).
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Payload codec rejected the input.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// A required request parameter is absent.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Request body has the wrong shape (e.g. non-string payload).
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Configuration could not be read or validated.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

/// HTTP statuses that will not become fetchable by retrying:
/// access denied, missing, gone.
pub const PERMANENT_STATUSES: [u16; 3] = [403, 404, 410];

impl AppError {
    /// Returns true if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        match self {
            AppError::FetchFailed { status } => PERMANENT_STATUSES.contains(status),
            _ => false,
        }
    }

    /// Returns true if this error is transient and worth retrying.
    ///
    /// Timeouts, transport failures, and non-permanent upstream
    /// statuses all qualify; everything else (bad input, codec
    /// rejection, config) does not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Timeout(_) | AppError::NetworkError(_) | AppError::StreamError(_) => true,
            AppError::FetchFailed { status } => !PERMANENT_STATUSES.contains(status),
            _ => false,
        }
    }
}
