use reqwest::StatusCode;

/// Client-side API error.
///
/// `Authentication` is the only variant with a side effect: by the time it
/// is returned the identity provider has already been asked to redirect to
/// sign-in.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, expired or rejected session token.
    #[error("auth: {0}")]
    Authentication(String),

    /// Transport failure (DNS, connect, reset).
    #[error("network: {0}")]
    Network(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Non-2xx response carrying the service's reason.
    #[error("HTTP {status}: {message}")]
    Service { status: u16, message: String },

    /// Input rejected before anything was sent.
    #[error("validation: {0}")]
    Validation(String),

    /// Response body did not match the expected shape.
    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }

    /// HTTP status for service errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Service { status, .. } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e)
        }
    }
}
