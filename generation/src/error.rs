//! Error types for the generation boundary.

use thiserror::Error;

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Classified failures of the generation call.
///
/// Every variant is fatal for the current operation; none is silently
/// recovered. The classification lets callers tell configuration errors
/// (authentication, permission, endpoint) from transient ones (timeout,
/// transport).
#[derive(Error, Debug)]
pub enum GenerationError {
    /// 401 from the endpoint: the token is missing or invalid.
    #[error("authentication failed (401) at {endpoint}: {detail}")]
    Authentication { endpoint: String, detail: String },

    /// 403 from the endpoint: the token lacks the required permissions.
    #[error("access denied (403) at {endpoint}: {detail}")]
    PermissionDenied { endpoint: String, detail: String },

    /// 404 from the endpoint: the URL or model path is wrong.
    #[error("endpoint not found (404): {endpoint}: {detail}")]
    EndpointNotFound { endpoint: String, detail: String },

    /// The request exceeded the configured timeout.
    #[error("timeout contacting {endpoint}")]
    Timeout { endpoint: String },

    /// Connection-level failure (DNS, TLS, refused, reset).
    #[error("transport error contacting {endpoint}: {detail}")]
    Transport { endpoint: String, detail: String },

    /// The endpoint answered 2xx but the body was not the expected shape.
    #[error("malformed response from {endpoint}: {detail}")]
    MalformedResponse { endpoint: String, detail: String },

    /// Any other non-success status.
    #[error("API error {status} from {endpoint}: {detail}")]
    Api {
        status: u16,
        endpoint: String,
        detail: String,
    },
}
