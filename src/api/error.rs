//! API Error Taxonomy
//!
//! Every remote-call failure is classified into one of these variants
//! before it reaches a synchronizer. Encoding and decoding problems
//! become typed errors; they never panic the caller.

use serde::{Deserialize, Serialize};

/// Result type for remote API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Classified remote-call failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiError {
    /// The request body could not be JSON-encoded
    Encoding(String),
    /// The response body could not be decoded into the expected type
    Decoding(String),
    /// Non-success status with no structured error body
    InvalidResponse(u16),
    /// Non-success status carrying a structured server message
    Server(String),
    /// Transport-level failure (DNS, connect, timeout)
    Network(String),
    /// An authenticated call was attempted with no cached session
    NoSessionToken,
    Unknown,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Encoding(msg) => write!(f, "Request encoding failed: {}", msg),
            ApiError::Decoding(msg) => write!(f, "Response decoding failed: {}", msg),
            ApiError::InvalidResponse(status) => write!(f, "Invalid response: HTTP {}", status),
            ApiError::Server(msg) => write!(f, "Server error: {}", msg),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::NoSessionToken => write!(f, "No session token"),
            ApiError::Unknown => write!(f, "Unknown error"),
        }
    }
}

impl std::error::Error for ApiError {}
