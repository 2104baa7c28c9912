use thiserror::Error;

/// Reasons a signed token is rejected.
///
/// Every variant is treated the same by request handling: the caller
/// continues as anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidToken {
    /// The token is not three base64url segments of JSON.
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// The header names an algorithm other than HS256.
    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The signature does not match the header and payload.
    #[error("Invalid token signature")]
    Signature,

    /// The expiration time has passed.
    #[error("Token expired")]
    Expired,
}

/// Error that can occur while signing a token.
#[derive(Debug, Error)]
pub enum SignError {
    /// The claims could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
