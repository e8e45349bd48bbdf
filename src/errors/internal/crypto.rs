use thiserror::Error;

/// Cryptographic operation failed (hashing, verification setup)
#[derive(Error, Debug)]
#[error("Crypto error: {operation} failed: {message}")]
pub struct CryptoError {
    pub operation: &'static str,
    pub message: String,
}

impl CryptoError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        CryptoError {
            operation,
            message: message.into(),
        }
    }
}
