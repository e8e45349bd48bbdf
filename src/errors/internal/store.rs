use thiserror::Error;

use super::CryptoError;

/// Data-access failures, classified before they leave the store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database query or write failed
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Password hashing or verification could not run
    #[error("Credential processing failed: {0}")]
    Credential(#[from] CryptoError),

    /// Row the caller asked for does not exist
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Write violated a uniqueness constraint
    #[error("Duplicate {what}")]
    Duplicate { what: &'static str },

    /// Stored column could not be decoded (bad JSON, unknown enum value)
    #[error("Malformed {column} column: {message}")]
    Corrupt {
        column: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn operation(operation: &str, source: sea_orm::DbErr) -> Self {
        StoreError::Operation {
            operation: operation.to_string(),
            source,
        }
    }

    /// Classify a write failure. Unique-key violations surface as
    /// `Duplicate`; SQLite says "UNIQUE constraint failed", Postgres says
    /// "duplicate key value violates unique constraint".
    pub fn classify_write(operation: &str, what: &'static str, source: sea_orm::DbErr) -> Self {
        let text = source.to_string();
        if text.contains("UNIQUE") || text.contains("duplicate key") {
            StoreError::Duplicate { what }
        } else {
            StoreError::operation(operation, source)
        }
    }
}
