// Errors layer - Error type definitions
pub mod api;
pub mod internal;

// Re-exports for convenience
pub use api::{ApiError, ErrorBody};
pub use internal::{
    AccessDenied, AssistError, CryptoError, MatchError, StartupError, StoreError, TokenError,
};
