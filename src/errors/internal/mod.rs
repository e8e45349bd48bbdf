// Internal error types, one module per concern.
// Not exposed via API - endpoints convert them to ApiError.

pub mod assist;
pub mod crypto;
pub mod guard;
pub mod matching;
pub mod startup;
pub mod store;
pub mod token;

pub use assist::AssistError;
pub use crypto::CryptoError;
pub use guard::AccessDenied;
pub use matching::MatchError;
pub use startup::StartupError;
pub use store::StoreError;
pub use token::TokenError;
