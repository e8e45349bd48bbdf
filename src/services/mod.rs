// Services layer - Business logic and orchestration
pub mod assist;
pub mod guard;
pub mod matching;
pub mod password;
pub mod token_service;
pub mod token_verifier;

pub use assist::AssistClient;
pub use guard::{authorize, AccessPolicy, AuthorizationGuard};
pub use token_service::TokenService;
pub use token_verifier::{ExternalVerifier, TokenGuard, TokenVerifier};
