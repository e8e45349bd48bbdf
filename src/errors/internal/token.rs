use thiserror::Error;

/// Why a single verifier, or the whole chain, rejected a credential
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signature, structure, or claim validation failed for one dialect
    #[error("{dialect} verifier rejected token: {reason}")]
    Rejected {
        dialect: &'static str,
        reason: String,
    },

    /// Token validated structurally but is past its expiry
    #[error("token expired")]
    Expired,

    /// No key in the provider key set could verify the token
    #[error("no usable verification key (kid: {kid:?})")]
    UnknownKey { kid: Option<String> },

    /// Provider key set could not be fetched
    #[error("key set fetch failed: {0}")]
    KeyFetch(String),

    /// Every verifier in the chain rejected the credential
    #[error("token rejected by all verifiers")]
    Unverifiable,
}

impl TokenError {
    pub fn rejected(dialect: &'static str, reason: impl Into<String>) -> Self {
        TokenError::Rejected {
            dialect,
            reason: reason.into(),
        }
    }
}
