use serde::{Deserialize, Serialize};

use crate::types::domain::Role;

/// JWT claims for locally-issued access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct LocalClaims {
    /// Subject (user id)
    pub sub: String,

    /// Platform role at issue time
    pub role: String,

    /// Scope grants
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Claims accepted from the hosted-provider token dialect.
///
/// Issuer, audience and expiry are enforced by the verifier's `Validation`;
/// only the fields read after verification appear here.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExternalClaims {
    pub sub: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Platform role, set as a custom claim by the provider hook
    #[serde(default)]
    pub role: Option<String>,

    /// Space-separated scope string (OAuth style)
    #[serde(default)]
    pub scope: Option<String>,

    pub exp: i64,
}

/// Which verifier in the chain accepted the credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDialect {
    Local,
    External,
}

impl TokenDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenDialect::Local => "local",
            TokenDialect::External => "external",
        }
    }
}

/// Outcome of successful bearer verification, independent of dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub role: Role,
    pub scopes: Vec<String>,
    pub dialect: TokenDialect,
}

impl VerifiedIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
