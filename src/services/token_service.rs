use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::errors::{CryptoError, TokenError};
use crate::types::domain::Role;
use crate::types::internal::auth::{LocalClaims, TokenDialect, VerifiedIdentity};

/// Issuer claim stamped into locally-issued tokens.
pub const LOCAL_ISSUER: &str = "venturelink";

/// Issues and verifies the locally-signed token dialect (HS256).
pub struct TokenService {
    jwt_secret: String,
    lifetime_minutes: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String, lifetime_minutes: i64) -> Self {
        Self {
            jwt_secret,
            lifetime_minutes,
        }
    }

    /// Issue a signed access token for the given user.
    ///
    /// # Arguments
    /// * `user_id` - Subject embedded in the token
    /// * `role` - Platform role at issue time
    /// * `scopes` - Scope grants carried by the token
    ///
    /// # Returns
    /// * `Result<String, CryptoError>` - The encoded JWT or an error
    pub fn issue(
        &self,
        user_id: &str,
        role: Role,
        scopes: Vec<String>,
    ) -> Result<String, CryptoError> {
        let now = Utc::now().timestamp();
        let claims = LocalClaims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            scopes,
            iss: LOCAL_ISSUER.to_string(),
            exp: now + self.lifetime_minutes * 60,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| CryptoError::new("encode_jwt", e.to_string()))
    }

    /// Verify a locally-issued token and extract the identity.
    ///
    /// Checks signature, expiry and issuer. Expired tokens are reported
    /// separately so the chain can log them distinctly.
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[LOCAL_ISSUER]);

        let data = decode::<LocalClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) {
                TokenError::Expired
            } else {
                TokenError::rejected("local", e.to_string())
            }
        })?;

        let role = Role::parse(&data.claims.role).ok_or_else(|| {
            TokenError::rejected("local", format!("unknown role claim '{}'", data.claims.role))
        })?;

        Ok(VerifiedIdentity {
            subject: data.claims.sub,
            role,
            scopes: data.claims.scopes,
            dialect: TokenDialect::Local,
        })
    }

    /// Token lifetime in seconds, reported to clients as `expires_in`.
    pub fn lifetime_seconds(&self) -> i64 {
        self.lifetime_minutes * 60
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("lifetime_minutes", &self.lifetime_minutes)
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenService {{ lifetime: {}min }}", self.lifetime_minutes)
    }
}
