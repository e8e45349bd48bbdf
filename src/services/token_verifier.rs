use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::ExternalAuthSettings;
use crate::errors::TokenError;
use crate::services::token_service::TokenService;
use crate::types::domain::Role;
use crate::types::internal::auth::{ExternalClaims, TokenDialect, VerifiedIdentity};

/// How long a fetched provider key set is served before re-fetching.
pub const KEY_CACHE_TTL: Duration = Duration::from_secs(600);

/// One strategy for turning a bearer credential into a verified identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    fn dialect(&self) -> TokenDialect;
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenError>;
}

#[async_trait]
impl TokenVerifier for TokenService {
    fn dialect(&self) -> TokenDialect {
        TokenDialect::Local
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenError> {
        TokenService::verify(self, token)
    }
}

/// Single JSON Web Key as served by the provider's JWKS endpoint.
///
/// RSA (`kty=RSA`) and symmetric (`kty=oct`) keys are supported.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
    #[serde(default)]
    pub k: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

fn decoding_key_for(jwk: &Jwk, alg: Algorithm) -> Option<DecodingKey> {
    match (jwk.kty.as_str(), alg) {
        ("RSA", Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512) => {
            DecodingKey::from_rsa_components(jwk.n.as_deref()?, jwk.e.as_deref()?).ok()
        }
        ("oct", Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => {
            DecodingKey::from_base64_secret(jwk.k.as_deref()?).ok()
        }
        _ => None,
    }
}

struct KeyCache {
    keys: Vec<Jwk>,
    fetched_at: Option<Instant>,
}

/// Verifies the hosted-provider token dialect against the provider's
/// published key set.
///
/// Keys are cached for [`KEY_CACHE_TTL`]; a verification failure triggers
/// one forced re-fetch and a single retry, so freshly rotated keys are
/// picked up without waiting out the TTL.
pub struct ExternalVerifier {
    jwks_url: String,
    issuer: String,
    audience: Option<String>,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
    ttl: Duration,
}

impl ExternalVerifier {
    pub fn new(settings: &ExternalAuthSettings, http: reqwest::Client) -> Self {
        Self {
            jwks_url: settings.jwks_url.clone(),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            http,
            cache: RwLock::new(KeyCache {
                keys: Vec::new(),
                fetched_at: None,
            }),
            ttl: KEY_CACHE_TTL,
        }
    }

    /// Build a verifier over a fixed key set that is never re-fetched.
    pub fn with_static_keys(issuer: &str, audience: Option<&str>, keys: Vec<Jwk>) -> Self {
        Self {
            jwks_url: String::new(),
            issuer: issuer.to_string(),
            audience: audience.map(str::to_string),
            http: reqwest::Client::new(),
            cache: RwLock::new(KeyCache {
                keys,
                fetched_at: Some(Instant::now()),
            }),
            ttl: Duration::from_secs(60 * 60 * 24 * 365),
        }
    }

    async fn fetch_keys(&self) -> Result<Vec<Jwk>, TokenError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| TokenError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TokenError::KeyFetch(format!(
                "JWKS endpoint returned status {}",
                response.status()
            )));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| TokenError::KeyFetch(e.to_string()))?;

        Ok(set.keys)
    }

    async fn current_keys(&self, force_refresh: bool) -> Result<Vec<Jwk>, TokenError> {
        {
            let cache = self.cache.read().await;
            if !force_refresh {
                if let Some(fetched_at) = cache.fetched_at {
                    if fetched_at.elapsed() < self.ttl {
                        return Ok(cache.keys.clone());
                    }
                }
            }
        }

        // Static key sets have no endpoint to refresh from.
        if self.jwks_url.is_empty() {
            let cache = self.cache.read().await;
            return Ok(cache.keys.clone());
        }

        let keys = self.fetch_keys().await?;
        tracing::debug!(key_count = keys.len(), "refreshed provider key set");

        let mut cache = self.cache.write().await;
        cache.keys = keys.clone();
        cache.fetched_at = Some(Instant::now());
        Ok(keys)
    }

    fn verify_with_keys(
        &self,
        token: &str,
        header: &jsonwebtoken::Header,
        keys: &[Jwk],
    ) -> Result<VerifiedIdentity, TokenError> {
        let candidates: Vec<&Jwk> = match &header.kid {
            Some(kid) => keys
                .iter()
                .filter(|k| k.kid.as_deref() == Some(kid.as_str()))
                .collect(),
            None => keys.iter().collect(),
        };

        if candidates.is_empty() {
            return Err(TokenError::UnknownKey {
                kid: header.kid.clone(),
            });
        }

        let mut last_rejection: Option<TokenError> = None;
        for jwk in candidates {
            let Some(key) = decoding_key_for(jwk, header.alg) else {
                continue;
            };
            match self.decode_claims(token, &key, header.alg) {
                Ok(identity) => return Ok(identity),
                Err(TokenError::Expired) => return Err(TokenError::Expired),
                Err(e) => last_rejection = Some(e),
            }
        }

        Err(last_rejection.unwrap_or(TokenError::UnknownKey {
            kid: header.kid.clone(),
        }))
    }

    fn decode_claims(
        &self,
        token: &str,
        key: &DecodingKey,
        alg: Algorithm,
    ) -> Result<VerifiedIdentity, TokenError> {
        let mut validation = Validation::new(alg);
        validation.set_issuer(&[self.issuer.as_str()]);
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        let data = decode::<ExternalClaims>(token, key, &validation).map_err(|e| {
            if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) {
                TokenError::Expired
            } else {
                TokenError::rejected("external", e.to_string())
            }
        })?;

        let role_claim = data.claims.role.as_deref().unwrap_or_default();
        let role = Role::parse(role_claim).ok_or_else(|| {
            TokenError::rejected(
                "external",
                format!("missing or unknown role claim '{role_claim}'"),
            )
        })?;

        let scopes = data
            .claims
            .scope
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Ok(VerifiedIdentity {
            subject: data.claims.sub,
            role,
            scopes,
            dialect: TokenDialect::External,
        })
    }
}

#[async_trait]
impl TokenVerifier for ExternalVerifier {
    fn dialect(&self) -> TokenDialect {
        TokenDialect::External
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenError> {
        let header = decode_header(token)
            .map_err(|e| TokenError::rejected("external", format!("malformed header: {e}")))?;

        let supported = matches!(
            header.alg,
            Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::HS256
                | Algorithm::HS384
                | Algorithm::HS512
        );
        if !supported {
            return Err(TokenError::rejected(
                "external",
                format!("unsupported algorithm {:?}", header.alg),
            ));
        }

        let keys = self.current_keys(false).await?;
        match self.verify_with_keys(token, &header, &keys) {
            Ok(identity) => Ok(identity),
            Err(TokenError::Expired) => Err(TokenError::Expired),
            Err(_) => {
                // Grace for key rotation: one forced refresh, then retry once.
                let fresh = self.current_keys(true).await?;
                self.verify_with_keys(token, &header, &fresh)
            }
        }
    }
}

/// Ordered verification chain: local dialect first, external second.
///
/// First success wins; when every verifier rejects the credential the
/// caller gets a single opaque failure.
pub struct TokenGuard {
    verifiers: Vec<Arc<dyn TokenVerifier>>,
}

impl TokenGuard {
    pub fn new(verifiers: Vec<Arc<dyn TokenVerifier>>) -> Self {
        Self { verifiers }
    }

    pub async fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenError> {
        for verifier in &self.verifiers {
            match verifier.verify(token).await {
                Ok(identity) => {
                    tracing::debug!(
                        dialect = identity.dialect.as_str(),
                        subject = %identity.subject,
                        "token accepted"
                    );
                    return Ok(identity);
                }
                Err(e) => {
                    tracing::debug!(
                        dialect = verifier.dialect().as_str(),
                        error = %e,
                        "verifier rejected token"
                    );
                }
            }
        }
        Err(TokenError::Unverifiable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    // base64url-no-pad encoded symmetric key; the same string feeds both the
    // signing key and the JWK `k` field.
    const TEST_K: &str = "dGVzdC1leHRlcm5hbC1zZWNyZXQtMzItYnl0ZXMhISEh";
    const TEST_ISSUER: &str = "https://auth.example.com";

    fn oct_jwk(kid: &str) -> Jwk {
        Jwk {
            kty: "oct".to_string(),
            kid: Some(kid.to_string()),
            alg: Some("HS256".to_string()),
            n: None,
            e: None,
            k: Some(TEST_K.to_string()),
        }
    }

    fn mint_external(kid: Option<&str>, role: &str, exp_offset: i64, issuer: &str) -> String {
        let claims = serde_json::json!({
            "sub": "ext-user-9",
            "role": role,
            "scope": "api ideas:read",
            "exp": Utc::now().timestamp() + exp_offset,
            "iss": issuer,
        });
        let mut header = Header::new(Algorithm::HS256);
        header.kid = kid.map(str::to_string);
        encode(
            &header,
            &claims,
            &EncodingKey::from_base64_secret(TEST_K).unwrap(),
        )
        .unwrap()
    }

    fn static_verifier() -> ExternalVerifier {
        ExternalVerifier::with_static_keys(TEST_ISSUER, None, vec![oct_jwk("key-1")])
    }

    #[tokio::test]
    async fn accepts_provider_signed_token() {
        let verifier = static_verifier();
        let token = mint_external(Some("key-1"), "investor", 3600, TEST_ISSUER);

        let identity = verifier.verify(&token).await.unwrap();
        assert_eq!(identity.subject, "ext-user-9");
        assert_eq!(identity.role, Role::Investor);
        assert_eq!(
            identity.scopes,
            vec!["api".to_string(), "ideas:read".to_string()]
        );
        assert_eq!(identity.dialect, TokenDialect::External);
    }

    #[tokio::test]
    async fn rejects_foreign_issuer() {
        let verifier = static_verifier();
        let token = mint_external(Some("key-1"), "investor", 3600, "https://evil.example.com");

        assert!(matches!(
            verifier.verify(&token).await.unwrap_err(),
            TokenError::Rejected { .. }
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_kid() {
        let verifier = static_verifier();
        let token = mint_external(Some("rotated-away"), "investor", 3600, TEST_ISSUER);

        assert!(matches!(
            verifier.verify(&token).await.unwrap_err(),
            TokenError::UnknownKey { .. }
        ));
    }

    #[tokio::test]
    async fn reports_expired_tokens() {
        let verifier = static_verifier();
        let token = mint_external(Some("key-1"), "investor", -3600, TEST_ISSUER);

        assert!(matches!(
            verifier.verify(&token).await.unwrap_err(),
            TokenError::Expired
        ));
    }

    #[tokio::test]
    async fn rejects_missing_role_claim() {
        let verifier = static_verifier();
        let claims = serde_json::json!({
            "sub": "ext-user-9",
            "exp": Utc::now().timestamp() + 3600,
            "iss": TEST_ISSUER,
        });
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("key-1".to_string());
        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_base64_secret(TEST_K).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            verifier.verify(&token).await.unwrap_err(),
            TokenError::Rejected { .. }
        ));
    }

    #[tokio::test]
    async fn enforces_audience_when_configured() {
        let verifier = ExternalVerifier::with_static_keys(
            TEST_ISSUER,
            Some("venturelink-api"),
            vec![oct_jwk("key-1")],
        );

        let claims = serde_json::json!({
            "sub": "ext-user-9",
            "role": "investor",
            "aud": "venturelink-api",
            "exp": Utc::now().timestamp() + 3600,
            "iss": TEST_ISSUER,
        });
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("key-1".to_string());
        let signing_key = EncodingKey::from_base64_secret(TEST_K).unwrap();
        let good = encode(&header, &claims, &signing_key).unwrap();
        assert!(verifier.verify(&good).await.is_ok());

        let wrong_aud = serde_json::json!({
            "sub": "ext-user-9",
            "role": "investor",
            "aud": "someone-else",
            "exp": Utc::now().timestamp() + 3600,
            "iss": TEST_ISSUER,
        });
        let bad = encode(&header, &wrong_aud, &signing_key).unwrap();
        assert!(verifier.verify(&bad).await.is_err());
    }

    #[tokio::test]
    async fn chain_accepts_both_dialects_and_rejects_strangers() {
        let local = Arc::new(TokenService::new(
            "local-secret-key-minimum-32-characters!!".to_string(),
            60,
        ));
        let external = Arc::new(static_verifier());
        let guard = TokenGuard::new(vec![local.clone(), external]);

        let local_token = local
            .issue("local-user-1", Role::Innovator, vec!["api".to_string()])
            .unwrap();
        let identity = guard.verify(&local_token).await.unwrap();
        assert_eq!(identity.dialect, TokenDialect::Local);
        assert_eq!(identity.subject, "local-user-1");

        let external_token = mint_external(Some("key-1"), "hub", 3600, TEST_ISSUER);
        let identity = guard.verify(&external_token).await.unwrap();
        assert_eq!(identity.dialect, TokenDialect::External);
        assert_eq!(identity.role, Role::Hub);

        let stranger = TokenService::new(
            "some-other-secret-key-32-characters-long".to_string(),
            60,
        )
        .issue("intruder", Role::Admin, vec![])
        .unwrap();
        assert!(matches!(
            guard.verify(&stranger).await.unwrap_err(),
            TokenError::Unverifiable
        ));
    }
}
