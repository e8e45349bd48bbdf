use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{SecretManager, Settings};
use crate::errors::StartupError;
use crate::services::assist::REQUEST_TIMEOUT;
use crate::services::guard::AuthorizationGuard;
use crate::services::matching::MatchWeights;
use crate::services::token_verifier::{ExternalVerifier, TokenVerifier};
use crate::services::{AssistClient, TokenGuard, TokenService};
use crate::stores::{AuditStore, ConnectionStore, IdeaStore, PreferenceStore, UserStore};

/// Centralized application state following the main-owned stores pattern
///
/// Everything here is created once in main.rs and shared across the API
/// structs; no store or service is constructed twice.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ├─ stores (user, idea, preference, connection, audit)
///   ├─ token_service (local dialect) → token_guard (local + external)
///   ├─ authorization_guard (account-level gate)
///   ├─ assist (provider picked from settings)
///   └─ match_weights (env-tunable, validated)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Settings,
    pub user_store: Arc<UserStore>,
    pub idea_store: Arc<IdeaStore>,
    pub preference_store: Arc<PreferenceStore>,
    pub connection_store: Arc<ConnectionStore>,
    pub audit_store: Arc<AuditStore>,
    pub token_service: Arc<TokenService>,
    pub token_guard: Arc<TokenGuard>,
    pub authorization_guard: Arc<AuthorizationGuard>,
    pub assist: AssistClient,
    pub match_weights: MatchWeights,
}

impl AppData {
    /// Initialize all application state
    ///
    /// The database must be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` when secrets are missing or malformed, match
    /// weights fail validation, no assist provider is usable in production,
    /// or the shared HTTP client cannot be built.
    pub async fn init(settings: Settings, db: DatabaseConnection) -> Result<Self, StartupError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secrets = SecretManager::init()?;
        tracing::debug!("Secret manager initialized");

        tracing::debug!("Creating stores...");
        let user_store = Arc::new(UserStore::new(db.clone(), secrets.pepper().to_string()));
        let idea_store = Arc::new(IdeaStore::new(db.clone()));
        let preference_store = Arc::new(PreferenceStore::new(db.clone()));
        let connection_store = Arc::new(ConnectionStore::new(db.clone()));
        let audit_store = Arc::new(AuditStore::new(db.clone()));
        tracing::debug!("Stores created");

        let token_service = Arc::new(TokenService::new(
            secrets.jwt_secret().to_string(),
            settings.token_lifetime_minutes,
        ));

        // One HTTP client shared by the JWKS fetcher and the assist providers
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        // Local dialect first; the external verifier joins only when configured
        let mut verifiers: Vec<Arc<dyn TokenVerifier>> =
            vec![token_service.clone() as Arc<dyn TokenVerifier>];
        if let Some(external) = &settings.external_auth {
            tracing::info!(issuer = %external.issuer, "external token dialect enabled");
            verifiers.push(Arc::new(ExternalVerifier::new(external, http.clone())));
        }
        let token_guard = Arc::new(TokenGuard::new(verifiers));

        let authorization_guard = Arc::new(AuthorizationGuard::new(user_store.clone()));

        let assist = AssistClient::from_settings(&settings, http)?;
        let match_weights = MatchWeights::from_env()?;

        tracing::info!("AppData initialization complete");

        Ok(Self {
            db,
            settings,
            user_store,
            idea_store,
            preference_store,
            connection_store,
            audit_store,
            token_service,
            token_guard,
            authorization_guard,
            assist,
            match_weights,
        })
    }
}
