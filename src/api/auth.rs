use poem::Request;
use poem_openapi::{
    payload::{Form, Json},
    OpenApi, Tags,
};
use std::sync::Arc;

use crate::api::{Api, BearerAuth};
use crate::errors::ApiError;
use crate::services::password::validate_password;
use crate::services::{TokenGuard, TokenService};
use crate::stores::user_store::NewUser;
use crate::stores::{AuditStore, UserStore};
use crate::types::db::user;
use crate::types::domain::Role;
use crate::types::dto::auth::{
    LoginFormRequest, LoginJsonRequest, RegisterRequest, TokenResponse, UpdateProfileRequest,
};
use crate::types::dto::user::UserProfile;
use crate::types::internal::audit::{AuditEvent, EventType};

/// Scopes stamped into tokens issued through password login.
const LOGIN_SCOPES: &[&str] = &["api"];

/// Authentication and profile API endpoints
pub struct AuthApi {
    users: Arc<UserStore>,
    tokens: Arc<TokenGuard>,
    token_service: Arc<TokenService>,
    audit: Arc<AuditStore>,
}

impl Api for AuthApi {}

impl AuthApi {
    /// Create a new AuthApi with the given store and token plumbing
    pub fn new(
        users: Arc<UserStore>,
        tokens: Arc<TokenGuard>,
        token_service: Arc<TokenService>,
        audit: Arc<AuditStore>,
    ) -> Self {
        Self {
            users,
            tokens,
            token_service,
            audit,
        }
    }

    /// Credential check and token issue shared by both login dialects
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        ip: Option<String>,
    ) -> Result<Json<TokenResponse>, ApiError> {
        // Verify credentials; unknown email and wrong password look the same
        let Some(found) = self.users.verify_credentials(email, password).await? else {
            self.audit
                .record(
                    AuditEvent::new(EventType::LoginFailure)
                        .ip(ip)
                        .detail("email", email),
                )
                .await;
            return Err(ApiError::invalid_credentials());
        };

        // Blocked accounts keep their password but lose the door
        if !found.is_active {
            self.audit
                .record(
                    AuditEvent::new(EventType::LoginFailure)
                        .actor(found.id.as_str())
                        .ip(ip)
                        .detail("reason", "suspended"),
                )
                .await;
            return Err(ApiError::forbidden("Account is suspended"));
        }

        let role = Role::parse(&found.role).ok_or_else(|| {
            ApiError::internal_error(format!("account carries unknown role '{}'", found.role))
        })?;
        let scopes = LOGIN_SCOPES.iter().map(|s| s.to_string()).collect();
        let access_token = self.token_service.issue(&found.id, role, scopes)?;

        self.audit
            .record(
                AuditEvent::new(EventType::LoginSuccess)
                    .actor(found.id.as_str())
                    .ip(ip),
            )
            .await;

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.lifetime_seconds(),
        }))
    }

    /// Resolve the bearer token to an account that may act on itself
    ///
    /// Pending accounts can read and edit their own profile; suspended
    /// accounts cannot.
    async fn current_user(&self, token: &str) -> Result<user::Model, ApiError> {
        let identity = self.tokens.verify(token).await?;

        let Some(found) = self.users.find_by_id(&identity.subject).await? else {
            return Err(ApiError::forbidden("Account no longer exists"));
        };
        if !found.is_active {
            return Err(ApiError::forbidden("Account is suspended"));
        }

        Ok(found)
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Registration, login, and profile endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account
    ///
    /// New accounts start pending until an administrator approves them.
    /// The admin role cannot be self-assigned.
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(
        &self,
        req: &Request,
        body: Json<RegisterRequest>,
    ) -> Result<Json<UserProfile>, ApiError> {
        let body = body.0;

        if body.role == Role::Admin {
            return Err(ApiError::invalid_argument(
                "Role must be one of: innovator, investor, hub",
            ));
        }

        // Policy-check the password before touching the store
        validate_password(&body.password)
            .map_err(|e| ApiError::invalid_argument(e.to_string()))?;

        let created = self
            .users
            .register(NewUser {
                email: body.email,
                display_name: body.display_name,
                role: body.role,
                password: body.password,
            })
            .await?;

        self.audit
            .record(
                AuditEvent::new(EventType::UserRegistered)
                    .actor(created.id.as_str())
                    .ip(self.extract_ip_address(req).map(|ip| ip.to_string()))
                    .detail("role", created.role.as_str()),
            )
            .await;

        Ok(Json(UserProfile::from(created)))
    }

    /// Login with an OAuth2 password-grant form
    ///
    /// The `username` form field carries the account email.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Form<LoginFormRequest>,
    ) -> Result<Json<TokenResponse>, ApiError> {
        let ip = self.extract_ip_address(req).map(|ip| ip.to_string());
        self.authenticate(&body.0.username, &body.0.password, ip)
            .await
    }

    /// Login with a JSON body
    #[oai(path = "/login-json", method = "post", tag = "AuthTags::Authentication")]
    async fn login_json(
        &self,
        req: &Request,
        body: Json<LoginJsonRequest>,
    ) -> Result<Json<TokenResponse>, ApiError> {
        let ip = self.extract_ip_address(req).map(|ip| ip.to_string());
        self.authenticate(&body.0.email, &body.0.password, ip).await
    }

    /// Return the authenticated account's profile
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<UserProfile>, ApiError> {
        let found = self.current_user(&auth.0.token).await?;
        Ok(Json(UserProfile::from(found)))
    }

    /// Update the authenticated account's profile
    ///
    /// Email and role are immutable; omitted fields are left unchanged.
    #[oai(path = "/me", method = "put", tag = "AuthTags::Authentication")]
    async fn update_me(
        &self,
        auth: BearerAuth,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UserProfile>, ApiError> {
        let found = self.current_user(&auth.0.token).await?;
        let body = body.0;

        if let Some(password) = body.password.as_deref() {
            validate_password(password).map_err(|e| ApiError::invalid_argument(e.to_string()))?;
        }

        let updated = self
            .users
            .update_profile(&found.id, body.display_name, body.password)
            .await?;

        Ok(Json(UserProfile::from(updated)))
    }
}
