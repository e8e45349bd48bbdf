use poem::Request;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use std::sync::Arc;

use crate::api::{Api, BearerAuth};
use crate::errors::ApiError;
use crate::services::guard::{authorize, AccessPolicy, AuthorizationGuard};
use crate::services::TokenGuard;
use crate::stores::{AuditStore, UserStore};
use crate::types::domain::Role;
use crate::types::dto::user::UserProfile;
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::auth::VerifiedIdentity;

/// Account administration API endpoints
pub struct AdminApi {
    users: Arc<UserStore>,
    tokens: Arc<TokenGuard>,
    guard: Arc<AuthorizationGuard>,
    audit: Arc<AuditStore>,
}

impl Api for AdminApi {}

impl AdminApi {
    /// Create a new AdminApi with the given stores and guards
    pub fn new(
        users: Arc<UserStore>,
        tokens: Arc<TokenGuard>,
        guard: Arc<AuthorizationGuard>,
        audit: Arc<AuditStore>,
    ) -> Self {
        Self {
            users,
            tokens,
            guard,
            audit,
        }
    }

    /// Verify the token, apply the account gate, and require the admin role
    async fn admin(&self, token: &str) -> Result<VerifiedIdentity, ApiError> {
        let identity = self.tokens.verify(token).await?;
        self.guard.ensure_account_allowed(&identity).await?;
        authorize(&identity, &AccessPolicy::Roles(&[Role::Admin]))?;
        Ok(identity)
    }

    /// Audit one moderation action against a target account
    async fn record_action(
        &self,
        event_type: EventType,
        actor: &VerifiedIdentity,
        target_id: &str,
        req: &Request,
    ) {
        self.audit
            .record(
                AuditEvent::new(event_type)
                    .actor(actor.subject.as_str())
                    .ip(self.extract_ip_address(req).map(|ip| ip.to_string()))
                    .detail("target_user", target_id),
            )
            .await;
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Account administration endpoints
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List accounts, newest first, optionally filtered by role
    #[oai(path = "/users", method = "get", tag = "AdminTags::Admin")]
    async fn list_users(
        &self,
        auth: BearerAuth,
        role: Query<Option<Role>>,
    ) -> Result<Json<Vec<UserProfile>>, ApiError> {
        self.admin(&auth.0.token).await?;

        let found = self.users.list_users(role.0).await?;
        Ok(Json(found.into_iter().map(UserProfile::from).collect()))
    }

    /// Approve a pending account for role-gated access
    #[oai(path = "/users/:id/approve", method = "post", tag = "AdminTags::Admin")]
    async fn approve_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<UserProfile>, ApiError> {
        let identity = self.admin(&auth.0.token).await?;

        let updated = self.users.approve(&id.0).await?;
        self.record_action(EventType::UserApproved, &identity, &updated.id, req)
            .await;

        Ok(Json(UserProfile::from(updated)))
    }

    /// Block an account so it can no longer log in or act
    #[oai(path = "/users/:id/block", method = "post", tag = "AdminTags::Admin")]
    async fn block_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<UserProfile>, ApiError> {
        let identity = self.admin(&auth.0.token).await?;

        let updated = self.users.block(&id.0).await?;
        self.record_action(EventType::UserBlocked, &identity, &updated.id, req)
            .await;

        Ok(Json(UserProfile::from(updated)))
    }

    /// Unblock an account, restoring its pre-suspension standing
    #[oai(path = "/users/:id/unblock", method = "post", tag = "AdminTags::Admin")]
    async fn unblock_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<UserProfile>, ApiError> {
        let identity = self.admin(&auth.0.token).await?;

        let updated = self.users.unblock(&id.0).await?;
        self.record_action(EventType::UserUnblocked, &identity, &updated.id, req)
            .await;

        Ok(Json(UserProfile::from(updated)))
    }
}
