use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::guard::{authorize, AccessPolicy, AuthorizationGuard};
use crate::services::TokenGuard;
use crate::stores::{ConnectionStore, IdeaStore};
use crate::types::domain::{ConnectionStatus, IdeaVisibility, Role};
use crate::types::dto::connections::{
    ConnectionAction, ConnectionResponse, CreateConnectionRequest, RespondConnectionRequest,
};
use crate::types::internal::auth::VerifiedIdentity;

/// Investor-to-founder connection API endpoints
pub struct ConnectionsApi {
    connections: Arc<ConnectionStore>,
    ideas: Arc<IdeaStore>,
    tokens: Arc<TokenGuard>,
    guard: Arc<AuthorizationGuard>,
}

impl ConnectionsApi {
    /// Create a new ConnectionsApi with the given stores and guards
    pub fn new(
        connections: Arc<ConnectionStore>,
        ideas: Arc<IdeaStore>,
        tokens: Arc<TokenGuard>,
        guard: Arc<AuthorizationGuard>,
    ) -> Self {
        Self {
            connections,
            ideas,
            tokens,
            guard,
        }
    }

    /// Verify the token and apply the account-level gate
    async fn authenticated(&self, token: &str) -> Result<VerifiedIdentity, ApiError> {
        let identity = self.tokens.verify(token).await?;
        self.guard.ensure_account_allowed(&identity).await?;
        Ok(identity)
    }
}

/// API tags for connection endpoints
#[derive(Tags)]
enum ConnectionTags {
    /// Investor-to-founder connection endpoints
    Connections,
}

#[OpenApi(prefix_path = "/connections")]
impl ConnectionsApi {
    /// Open a connection request against an idea
    ///
    /// Investors only. The target idea must be discoverable by the caller;
    /// private ideas answer 404 so their existence is not leaked. One
    /// request per investor and idea.
    #[oai(path = "/", method = "post", tag = "ConnectionTags::Connections")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateConnectionRequest>,
    ) -> Result<Json<ConnectionResponse>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;
        authorize(&identity, &AccessPolicy::Roles(&[Role::Investor]))?;

        let body = body.0;
        let Some(target) = self.ideas.find_by_id(&body.idea_id).await? else {
            return Err(ApiError::not_found("Idea"));
        };

        // Unknown stored visibility fails closed, same as the idea surface
        let discoverable = IdeaVisibility::parse(&target.visibility)
            .map(|v| v.is_discoverable())
            .unwrap_or(false);
        if !discoverable && !identity.is_admin() {
            return Err(ApiError::not_found("Idea"));
        }

        let created = self
            .connections
            .create(&identity.subject, &target.id, body.message)
            .await?;

        Ok(Json(ConnectionResponse::from(created)))
    }

    /// List the caller's connection requests
    ///
    /// Investors see the requests they sent; founders and hubs see the
    /// requests targeting their ideas.
    #[oai(path = "/", method = "get", tag = "ConnectionTags::Connections")]
    async fn list(&self, auth: BearerAuth) -> Result<Json<Vec<ConnectionResponse>>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;

        let found = match identity.role {
            Role::Investor => self.connections.list_for_investor(&identity.subject).await?,
            _ => self.connections.list_for_owner(&identity.subject).await?,
        };

        Ok(Json(found.into_iter().map(ConnectionResponse::from).collect()))
    }

    /// Accept or decline a pending connection request
    ///
    /// Only the owner of the targeted idea (or an admin) may respond, and
    /// only while the request is still pending.
    #[oai(path = "/:id/respond", method = "post", tag = "ConnectionTags::Connections")]
    async fn respond(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<RespondConnectionRequest>,
    ) -> Result<Json<ConnectionResponse>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;

        let Some(request) = self.connections.find_by_id(&id.0).await? else {
            return Err(ApiError::not_found("Connection request"));
        };
        let Some(target) = self.ideas.find_by_id(&request.idea_id).await? else {
            return Err(ApiError::not_found("Idea"));
        };
        authorize(&identity, &AccessPolicy::Owner(&target.owner_id))?;

        if request.status != ConnectionStatus::Pending.as_str() {
            return Err(ApiError::conflict(
                "Connection request has already been resolved",
            ));
        }

        let status = match body.0.action {
            ConnectionAction::Accept => ConnectionStatus::Accepted,
            ConnectionAction::Decline => ConnectionStatus::Declined,
        };
        let updated = self.connections.set_status(&request.id, status).await?;

        Ok(Json(ConnectionResponse::from(updated)))
    }
}
