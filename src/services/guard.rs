use std::sync::Arc;

use crate::errors::{AccessDenied, ApiError};
use crate::stores::UserStore;
use crate::types::domain::Role;
use crate::types::internal::auth::VerifiedIdentity;

/// What an endpoint requires of the caller.
#[derive(Debug, Clone, Copy)]
pub enum AccessPolicy<'a> {
    /// Caller's role must be in the set
    Roles(&'a [Role]),
    /// Caller must own the resource
    Owner(&'a str),
    /// Either the role set or ownership admits the caller
    RolesOrOwner(&'a [Role], &'a str),
}

/// Pure policy check over a verified identity.
///
/// Admin passes every role set and bypasses all ownership checks. No I/O;
/// account-level gates live on [`AuthorizationGuard`].
pub fn authorize(
    identity: &VerifiedIdentity,
    policy: &AccessPolicy<'_>,
) -> Result<(), AccessDenied> {
    if identity.is_admin() {
        return Ok(());
    }

    let allowed = match policy {
        AccessPolicy::Roles(roles) => roles.contains(&identity.role),
        AccessPolicy::Owner(owner_id) => identity.subject == *owner_id,
        AccessPolicy::RolesOrOwner(roles, owner_id) => {
            roles.contains(&identity.role) || identity.subject == *owner_id
        }
    };

    if allowed {
        return Ok(());
    }

    let reason = match policy {
        AccessPolicy::Roles(roles) => format!("requires role {}", role_list(roles)),
        AccessPolicy::Owner(_) => "not the resource owner".to_string(),
        AccessPolicy::RolesOrOwner(roles, _) => {
            format!("requires role {} or resource ownership", role_list(roles))
        }
    };
    Err(AccessDenied::new(reason))
}

fn role_list(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Account-level gate applied at the HTTP boundary for role-gated
/// resources beyond self: the account row must still be active and
/// approved, whatever the token says.
pub struct AuthorizationGuard {
    users: Arc<UserStore>,
}

impl AuthorizationGuard {
    pub fn new(users: Arc<UserStore>) -> Self {
        Self { users }
    }

    pub async fn ensure_account_allowed(
        &self,
        identity: &VerifiedIdentity,
    ) -> Result<(), ApiError> {
        let user = self
            .users
            .find_by_id(&identity.subject)
            .await?
            .ok_or_else(|| ApiError::forbidden("Account no longer exists"))?;

        if !user.is_active {
            return Err(ApiError::forbidden("Account is suspended"));
        }
        if !user.is_approved {
            return Err(ApiError::forbidden("Account is pending approval"));
        }
        Ok(())
    }
}
