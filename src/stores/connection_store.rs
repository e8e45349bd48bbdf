use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::types::db::connection_request::{self, Entity as ConnectionRequest};
use crate::types::db::idea;
use crate::types::domain::ConnectionStatus;

/// ConnectionStore manages investor-to-idea connection requests
pub struct ConnectionStore {
    db: DatabaseConnection,
}

impl ConnectionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a pending connection request
    ///
    /// # Returns
    /// * `Ok(connection_request::Model)` - The created request
    /// * `Err(StoreError::Duplicate)` - This investor already has a request
    ///   for this idea
    pub async fn create(
        &self,
        investor_id: &str,
        idea_id: &str,
        message: String,
    ) -> Result<connection_request::Model, StoreError> {
        let now = Utc::now().timestamp();

        let record = connection_request::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            investor_id: Set(investor_id.to_string()),
            idea_id: Set(idea_id.to_string()),
            message: Set(message),
            status: Set(ConnectionStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::classify_write("create_connection", "connection request", e))
    }

    pub async fn find_by_id(
        &self,
        request_id: &str,
    ) -> Result<Option<connection_request::Model>, StoreError> {
        ConnectionRequest::find_by_id(request_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::operation("find_connection_by_id", e))
    }

    /// Requests this investor has sent, newest first
    pub async fn list_for_investor(
        &self,
        investor_id: &str,
    ) -> Result<Vec<connection_request::Model>, StoreError> {
        ConnectionRequest::find()
            .filter(connection_request::Column::InvestorId.eq(investor_id))
            .order_by_desc(connection_request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::operation("list_connections_for_investor", e))
    }

    /// Requests targeting any idea this account owns, newest first
    pub async fn list_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<connection_request::Model>, StoreError> {
        ConnectionRequest::find()
            .inner_join(idea::Entity)
            .filter(idea::Column::OwnerId.eq(owner_id))
            .order_by_desc(connection_request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::operation("list_connections_for_owner", e))
    }

    /// Record the idea owner's response. The pending-only rule is enforced
    /// at the API layer, where the current status has already been loaded.
    pub async fn set_status(
        &self,
        request_id: &str,
        status: ConnectionStatus,
    ) -> Result<connection_request::Model, StoreError> {
        let found = self
            .find_by_id(request_id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "Connection request",
            })?;

        let mut record = found.into_active_model();
        record.status = Set(status.as_str().to_string());
        record.updated_at = Set(Utc::now().timestamp());

        record
            .update(&self.db)
            .await
            .map_err(|e| StoreError::operation("set_connection_status", e))
    }
}

impl std::fmt::Debug for ConnectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionStore")
            .field("db", &"<connection>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::idea_store::{IdeaStore, NewIdea};
    use crate::stores::user_store::{NewUser, UserStore};
    use crate::types::domain::{IdeaStage, IdeaStatus, IdeaVisibility, Role};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    struct Fixture {
        connections: ConnectionStore,
        investor_id: String,
        idea_id: String,
        owner_id: String,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let users = UserStore::new(db.clone(), "test-pepper-for-unit-tests".to_string());
        let owner = users
            .register(NewUser {
                email: "owner@example.com".to_string(),
                display_name: "Owner".to_string(),
                role: Role::Innovator,
                password: "password123".to_string(),
            })
            .await
            .expect("register owner");
        let investor = users
            .register(NewUser {
                email: "investor@example.com".to_string(),
                display_name: "Investor".to_string(),
                role: Role::Investor,
                password: "password123".to_string(),
            })
            .await
            .expect("register investor");

        let ideas = IdeaStore::new(db.clone());
        let idea = ideas
            .create(NewIdea {
                owner_id: owner.id.clone(),
                title: "Connected idea".to_string(),
                problem: "P".to_string(),
                solution: "S".to_string(),
                target_market: None,
                category: "ai_ml".to_string(),
                industry: "software".to_string(),
                stage: IdeaStage::Seed,
                visibility: IdeaVisibility::Public,
                status: IdeaStatus::Active,
                funding_needed: 10_000,
                regions: vec![],
                tags: vec![],
            })
            .await
            .expect("create idea");

        Fixture {
            connections: ConnectionStore::new(db),
            investor_id: investor.id,
            idea_id: idea.id,
            owner_id: owner.id,
        }
    }

    #[tokio::test]
    async fn create_starts_pending() {
        let fx = setup().await;

        let created = fx
            .connections
            .create(&fx.investor_id, &fx.idea_id, "Let's talk".to_string())
            .await
            .expect("Failed to create request");

        assert_eq!(created.status, "pending");
        assert_eq!(created.message, "Let's talk");
    }

    #[tokio::test]
    async fn second_request_for_same_idea_is_duplicate() {
        let fx = setup().await;

        fx.connections
            .create(&fx.investor_id, &fx.idea_id, "First".to_string())
            .await
            .expect("First request failed");

        let second = fx
            .connections
            .create(&fx.investor_id, &fx.idea_id, "Second".to_string())
            .await;

        assert!(matches!(
            second,
            Err(StoreError::Duplicate {
                what: "connection request"
            })
        ));
    }

    #[tokio::test]
    async fn listings_cover_both_sides() {
        let fx = setup().await;

        fx.connections
            .create(&fx.investor_id, &fx.idea_id, "Hello".to_string())
            .await
            .expect("create");

        let sent = fx
            .connections
            .list_for_investor(&fx.investor_id)
            .await
            .expect("list sent");
        assert_eq!(sent.len(), 1);

        let received = fx
            .connections
            .list_for_owner(&fx.owner_id)
            .await
            .expect("list received");
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].idea_id, fx.idea_id);

        let unrelated = fx
            .connections
            .list_for_owner(&fx.investor_id)
            .await
            .expect("list unrelated");
        assert!(unrelated.is_empty());
    }

    #[tokio::test]
    async fn set_status_records_the_response() {
        let fx = setup().await;

        let created = fx
            .connections
            .create(&fx.investor_id, &fx.idea_id, "Hello".to_string())
            .await
            .expect("create");

        let accepted = fx
            .connections
            .set_status(&created.id, ConnectionStatus::Accepted)
            .await
            .expect("respond");
        assert_eq!(accepted.status, "accepted");
        assert!(accepted.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn set_status_on_missing_request_is_not_found() {
        let fx = setup().await;

        let result = fx
            .connections
            .set_status("no-such-id", ConnectionStatus::Declined)
            .await;
        assert!(matches!(
            result,
            Err(StoreError::NotFound {
                entity: "Connection request"
            })
        ));
    }
}
