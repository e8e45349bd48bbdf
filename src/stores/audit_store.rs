use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};

use crate::errors::StoreError;
use crate::types::db::audit_event;
use crate::types::internal::audit::AuditEvent;

/// Repository for the append-only audit trail
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write an audit event to the database
    ///
    /// Serializes the data map to JSON and inserts into `audit_events`.
    pub async fn write_event(&self, event: AuditEvent) -> Result<(), StoreError> {
        let data_json = if event.data.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&event.data).map_err(|e| StoreError::Corrupt {
                column: "data",
                message: e.to_string(),
            })?)
        };

        let record = audit_event::ActiveModel {
            id: NotSet,
            event_type: Set(event.event_type.to_string()),
            actor_id: Set(event.actor_id),
            ip_address: Set(event.ip_address),
            data: Set(data_json),
            created_at: Set(Utc::now().timestamp()),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::operation("write_audit_event", e))?;

        Ok(())
    }

    /// Write an audit event, logging instead of failing
    ///
    /// The audit trail must never take a request down with it.
    pub async fn record(&self, event: AuditEvent) {
        let event_type = event.event_type.to_string();
        if let Err(e) = self.write_event(event).await {
            tracing::error!(event_type = %event_type, error = %e, "failed to write audit event");
        }
    }
}

impl std::fmt::Debug for AuditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditStore")
            .field("db", &"<connection>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::audit::EventType;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, EntityTrait};

    async fn setup_store() -> (sea_orm::DatabaseConnection, AuditStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        (db.clone(), AuditStore::new(db))
    }

    #[tokio::test]
    async fn write_event_persists_all_fields() {
        let (db, store) = setup_store().await;

        store
            .write_event(
                AuditEvent::new(EventType::UserBlocked)
                    .actor("admin-1")
                    .ip(Some("192.168.1.9".to_string()))
                    .detail("target_user", "user-2"),
            )
            .await
            .expect("Failed to write audit event");

        let rows = audit_event::Entity::find()
            .all(&db)
            .await
            .expect("Failed to query audit events");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_type, "user_blocked");
        assert_eq!(rows[0].actor_id.as_deref(), Some("admin-1"));
        assert_eq!(rows[0].ip_address.as_deref(), Some("192.168.1.9"));
        let data = rows[0].data.as_deref().expect("data missing");
        assert!(data.contains("target_user"));
    }

    #[tokio::test]
    async fn empty_data_stores_null() {
        let (db, store) = setup_store().await;

        store
            .write_event(AuditEvent::new(EventType::LoginSuccess).actor("user-1"))
            .await
            .expect("Failed to write audit event");

        let rows = audit_event::Entity::find()
            .all(&db)
            .await
            .expect("Failed to query audit events");
        assert!(rows[0].data.is_none());
    }
}
