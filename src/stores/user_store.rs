use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::services::password;
use crate::types::db::user::{self, Entity as User};
use crate::types::domain::{AccountStatus, Role};

/// Fields collected at registration time.
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub password: String,
}

/// UserStore manages identity records and credentials in the database
pub struct UserStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl UserStore {
    /// Create a new UserStore with the given database connection and password pepper
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key used for password hashing (from SecretManager)
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    /// Create a new identity record
    ///
    /// New accounts start as `pending`: active (can log in and manage their
    /// own profile) but not yet approved for role-gated resources.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created identity
    /// * `Err(StoreError::Duplicate)` - The email is already registered
    pub async fn register(&self, new_user: NewUser) -> Result<user::Model, StoreError> {
        let password_hash = password::hash_password(&new_user.password, &self.password_pepper)?;
        let now = Utc::now().timestamp();

        let record = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(normalize_email(&new_user.email)),
            display_name: Set(new_user.display_name),
            role: Set(new_user.role.as_str().to_string()),
            status: Set(AccountStatus::Pending.as_str().to_string()),
            is_active: Set(true),
            is_approved: Set(false),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::classify_write("register_user", "email", e))
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, StoreError> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::operation("find_user_by_id", e))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, StoreError> {
        User::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::operation("find_user_by_email", e))
    }

    /// Verify a login attempt against the stored password hash
    ///
    /// # Returns
    /// * `Ok(Some(user::Model))` - Credentials valid; caller still owns the
    ///   active/blocked decision
    /// * `Ok(None)` - Unknown email or wrong password (indistinguishable on
    ///   purpose)
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        let Some(found) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        if password::verify_password(password, &found.password_hash, &self.password_pepper)? {
            Ok(Some(found))
        } else {
            Ok(None)
        }
    }

    /// Update the caller's own profile fields
    ///
    /// Email and role are immutable after registration; only display name and
    /// password can change. A new password arrives already policy-checked.
    pub async fn update_profile(
        &self,
        user_id: &str,
        display_name: Option<String>,
        password: Option<String>,
    ) -> Result<user::Model, StoreError> {
        let found = self.require_user(user_id).await?;

        let mut record = found.into_active_model();
        if let Some(name) = display_name {
            record.display_name = Set(name);
        }
        if let Some(new_password) = password {
            record.password_hash =
                Set(password::hash_password(&new_password, &self.password_pepper)?);
        }
        record.updated_at = Set(Utc::now().timestamp());

        record
            .update(&self.db)
            .await
            .map_err(|e| StoreError::operation("update_profile", e))
    }

    /// List identities for the admin surface, newest first
    pub async fn list_users(&self, role: Option<Role>) -> Result<Vec<user::Model>, StoreError> {
        let mut query = User::find().order_by_desc(user::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }

        query
            .all(&self.db)
            .await
            .map_err(|e| StoreError::operation("list_users", e))
    }

    /// Block an account: it can no longer log in
    pub async fn block(&self, user_id: &str) -> Result<user::Model, StoreError> {
        let found = self.require_user(user_id).await?;

        let mut record = found.into_active_model();
        record.is_active = Set(false);
        record.status = Set(AccountStatus::Suspended.as_str().to_string());
        record.updated_at = Set(Utc::now().timestamp());

        record
            .update(&self.db)
            .await
            .map_err(|e| StoreError::operation("block_user", e))
    }

    /// Unblock an account, restoring its pre-suspension status
    pub async fn unblock(&self, user_id: &str) -> Result<user::Model, StoreError> {
        let found = self.require_user(user_id).await?;

        let restored = if found.is_approved {
            AccountStatus::Approved
        } else {
            AccountStatus::Pending
        };

        let mut record = found.into_active_model();
        record.is_active = Set(true);
        record.status = Set(restored.as_str().to_string());
        record.updated_at = Set(Utc::now().timestamp());

        record
            .update(&self.db)
            .await
            .map_err(|e| StoreError::operation("unblock_user", e))
    }

    /// Approve a pending account for role-gated access
    pub async fn approve(&self, user_id: &str) -> Result<user::Model, StoreError> {
        let found = self.require_user(user_id).await?;

        let mut record = found.into_active_model();
        record.is_approved = Set(true);
        record.status = Set(AccountStatus::Approved.as_str().to_string());
        record.updated_at = Set(Utc::now().timestamp());

        record
            .update(&self.db)
            .await
            .map_err(|e| StoreError::operation("approve_user", e))
    }

    async fn require_user(&self, user_id: &str) -> Result<user::Model, StoreError> {
        self.find_by_id(user_id)
            .await?
            .ok_or(StoreError::NotFound { entity: "User" })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
