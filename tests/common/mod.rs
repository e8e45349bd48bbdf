// Common test utilities for integration tests

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use venturelink_backend::stores::user_store::{NewUser, UserStore};
use venturelink_backend::types::db::user;
use venturelink_backend::types::domain::Role;

pub const TEST_PEPPER: &str = "integration-test-pepper";

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Registers an account through the store, so it starts pending like any
/// real signup
pub async fn register_account(users: &UserStore, email: &str, role: Role) -> user::Model {
    users
        .register(NewUser {
            email: email.to_string(),
            display_name: format!("{} account", role.as_str()),
            role,
            password: "correct-horse-battery".to_string(),
        })
        .await
        .expect("Failed to register account")
}
