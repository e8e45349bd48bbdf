use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::errors::StoreError;

/// Connect to the application database.
///
/// Does NOT run migrations - call `run_migrations()` separately.
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, StoreError> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| StoreError::operation("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations on the provided connection.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), StoreError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| StoreError::operation("run_migrations", e))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}
