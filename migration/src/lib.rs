pub use sea_orm_migration::prelude::*;

mod m20260801_000001_create_identity_schema;
mod m20260801_000002_create_idea_schema;
mod m20260801_000003_create_matching_schema;
mod m20260801_000004_create_audit_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_identity_schema::Migration),
            Box::new(m20260801_000002_create_idea_schema::Migration),
            Box::new(m20260801_000003_create_matching_schema::Migration),
            Box::new(m20260801_000004_create_audit_schema::Migration),
        ]
    }
}
