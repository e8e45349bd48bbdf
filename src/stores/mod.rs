// Stores layer - Data access and repository pattern
pub mod audit_store;
pub mod connection_store;
pub mod idea_store;
pub mod preference_store;
pub mod user_store;

pub use audit_store::AuditStore;
pub use connection_store::ConnectionStore;
pub use idea_store::IdeaStore;
pub use preference_store::PreferenceStore;
pub use user_store::UserStore;
