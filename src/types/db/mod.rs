// Database entities - SeaORM models
pub mod audit_event;
pub mod connection_request;
pub mod idea;
pub mod investor_preference;
pub mod match_history;
pub mod user;
