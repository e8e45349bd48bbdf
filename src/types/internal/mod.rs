// Internal plumbing types - never serialized to clients
pub mod audit;
pub mod auth;
