// Request/response models for the HTTP surface
pub mod auth;
pub mod common;
pub mod connections;
pub mod ideas;
pub mod matching;
pub mod user;
