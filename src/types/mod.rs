// Types layer - All data structures
pub mod db;
pub mod domain;
pub mod dto;
pub mod internal;
