// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export storage components

pub mod review_repository;
pub mod review_store;
pub mod user_directory;

pub use review_repository::*;
pub use review_store::*;
pub use user_directory::*;
