// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod review_service;
pub mod validation;

pub use review_service::*;
pub use validation::{validate, validate_patch};
