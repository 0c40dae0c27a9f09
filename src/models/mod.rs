// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod review;
pub mod user;

pub use review::*;
pub use user::*;
