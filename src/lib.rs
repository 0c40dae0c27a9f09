// src/lib.rs
// DOCUMENTATION: Review record definition for a document store
// PURPOSE: Review shape, validation, storage seams and the service tying them together

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;

pub use config::Config;
pub use errors::{FieldViolation, ReviewsError, StoreError, ValidationError, ViolationKind};
pub use models::{PatchField, Review, ReviewPatch, UserId, ValidatedReview};
pub use services::{validate, validate_patch, ReviewService, ServiceOptions};
