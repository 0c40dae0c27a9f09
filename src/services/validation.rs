// src/services/validation.rs
// DOCUMENTATION: Field-level checks for untyped review candidates
// PURPOSE: Turn raw JSON into ValidatedReview / ReviewPatch, or report every bad field

use crate::errors::{FieldViolation, ValidationError, ViolationKind};
use crate::models::{PatchField, ReviewPatch, UserId, ValidatedReview, MAX_RATING, MIN_RATING};
use serde_json::{Map, Value};
use validator::Validate;

/// Fields known to the review schema, in reporting order
pub const REVIEW_FIELDS: [&str; 3] = ["comment", "rating", "author"];

/// Candidate after JSON type checks, before constraint checks
#[derive(Debug, Default, Validate)]
struct ReviewFields {
    comment: Option<String>,
    // Literals must match MIN_RATING / MAX_RATING
    #[validate(range(min = 1, max = 5))]
    rating: Option<i32>,
    #[validate(custom = "check_user_id")]
    author: Option<String>,
}

/// Fields explicitly given as null
#[derive(Debug, Default)]
struct NullFields {
    comment: bool,
    rating: bool,
    author: bool,
}

fn check_user_id(value: &str) -> Result<(), validator::ValidationError> {
    if UserId::is_valid(value) {
        return Ok(());
    }
    let mut err = validator::ValidationError::new("object_id");
    err.message = Some("must be a 24-character hexadecimal identifier".into());
    Err(err)
}

/// Validate a full review candidate for create
pub fn validate(candidate: &Value) -> Result<ValidatedReview, ValidationError> {
    let (fields, _) = check(candidate)?;
    Ok(ValidatedReview::new(
        fields.comment,
        fields.rating,
        fields.author.as_deref().map(UserId::from_checked),
    ))
}

/// Validate a partial update
/// DOCUMENTATION: Absent keys are kept, null clears, any other value is checked
/// with the same rules as validate()
pub fn validate_patch(patch: &Value) -> Result<ReviewPatch, ValidationError> {
    let (fields, nulls) = check(patch)?;
    Ok(ReviewPatch::new(
        patch_field(fields.comment, nulls.comment),
        patch_field(fields.rating, nulls.rating),
        patch_field(fields.author.as_deref().map(UserId::from_checked), nulls.author),
    ))
}

fn patch_field<T>(value: Option<T>, null: bool) -> PatchField<T> {
    match (value, null) {
        (Some(value), _) => PatchField::Set(value),
        (None, true) => PatchField::Clear,
        (None, false) => PatchField::Keep,
    }
}

fn check(candidate: &Value) -> Result<(ReviewFields, NullFields), ValidationError> {
    let object = candidate.as_object().ok_or_else(|| {
        ValidationError::single(FieldViolation::new(
            "review",
            ViolationKind::Type,
            format!("must be an object, got {}", json_type(candidate)),
        ))
    })?;

    for key in object.keys().filter(|k| !REVIEW_FIELDS.contains(&k.as_str())) {
        log::debug!("Ignoring unknown review field: {}", key);
    }

    let mut violations = Vec::new();
    let mut nulls = NullFields::default();

    let fields = ReviewFields {
        comment: typed_field(object, "comment", comment_value, &mut nulls.comment, &mut violations),
        rating: typed_field(object, "rating", rating_value, &mut nulls.rating, &mut violations),
        author: typed_field(object, "author", author_value, &mut nulls.author, &mut violations),
    };

    // Constraints only see values that passed the type checks
    if let Err(errors) = fields.validate() {
        violations.extend(constraint_violations(&errors));
    }

    if violations.is_empty() {
        Ok((fields, nulls))
    } else {
        violations.sort_by_key(|v| field_position(&v.field));
        Err(ValidationError::new(violations))
    }
}

fn typed_field<T>(
    object: &Map<String, Value>,
    field: &str,
    convert: fn(&Value) -> Result<T, String>,
    null: &mut bool,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    match object.get(field) {
        None => None,
        Some(Value::Null) => {
            *null = true;
            None
        }
        Some(value) => match convert(value) {
            Ok(value) => Some(value),
            Err(message) => {
                violations.push(FieldViolation::new(field, ViolationKind::Type, message));
                None
            }
        },
    }
}

fn comment_value(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("must be a string, got {}", json_type(other))),
    }
}

/// Strict numeric typing: JSON numbers only, no coercion from text.
/// Out-of-i32 values saturate, which still fails the range check.
fn rating_value(value: &Value) -> Result<i32, String> {
    let Value::Number(number) = value else {
        return Err(format!("must be a number, got {}", json_type(value)));
    };

    if let Some(n) = number.as_i64() {
        return Ok(n.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i32),
        _ => Err("must be an integer".to_string()),
    }
}

fn author_value(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("must be an identifier string, got {}", json_type(other))),
    }
}

fn constraint_violations(errors: &validator::ValidationErrors) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs.iter() {
            let (kind, message) = match &*err.code {
                "range" => (ViolationKind::Range, rating_range_message()),
                _ => (
                    ViolationKind::Format,
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                ),
            };
            violations.push(FieldViolation::new(field.to_string(), kind, message));
        }
    }
    violations
}

fn rating_range_message() -> String {
    format!("must be between {} and {}", MIN_RATING, MAX_RATING)
}

fn field_position(field: &str) -> usize {
    REVIEW_FIELDS
        .iter()
        .position(|f| *f == field)
        .unwrap_or(REVIEW_FIELDS.len())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
