// src/models/user.rs
// DOCUMENTATION: Identifier space of the external User collection
// PURPOSE: Typed reference to a user without owning any user fields

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a document-store object id in hexadecimal characters
pub const USER_ID_LEN: usize = 24;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid user id {0:?}: expected 24 hexadecimal characters")]
pub struct InvalidUserId(pub String);

/// Reference to a User document
/// DOCUMENTATION: 24 hex characters, stored lowercase. Holding a UserId says
/// nothing about whether the user exists; use UserDirectory to look it up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct UserId(String);

impl UserId {
    /// Check the textual form without allocating
    pub fn is_valid(value: &str) -> bool {
        value.len() == USER_ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn parse(value: &str) -> Result<Self, InvalidUserId> {
        if Self::is_valid(value) {
            Ok(UserId(value.to_ascii_lowercase()))
        } else {
            Err(InvalidUserId(value.to_string()))
        }
    }

    /// Build from text already checked with is_valid()
    pub(crate) fn from_checked(value: &str) -> Self {
        UserId(value.to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = InvalidUserId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserId::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = InvalidUserId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UserId::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = UserId::parse("64f1a2b3c4d5e6f7a8b9c0d1").unwrap();
        assert_eq!(id.as_str(), "64f1a2b3c4d5e6f7a8b9c0d1");

        // Uppercase input is normalised
        let upper: UserId = "64F1A2B3C4D5E6F7A8B9C0D1".parse().unwrap();
        assert_eq!(upper, id);
    }

    #[test]
    fn test_reject_malformed_ids() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("64f1a2b3c4d5e6f7a8b9c0d").is_err()); // 23 chars
        assert!(UserId::parse("64f1a2b3c4d5e6f7a8b9c0d1e").is_err()); // 25 chars
        assert!(UserId::parse("zzf1a2b3c4d5e6f7a8b9c0d1").is_err());
        assert!(UserId::parse("550e8400-e29b-41d4-a716").is_err());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let id: UserId = serde_json::from_str("\"64f1a2b3c4d5e6f7a8b9c0d1\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"64f1a2b3c4d5e6f7a8b9c0d1\"");

        let bad = serde_json::from_str::<UserId>("\"not-an-id\"");
        assert!(bad.is_err());
    }
}
