// src/db/user_directory.rs
// DOCUMENTATION: Lookup seam exposed by the external User collaborator
// PURPOSE: Resolve an author reference on request, without owning user data

use crate::config::Config;
use crate::errors::StoreError;
use crate::models::UserId;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// User lookup by identifier
/// DOCUMENTATION: Returns the collaborator's user document as-is; reviews never
/// read its fields
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: &UserId) -> Result<Option<Value>, StoreError>;
}

/// User documents held in memory
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, Value>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: UserId, document: Value) {
        self.users.write().await.insert(id, document);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<Value>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

/// User directory reading a PostgreSQL users table
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
    table: String,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        Self::new(pool, config.users_table.clone())
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<Value>, StoreError> {
        let sql = format!("SELECT to_jsonb(u) FROM {table} u WHERE u.id = $1", table = self.table);

        sqlx::query_scalar::<_, Value>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to look up user {}: {}", id, e);
                StoreError::from(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let directory = InMemoryUserDirectory::new();
        let id = UserId::parse("64f1a2b3c4d5e6f7a8b9c0d1").unwrap();
        directory.insert(id.clone(), json!({ "username": "ana" })).await;

        let found = directory.find_user(&id).await.unwrap();
        assert_eq!(found, Some(json!({ "username": "ana" })));

        let other = UserId::parse("000000000000000000000000").unwrap();
        assert_eq!(directory.find_user(&other).await.unwrap(), None);
    }
}
