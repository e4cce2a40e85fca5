use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::auth::store::{new_user_id, normalize_email, UserStore};
use crate::errors::AppError;
use crate::models::user::UserRow;

/// In-process user store keyed by normalized email.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRow>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<UserRow, AppError> {
        let email = normalize_email(email);
        let mut users = self.users.write().await;
        if users.contains_key(&email) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
        let user = UserRow {
            id: new_user_id(),
            email: email.clone(),
            name: name.map(str::to_string),
            password_hash: Some(password_hash.to_string()),
            created_at: Utc::now(),
        };
        users.insert(email, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        Ok(self.users.read().await.get(&normalize_email(email)).cloned())
    }

    async fn find_or_provision(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<UserRow, AppError> {
        let email = normalize_email(email);
        let mut users = self.users.write().await;
        let user = users.entry(email.clone()).or_insert_with(|| UserRow {
            id: new_user_id(),
            email,
            name: name.map(str::to_string),
            password_hash: None,
            created_at: Utc::now(),
        });
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create("jane@example.com", None, "hash").await.unwrap();
        let err = store
            .create("JANE@example.com ", None, "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let store = MemoryUserStore::new();
        let created = store
            .create("jane@example.com", Some("Jane"), "hash")
            .await
            .unwrap();
        let found = store.find_by_email("Jane@Example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name.as_deref(), Some("Jane"));
    }

    #[tokio::test]
    async fn test_provision_is_stable_across_sign_ins() {
        let store = MemoryUserStore::new();
        let first = store
            .find_or_provision("fed@example.com", Some("Fed"))
            .await
            .unwrap();
        let second = store.find_or_provision("fed@example.com", None).await.unwrap();
        assert_eq!(first.id, second.id);
        assert!(first.password_hash.is_none());
    }

    #[tokio::test]
    async fn test_provision_reuses_password_user() {
        let store = MemoryUserStore::new();
        let created = store.create("jane@example.com", None, "hash").await.unwrap();
        let provisioned = store.find_or_provision("jane@example.com", None).await.unwrap();
        assert_eq!(created.id, provisioned.id);
    }
}
