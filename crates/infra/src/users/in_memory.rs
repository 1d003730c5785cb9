use std::collections::HashMap;
use std::sync::RwLock;

use invoicedesk_auth::CredentialStore;
use invoicedesk_core::{NewUser, User, UserId};

use super::r#trait::UserStore;
use crate::error::StoreError;

/// In-memory users table with the same uniqueness rules as the schema:
/// id collisions are silently skipped, duplicate emails are a conflict.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    rows: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory user store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_if_absent(&self, user: NewUser) -> Result<Vec<User>, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if rows.contains_key(&user.id) {
            return Ok(vec![]);
        }
        if rows.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {} already registered", user.email)));
        }

        let user = User::from(user);
        rows.insert(user.id, user.clone());
        Ok(vec![user])
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryUserStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.find_by_email(email).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(id: UserId, email: &str) -> NewUser {
        NewUser {
            id,
            name: "User".into(),
            email: email.into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    #[tokio::test]
    async fn colliding_id_inserts_nothing() {
        let store = InMemoryUserStore::new();
        let id = UserId::new();

        assert_eq!(store.insert_if_absent(new_user(id, "a@example.com")).await.unwrap().len(), 1);
        assert!(store.insert_if_absent(new_user(id, "b@example.com")).await.unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryUserStore::new();
        store.insert_if_absent(new_user(UserId::new(), "a@example.com")).await.unwrap();

        let err = store
            .insert_if_absent(new_user(UserId::new(), "a@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn lookup_by_email() {
        let store = InMemoryUserStore::new();
        let id = UserId::new();
        store.insert_if_absent(new_user(id, "a@example.com")).await.unwrap();

        assert_eq!(store.find_user_by_email("a@example.com").await.unwrap().map(|u| u.id), Some(id));
        assert!(store.find_user_by_email("z@example.com").await.unwrap().is_none());
    }
}
