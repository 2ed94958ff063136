use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vibespecs_core::{generate_user_id, now_millis};

use super::types::{NewUser, StoredUser};
use super::UserDirectory;
use crate::error::{AuthError, AuthResult};

/// In-process user directory for local-only deployments and tests
#[derive(Default)]
pub struct MemoryUserStorage {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl MemoryUserStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserStorage {
    async fn create_user(&self, user: NewUser) -> AuthResult<StoredUser> {
        let email = user.email.to_lowercase();
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == email) {
            return Err(AuthError::DuplicateEmail(email));
        }

        let stored = StoredUser {
            id: generate_user_id(),
            email,
            name: user.name,
            plan: user.plan,
            password_hash: user.password_hash,
            created_at: now_millis(),
        };
        users.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<StoredUser>> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn get_user(&self, id: &str) -> AuthResult<Option<StoredUser>> {
        Ok(self.users.read().await.get(id).cloned())
    }
}
