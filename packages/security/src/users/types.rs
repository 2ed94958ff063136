// ABOUTME: User type definitions
// ABOUTME: Stored user records including the password hash, which never leaves this crate's API surface

use chrono::{DateTime, Utc};
use vibespecs_core::{Identity, Plan};

/// A registered user as kept by a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub plan: Plan,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            plan: self.plan,
        }
    }
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub plan: Plan,
}
