// ABOUTME: User directory module
// ABOUTME: Stored user records and the directory trait with SQLite and in-memory backends

pub mod memory;
pub mod storage;
pub mod types;


use async_trait::async_trait;

use crate::error::AuthResult;

pub use memory::MemoryUserStorage;
pub use storage::SqliteUserStorage;
pub use types::*;

/// Lookup and creation of registered users. Emails are stored lower-cased.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create a user. Fails with `DuplicateEmail` if the email is taken.
    async fn create_user(&self, user: NewUser) -> AuthResult<StoredUser>;
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<StoredUser>>;
    async fn get_user(&self, id: &str) -> AuthResult<Option<StoredUser>>;
}
