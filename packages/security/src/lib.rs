// ABOUTME: Identity and session functionality for VibeSpecs
// ABOUTME: Provides the user directory, password hashing, session gates, and the auth service

pub mod auth_service;
pub mod error;
pub mod password;
pub mod sessions;
pub mod users;

// Re-export main types for convenience
pub use auth_service::AuthService;
pub use error::{AuthError, AuthResult};
pub use sessions::{Credential, IdentityGate, OpaqueSessionGate, SignedSessionGate};
pub use users::{MemoryUserStorage, NewUser, SqliteUserStorage, StoredUser, UserDirectory};
