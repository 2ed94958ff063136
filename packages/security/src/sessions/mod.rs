// ABOUTME: Session credentials and the identity gate contract
// ABOUTME: Signed stateless tokens and server-side opaque tokens behind one trait

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use vibespecs_core::Identity;

use crate::error::{AuthError, AuthResult};

pub mod opaque;
pub mod signed;

pub use opaque::OpaqueSessionGate;
pub use signed::SignedSessionGate;

/// Expiry instant for a session issued at `issued_at`.
pub(crate) fn expiry(issued_at: DateTime<Utc>, ttl: Duration) -> AuthResult<DateTime<Utc>> {
    issued_at
        .checked_add_signed(ttl)
        .ok_or(AuthError::SessionLifetime)
}

/// Opaque proof that a request acts for an identity. Only the gate that
/// issued it knows how to read it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token for transport (bearer header, client storage).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Issues and verifies session credentials.
#[async_trait]
pub trait IdentityGate: Send + Sync {
    async fn issue(&self, identity: &Identity) -> AuthResult<Credential>;

    /// Resolve a credential to its identity, failing with `Expired`,
    /// `Malformed`, or `UnknownSubject`.
    async fn verify(&self, credential: &Credential) -> AuthResult<Identity>;
}
