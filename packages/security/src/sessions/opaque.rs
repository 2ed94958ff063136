// ABOUTME: Server-side opaque session tokens
// ABOUTME: Random 32-byte tokens; only their SHA-256 hash is kept, alongside identity and expiry

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tracing::debug;
use vibespecs_core::Identity;

use super::{expiry, Credential, IdentityGate};
use crate::error::{AuthError, AuthResult};
use crate::users::UserDirectory;

struct Session {
    token_hash: String,
    identity: Identity,
    expires_at: DateTime<Utc>,
}

pub struct OpaqueSessionGate {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
    directory: Arc<dyn UserDirectory>,
}

impl OpaqueSessionGate {
    pub fn new(ttl: Duration, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            directory,
        }
    }

    /// Generate a cryptographically secure random token
    /// Returns a base64-encoded 32-byte token
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a token using SHA-256
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a token against a stored hash using constant-time comparison
    fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        Self::hash_token(token)
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    /// Sessions currently held, expired ones included until the next issue.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Forget a session. Unknown credentials are ignored.
    pub async fn revoke(&self, credential: &Credential) {
        let token_hash = Self::hash_token(credential.as_str());
        self.sessions.write().await.remove(&token_hash);
    }
}

#[async_trait]
impl IdentityGate for OpaqueSessionGate {
    async fn issue(&self, identity: &Identity) -> AuthResult<Credential> {
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);

        let now = Utc::now();
        let session = Session {
            token_hash: token_hash.clone(),
            identity: identity.clone(),
            expires_at: expiry(now, self.ttl)?,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        if sessions.len() < before {
            debug!("Pruned {} expired sessions", before - sessions.len());
        }
        sessions.insert(token_hash, session);
        drop(sessions);

        debug!("Issued opaque session for user {}", identity.id);
        Ok(Credential::new(token))
    }

    async fn verify(&self, credential: &Credential) -> AuthResult<Identity> {
        let token = credential.as_str();
        let token_hash = Self::hash_token(token);

        let identity = {
            let sessions = self.sessions.read().await;
            let session = sessions.get(&token_hash).ok_or(AuthError::Malformed)?;

            // Double-check with constant-time comparison
            if !Self::verify_token_hash(token, &session.token_hash) {
                return Err(AuthError::Malformed);
            }
            if session.expires_at <= Utc::now() {
                None
            } else {
                Some(session.identity.clone())
            }
        };

        let Some(identity) = identity else {
            self.sessions.write().await.remove(&token_hash);
            return Err(AuthError::Expired);
        };

        if self.directory.get_user(&identity.id).await?.is_none() {
            return Err(AuthError::UnknownSubject);
        }
        Ok(identity)
    }
}
