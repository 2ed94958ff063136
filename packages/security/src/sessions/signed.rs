// ABOUTME: Stateless HMAC-SHA256 signed session tokens
// ABOUTME: Token form is v1.<base64url claims>.<base64url signature>; subject is re-checked on verify

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, warn};
use vibespecs_core::{Identity, Plan};

use super::{expiry, Credential, IdentityGate};
use crate::error::{AuthError, AuthResult};
use crate::users::UserDirectory;

type HmacSha256 = Hmac<Sha256>;
const TOKEN_VERSION_V1: &str = "v1";
const MAX_TOKEN_LEN: usize = 2048;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    name: String,
    plan: Plan,
    iat: i64,
    exp: i64,
}

pub struct SignedSessionGate {
    secret: Vec<u8>,
    ttl: Duration,
    directory: Arc<dyn UserDirectory>,
}

impl SignedSessionGate {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            secret: secret.into(),
            ttl,
            directory,
        }
    }

    /// Gate with a per-process secret. Tokens stop verifying after a restart.
    pub fn with_random_secret(ttl: Duration, directory: Arc<dyn UserDirectory>) -> Self {
        let secret: [u8; 32] = rand::thread_rng().gen();
        Self::new(secret.to_vec(), ttl, directory)
    }

    fn mac(&self) -> AuthResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AuthError::InvalidInput(format!("Invalid session secret: {}", e)))
    }

    fn decode_claims(&self, token: &str) -> AuthResult<Claims> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(AuthError::Malformed);
        }

        let mut parts = token.split('.');
        let (version, payload_part, sig_part) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(v), Some(p), Some(s), None) => (v, p, s),
            _ => return Err(AuthError::Malformed),
        };
        if version != TOKEN_VERSION_V1 {
            return Err(AuthError::Malformed);
        }

        let expected = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|_| AuthError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        mac.verify_slice(&expected).map_err(|_| {
            warn!("Session token signature mismatch");
            AuthError::Malformed
        })?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_part)
            .map_err(|_| AuthError::Malformed)?;
        serde_json::from_slice(&payload).map_err(|_| AuthError::Malformed)
    }
}

#[async_trait]
impl IdentityGate for SignedSessionGate {
    async fn issue(&self, identity: &Identity) -> AuthResult<Credential> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            plan: identity.plan,
            iat: now.timestamp(),
            exp: expiry(now, self.ttl)?.timestamp(),
        };

        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::InvalidInput(format!("Failed to encode claims: {}", e)))?;
        let payload_part = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        debug!("Issued signed session for user {}", identity.id);
        Ok(Credential::new(format!(
            "{}.{}.{}",
            TOKEN_VERSION_V1, payload_part, sig_part
        )))
    }

    async fn verify(&self, credential: &Credential) -> AuthResult<Identity> {
        let claims = self.decode_claims(credential.as_str())?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        if self.directory.get_user(&claims.sub).await?.is_none() {
            warn!("Session for unknown user {}", claims.sub);
            return Err(AuthError::UnknownSubject);
        }

        Ok(Identity {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            plan: claims.plan,
        })
    }
}
