// ABOUTME: Registration, login, and session lookup
// ABOUTME: Validates input, hashes passwords, and issues credentials through the configured gate

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use vibespecs_core::{Identity, Plan};

use crate::error::{AuthError, AuthResult};
use crate::password::{hash_password, verify_password};
use crate::sessions::{Credential, IdentityGate};
use crate::users::{NewUser, UserDirectory};

const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex is valid");
}

#[derive(Clone)]
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    gate: Arc<dyn IdentityGate>,
}

impl AuthService {
    pub fn new(directory: Arc<dyn UserDirectory>, gate: Arc<dyn IdentityGate>) -> Self {
        Self { directory, gate }
    }

    pub fn gate(&self) -> Arc<dyn IdentityGate> {
        self.gate.clone()
    }

    /// Create an account on the free plan and open a session for it.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> AuthResult<(Identity, Credential)> {
        let email = email.trim().to_lowercase();
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(AuthError::InvalidInput(
                "A valid email address is required".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("Name is required".to_string()));
        }

        let user = self
            .directory
            .create_user(NewUser {
                email,
                name: name.to_string(),
                password_hash: hash_password(password)?,
                plan: Plan::Free,
            })
            .await?;

        let identity = user.identity();
        let credential = self.gate.issue(&identity).await?;
        info!("Registered user {}", identity.id);
        Ok((identity, credential))
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<(Identity, Credential)> {
        let user = self
            .directory
            .find_by_email(email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            warn!("Failed login for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let identity = user.identity();
        let credential = self.gate.issue(&identity).await?;
        info!("User {} logged in", identity.id);
        Ok((identity, credential))
    }

    /// Resolve a credential and reload the identity from the directory.
    pub async fn me(&self, credential: &Credential) -> AuthResult<Identity> {
        let identity = self.gate.verify(credential).await?;
        let user = self
            .directory
            .get_user(&identity.id)
            .await?
            .ok_or(AuthError::UnknownSubject)?;
        Ok(user.identity())
    }
}
