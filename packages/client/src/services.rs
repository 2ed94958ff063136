// ABOUTME: Service seams the workspace talks to
// ABOUTME: Generation, project persistence, and identity, each with local and remote implementations

use async_trait::async_trait;
use vibespecs_core::{Document, Identity, Project};
use vibespecs_security::Credential;

use crate::error::ClientResult;

#[async_trait]
pub trait PrdSource: Send + Sync {
    async fn generate(&self, credential: &Credential, idea: &str) -> ClientResult<Document>;
}

#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn create(&self, credential: &Credential, document: Document) -> ClientResult<Project>;
    async fn list(&self, credential: &Credential) -> ClientResult<Vec<Project>>;
    async fn get(&self, credential: &Credential, id: &str) -> ClientResult<Project>;
    async fn update(
        &self,
        credential: &Credential,
        id: &str,
        document: Document,
    ) -> ClientResult<Project>;
    async fn delete(&self, credential: &Credential, id: &str) -> ClientResult<()>;
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ClientResult<(Identity, Credential)>;
    async fn login(&self, email: &str, password: &str) -> ClientResult<(Identity, Credential)>;
    async fn me(&self, credential: &Credential) -> ClientResult<Identity>;
}
