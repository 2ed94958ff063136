// ABOUTME: In-process backend wiring the generator, project manager, and auth service directly
// ABOUTME: Used when the workspace runs without a server (CLI, tests, single-user mode)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use vibespecs_core::{Document, Identity, Project};
use vibespecs_ideate::{PrdGenerator, RetryPolicy};
use vibespecs_security::{AuthService, Credential};
use vibespecs_storage::ProjectManager;

use crate::error::ClientResult;
use crate::services::{IdentityService, PrdSource, ProjectService};

#[derive(Clone)]
pub struct LocalBackend {
    generator: PrdGenerator,
    retry: RetryPolicy,
    manager: Arc<ProjectManager>,
    auth: AuthService,
}

impl LocalBackend {
    pub fn new(generator: PrdGenerator, manager: Arc<ProjectManager>, auth: AuthService) -> Self {
        Self {
            generator,
            retry: RetryPolicy::none(),
            manager,
            auth,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn owner(&self, credential: &Credential) -> ClientResult<String> {
        Ok(self.auth.gate().verify(credential).await?.id)
    }
}

#[async_trait]
impl PrdSource for LocalBackend {
    async fn generate(&self, credential: &Credential, idea: &str) -> ClientResult<Document> {
        self.owner(credential).await?;
        Ok(self.generator.generate_with_retry(idea, &self.retry).await?)
    }
}

#[async_trait]
impl ProjectService for LocalBackend {
    async fn create(&self, credential: &Credential, document: Document) -> ClientResult<Project> {
        let owner = self.owner(credential).await?;
        Ok(self.manager.create(&owner, document).await?)
    }

    async fn list(&self, credential: &Credential) -> ClientResult<Vec<Project>> {
        let owner = self.owner(credential).await?;
        Ok(self.manager.list(&owner).await?)
    }

    async fn get(&self, credential: &Credential, id: &str) -> ClientResult<Project> {
        let owner = self.owner(credential).await?;
        Ok(self.manager.get(&owner, id).await?)
    }

    async fn update(
        &self,
        credential: &Credential,
        id: &str,
        document: Document,
    ) -> ClientResult<Project> {
        let owner = self.owner(credential).await?;
        Ok(self.manager.update(&owner, id, document).await?)
    }

    async fn delete(&self, credential: &Credential, id: &str) -> ClientResult<()> {
        let owner = self.owner(credential).await?;
        debug!("Deleting project {} locally", id);
        Ok(self.manager.delete(&owner, id).await?)
    }
}

#[async_trait]
impl IdentityService for LocalBackend {
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ClientResult<(Identity, Credential)> {
        Ok(self.auth.register(email, password, name).await?)
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<(Identity, Credential)> {
        Ok(self.auth.login(email, password).await?)
    }

    async fn me(&self, credential: &Credential) -> ClientResult<Identity> {
        Ok(self.auth.me(credential).await?)
    }
}
