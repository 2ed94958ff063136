// ABOUTME: Project manager enforcing ownership, validation, and per-project serialization
// ABOUTME: Every operation takes the resolved owner id; operations on one project id never interleave

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};
use vibespecs_core::{
    generate_project_id, now_millis, validate_document, Document, DocumentValidationError,
    Project,
};

use crate::{ProjectStorage, StorageError};

/// Manager errors
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Project {0} belongs to another user")]
    Forbidden(String),
    #[error(transparent)]
    Validation(#[from] DocumentValidationError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

type ProjectLock = Arc<tokio::sync::Mutex<()>>;
type LockMap = Mutex<HashMap<String, ProjectLock>>;

/// Exclusive access to one project id. The map entry is dropped on release
/// once no other caller holds or waits on it.
struct IdGuard<'a> {
    locks: &'a LockMap,
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

/// Owner-scoped access to stored projects
pub struct ProjectManager {
    storage: Arc<dyn ProjectStorage>,
    locks: LockMap,
}

impl ProjectManager {
    pub fn new(storage: Arc<dyn ProjectStorage>) -> Self {
        Self {
            storage,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn acquire(&self, id: &str) -> IdGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(id.to_string()).or_default().clone()
        };
        IdGuard {
            locks: &self.locks,
            id: id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of project ids with a live lock entry.
    pub fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Load a project and check it belongs to `owner_id`.
    async fn owned(&self, owner_id: &str, id: &str) -> ProjectResult<Project> {
        let project = self
            .storage
            .fetch(id)
            .await?
            .ok_or_else(|| ProjectError::NotFound(id.to_string()))?;

        if !project.is_owned_by(owner_id) {
            warn!("User {} denied access to project {}", owner_id, id);
            return Err(ProjectError::Forbidden(id.to_string()));
        }
        Ok(project)
    }

    /// Persist a new project wrapping `document`
    pub async fn create(&self, owner_id: &str, document: Document) -> ProjectResult<Project> {
        validate_document(&document)?;

        let project = Project::from_document(
            generate_project_id(),
            owner_id.to_string(),
            now_millis(),
            document,
        );
        self.storage.insert(&project).await?;

        info!(
            "Created project {} '{}' for user {}",
            project.id, project.name, owner_id
        );
        Ok(project)
    }

    /// Projects owned by `owner_id`, newest first
    pub async fn list(&self, owner_id: &str) -> ProjectResult<Vec<Project>> {
        let projects = self.storage.list_by_owner(owner_id).await?;
        debug!("Retrieved {} projects for user {}", projects.len(), owner_id);
        Ok(projects)
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> ProjectResult<Project> {
        let _guard = self.acquire(id).await;
        self.owned(owner_id, id).await
    }

    /// Replace a project's document. `id`, `created_at`, and the owner are kept.
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        document: Document,
    ) -> ProjectResult<Project> {
        let _guard = self.acquire(id).await;

        self.owned(owner_id, id).await?;
        validate_document(&document)?;

        let project = self
            .storage
            .replace_data(id, &document)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => ProjectError::NotFound(id.to_string()),
                other => ProjectError::Storage(other),
            })?;

        info!("Updated project {} for user {}", id, owner_id);
        Ok(project)
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> ProjectResult<()> {
        let _guard = self.acquire(id).await;

        self.owned(owner_id, id).await?;
        self.storage.remove(id).await.map_err(|e| match e {
            StorageError::NotFound => ProjectError::NotFound(id.to_string()),
            other => ProjectError::Storage(other),
        })?;

        info!("Deleted project {} for user {}", id, owner_id);
        Ok(())
    }
}
