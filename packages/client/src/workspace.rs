// ABOUTME: Generation workspace state machine
// ABOUTME: Sequences generate, persist, and refresh; one generation in flight; never stuck in Generating

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{info, warn};
use vibespecs_core::{Document, Project};
use vibespecs_ideate::{export_document, ExportResult};
use vibespecs_security::Credential;

use crate::error::{ClientError, ClientResult, FailureKind};
use crate::services::{PrdSource, ProjectService};

const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// What the workspace is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Generating,
    Complete {
        document: Document,
        project_id: String,
    },
    Failed {
        message: String,
        kind: FailureKind,
    },
}

#[derive(Debug)]
struct Inner {
    view: ViewState,
    projects: Vec<Project>,
}

/// Escalates an abandoned generation to `Failed` when dropped while armed.
struct GeneratingGuard {
    inner: Arc<Mutex<Inner>>,
    armed: bool,
}

impl GeneratingGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for GeneratingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.view == ViewState::Generating {
            warn!("Generation abandoned before completion");
            inner.view = ViewState::Failed {
                message: "Generation was cancelled before it finished".to_string(),
                kind: FailureKind::Upstream,
            };
        }
    }
}

pub struct Workspace {
    source: Arc<dyn PrdSource>,
    projects: Arc<dyn ProjectService>,
    credential: Credential,
    timeout: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl Workspace {
    pub fn new(
        source: Arc<dyn PrdSource>,
        projects: Arc<dyn ProjectService>,
        credential: Credential,
    ) -> Self {
        Self {
            source,
            projects,
            credential,
            timeout: DEFAULT_GENERATION_TIMEOUT,
            inner: Arc::new(Mutex::new(Inner {
                view: ViewState::Idle,
                projects: Vec::new(),
            })),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn view(&self) -> ViewState {
        self.lock().view.clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.lock().projects.clone()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Generate a document from `idea`, persist it, and refresh the list.
    ///
    /// A blank idea is rejected without touching the state. A submit while
    /// another generation is running is rejected and nothing is called.
    pub async fn submit(&self, idea: &str) -> ClientResult<Document> {
        if idea.trim().is_empty() {
            return Err(ClientError::service(
                FailureKind::InvalidInput,
                "Describe your idea before generating",
            ));
        }

        {
            let mut inner = self.lock();
            if inner.view == ViewState::Generating {
                return Err(ClientError::GenerationInProgress);
            }
            inner.view = ViewState::Generating;
        }
        let mut guard = GeneratingGuard {
            inner: self.inner.clone(),
            armed: true,
        };

        let outcome = match tokio::time::timeout(self.timeout, self.generate_and_persist(idea)).await
        {
            Ok(result) => result,
            Err(_) => Err(ClientError::service(
                FailureKind::Upstream,
                format!(
                    "Generation took longer than {} seconds. Please try again.",
                    self.timeout.as_secs()
                ),
            )),
        };
        guard.disarm();

        let mut inner = self.lock();
        match outcome {
            Ok((project, refreshed)) => {
                info!("Generated and saved project {}", project.id);
                let document = project.data.clone();
                inner.projects = refreshed;
                inner.view = ViewState::Complete {
                    document: document.clone(),
                    project_id: project.id,
                };
                Ok(document)
            }
            Err(err) => {
                warn!("Generation failed: {}", err);
                inner.view = ViewState::Failed {
                    message: err.to_string(),
                    kind: err.kind(),
                };
                Err(err)
            }
        }
    }

    async fn generate_and_persist(&self, idea: &str) -> ClientResult<(Project, Vec<Project>)> {
        let document = self.source.generate(&self.credential, idea).await?;
        let project = self.projects.create(&self.credential, document).await?;

        let refreshed = match self.projects.list(&self.credential).await {
            Ok(list) => list,
            Err(e) => {
                // Saved already; show it even if the list could not be reloaded
                warn!("Project list refresh failed after save: {}", e);
                let mut list = self.projects();
                list.retain(|p| p.id != project.id);
                list.insert(0, project.clone());
                list
            }
        };
        Ok((project, refreshed))
    }

    /// Return to the idea form.
    pub fn new_project(&self) -> ClientResult<()> {
        let mut inner = self.lock();
        if inner.view == ViewState::Generating {
            return Err(ClientError::GenerationInProgress);
        }
        inner.view = ViewState::Idle;
        Ok(())
    }

    /// Show a previously saved project without persisting it again.
    pub fn load_project(&self, project: &Project) -> ClientResult<()> {
        let mut inner = self.lock();
        if inner.view == ViewState::Generating {
            return Err(ClientError::GenerationInProgress);
        }
        inner.view = ViewState::Complete {
            document: project.data.clone(),
            project_id: project.id.clone(),
        };
        Ok(())
    }

    pub async fn refresh_projects(&self) -> ClientResult<Vec<Project>> {
        let projects = self.projects.list(&self.credential).await?;
        self.lock().projects = projects.clone();
        Ok(projects)
    }

    /// Delete a project; if it is the one on screen, go back to Idle.
    pub async fn delete_project(&self, id: &str) -> ClientResult<()> {
        self.projects.delete(&self.credential, id).await?;

        {
            let mut inner = self.lock();
            inner.projects.retain(|p| p.id != id);
            let in_view =
                matches!(&inner.view, ViewState::Complete { project_id, .. } if project_id == id);
            if in_view {
                inner.view = ViewState::Idle;
            }
        }

        match self.projects.list(&self.credential).await {
            Ok(projects) => self.lock().projects = projects,
            // Deleted already; the locally pruned list stands in until the next refresh
            Err(e) => warn!("Project list refresh failed after delete: {}", e),
        }
        Ok(())
    }

    /// Markdown export of the document on screen.
    pub fn export(&self) -> ClientResult<ExportResult> {
        match &self.lock().view {
            ViewState::Complete { document, .. } => Ok(export_document(document)),
            _ => Err(ClientError::InvalidState(
                "There is no document to export".to_string(),
            )),
        }
    }
}
