use std::sync::Arc;

use vibespecs_ideate::{PrdGenerator, RetryPolicy};
use vibespecs_security::AuthService;
use vibespecs_storage::ProjectManager;

/// Shared handles every handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<ProjectManager>,
    pub auth: AuthService,
    pub generator: PrdGenerator,
    pub retry: RetryPolicy,
}

impl AppState {
    pub fn new(projects: Arc<ProjectManager>, auth: AuthService, generator: PrdGenerator) -> Self {
        Self {
            projects,
            auth,
            generator,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
