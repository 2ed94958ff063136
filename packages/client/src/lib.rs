// ABOUTME: VibeSpecs client library
// ABOUTME: Workspace state machine plus interchangeable local and HTTP service backends

pub mod error;
pub mod local;
pub mod remote;
pub mod services;
pub mod workspace;

pub use error::{ClientError, ClientResult, FailureKind};
pub use local::LocalBackend;
pub use remote::RemoteBackend;
pub use services::{IdentityService, PrdSource, ProjectService};
pub use workspace::{ViewState, Workspace};
