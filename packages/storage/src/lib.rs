// ABOUTME: VibeSpecs project store - persistence backends and ownership enforcement
// ABOUTME: Defines the ProjectStorage trait, SQLite and in-memory backends, and ProjectManager

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use vibespecs_core::{Document, Project};

pub mod factory;
pub mod manager;
pub mod memory;
pub mod sqlite;

pub use factory::StorageFactory;
pub use manager::{ProjectError, ProjectManager, ProjectResult};
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Stored project {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },
    #[error("Project not found")]
    NotFound,
    #[error("Duplicate project id: {0}")]
    DuplicateId(String),
    #[error("Invalid configuration format")]
    InvalidFormat,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub enable_wal: bool,
    pub max_connections: u32,
    pub busy_timeout_seconds: u64,
}

impl StorageConfig {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            provider: StorageProvider::Sqlite { path: path.into() },
            ..Self::default()
        }
    }

    pub fn memory() -> Self {
        Self {
            provider: StorageProvider::Memory,
            ..Self::default()
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::Sqlite {
                path: vibespecs_core::default_database_path(),
            },
            enable_wal: true,
            max_connections: 10,
            busy_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageProvider {
    Sqlite { path: PathBuf },
    Memory,
}

/// Persistence backend for projects.
///
/// Backends store what they are given; ownership checks, validation, and
/// per-project serialization live in [`ProjectManager`].
#[async_trait]
pub trait ProjectStorage: Send + Sync {
    async fn initialize(&self) -> StorageResult<()>;

    /// Store a new project. Fails with `DuplicateId` if the id is taken.
    async fn insert(&self, project: &Project) -> StorageResult<()>;

    async fn fetch(&self, id: &str) -> StorageResult<Option<Project>>;

    /// Projects owned by `owner_id`, newest first. Projects with equal
    /// `created_at` are ordered by insertion, latest first.
    async fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Project>>;

    /// Replace the document and its denormalized name and summary.
    async fn replace_data(&self, id: &str, data: &Document) -> StorageResult<Project>;

    async fn remove(&self, id: &str) -> StorageResult<()>;

    fn provider_name(&self) -> &'static str;
}
