// ABOUTME: SQLite implementation of project storage
// ABOUTME: Pool setup with WAL pragmas, embedded migrations, and documents stored as JSON text

use async_trait::async_trait;
use chrono::DateTime;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{migrate::MigrateDatabase, Row};
use tracing::{debug, info, warn};
use vibespecs_core::{validate_document, Document, Project};

use crate::{ProjectStorage, StorageConfig, StorageError, StorageProvider, StorageResult};

const PROJECT_COLUMNS: &str = "id, owner_id, name, summary, data, created_at";

/// SQLite implementation of ProjectStorage
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SqliteStorage instance
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        let database_path = match &config.provider {
            StorageProvider::Sqlite { path } => path,
            _ => return Err(StorageError::InvalidFormat),
        };

        let in_memory = database_path.as_os_str() == ":memory:";

        // Ensure parent directory exists
        if !in_memory {
            if let Some(parent) = database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let database_url = format!("sqlite:{}", database_path.display());

        if !sqlx::Sqlite::database_exists(&database_url).await? {
            debug!("Creating database at: {}", database_url);
            sqlx::Sqlite::create_database(&database_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { config.max_connections })
            .acquire_timeout(std::time::Duration::from_secs(config.busy_timeout_seconds))
            .connect(&database_url)
            .await?;

        if config.enable_wal && !in_memory {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await?;
        }

        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA temp_store = memory")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Connection pool shared with the user directory.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Convert a database row to a Project, re-validating the stored document
    fn row_to_project(row: &SqliteRow) -> StorageResult<Project> {
        let id: String = row.try_get("id")?;
        let data_json: String = row.try_get("data")?;
        let created_at_ms: i64 = row.try_get("created_at")?;

        let data: Document = serde_json::from_str(&data_json).map_err(|e| {
            warn!("Project {} has unreadable data: {}", id, e);
            StorageError::Corrupt {
                id: id.clone(),
                reason: e.to_string(),
            }
        })?;
        validate_document(&data).map_err(|e| StorageError::Corrupt {
            id: id.clone(),
            reason: e.to_string(),
        })?;

        let created_at =
            DateTime::from_timestamp_millis(created_at_ms).ok_or_else(|| StorageError::Corrupt {
                id: id.clone(),
                reason: format!("invalid created_at {}", created_at_ms),
            })?;

        Ok(Project {
            id,
            name: row.try_get("name")?,
            summary: row.try_get("summary")?,
            created_at,
            owner_id: row.try_get("owner_id")?,
            data,
        })
    }
}

#[async_trait]
impl ProjectStorage for SqliteStorage {
    async fn initialize(&self) -> StorageResult<()> {
        info!("Initializing SQLite storage with migrations");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        info!("SQLite storage initialized successfully");
        Ok(())
    }

    async fn insert(&self, project: &Project) -> StorageResult<()> {
        let data_json = serde_json::to_string(&project.data)?;

        let result = sqlx::query(
            "INSERT INTO projects (id, owner_id, name, summary, data, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&project.id)
        .bind(&project.owner_id)
        .bind(&project.name)
        .bind(&project.summary)
        .bind(data_json)
        .bind(project.created_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!("Created project with ID {}", project.id);
                Ok(())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StorageError::DuplicateId(project.id.clone()))
            }
            Err(e) => Err(StorageError::Sqlx(e)),
        }
    }

    async fn fetch(&self, id: &str) -> StorageResult<Option<Project>> {
        let query = format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_project).transpose()
    }

    async fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Project>> {
        let query = format!(
            "SELECT {} FROM projects WHERE owner_id = ? ORDER BY created_at DESC, seq DESC",
            PROJECT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_project).collect()
    }

    async fn replace_data(&self, id: &str, data: &Document) -> StorageResult<Project> {
        let data_json = serde_json::to_string(data)?;

        let result = sqlx::query("UPDATE projects SET name = ?, summary = ?, data = ? WHERE id = ?")
            .bind(&data.app_name)
            .bind(&data.tagline)
            .bind(data_json)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        debug!("Updated project with ID {}", id);
        self.fetch(id).await?.ok_or(StorageError::NotFound)
    }

    async fn remove(&self, id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        debug!("Deleted project with ID {}", id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "sqlite"
    }
}
