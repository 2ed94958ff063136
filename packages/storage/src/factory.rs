use std::sync::Arc;

use tracing::{debug, info};

use crate::memory::MemoryStorage;
use crate::sqlite::SqliteStorage;
use crate::{ProjectStorage, StorageConfig, StorageError, StorageProvider, StorageResult};

/// Factory for creating storage instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create and initialize a storage backend from configuration
    pub async fn create_storage(config: StorageConfig) -> StorageResult<Arc<dyn ProjectStorage>> {
        debug!("Creating storage with provider: {:?}", config.provider);

        match &config.provider {
            StorageProvider::Sqlite { path } => {
                info!("Initializing SQLite storage at: {:?}", path);
                let storage = SqliteStorage::new(config.clone()).await?;
                storage.initialize().await?;
                Ok(Arc::new(storage))
            }
            StorageProvider::Memory => {
                info!("Using in-memory storage; projects will not survive a restart");
                Ok(Arc::new(MemoryStorage::new()))
            }
        }
    }

    /// Create an initialized SQLite backend, keeping the concrete type so the
    /// pool can be shared.
    pub async fn create_sqlite(config: StorageConfig) -> StorageResult<SqliteStorage> {
        let storage = SqliteStorage::new(config).await?;
        storage.initialize().await?;
        Ok(storage)
    }

    /// Create a storage instance from a database URL
    pub async fn from_url(url: &str) -> StorageResult<Arc<dyn ProjectStorage>> {
        if url == "memory" {
            return Self::create_storage(StorageConfig::memory()).await;
        }

        let path = url.strip_prefix("sqlite:").ok_or_else(|| {
            StorageError::Database(format!("Unsupported database URL: {}", url))
        })?;
        Self::create_storage(StorageConfig::sqlite(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_storage() {
        let storage = StorageFactory::create_storage(StorageConfig::memory())
            .await
            .unwrap();
        assert_eq!(storage.provider_name(), "memory");
    }

    #[tokio::test]
    async fn test_from_url() {
        let storage = StorageFactory::from_url("sqlite::memory:").await.unwrap();
        assert_eq!(storage.provider_name(), "sqlite");

        assert!(matches!(
            StorageFactory::from_url("postgres://localhost/specs").await,
            Err(StorageError::Database(_))
        ));
    }
}
