// ABOUTME: In-memory project storage for local-only and test deployments
// ABOUTME: HashMap behind a tokio RwLock with an insertion counter for stable ordering

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use vibespecs_core::{Document, Project};

use crate::{ProjectStorage, StorageError, StorageResult};

#[derive(Default)]
struct Inner {
    next_seq: u64,
    projects: HashMap<String, (u64, Project)>,
}

/// In-memory implementation of ProjectStorage
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStorage for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn insert(&self, project: &Project) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        if inner.projects.contains_key(&project.id) {
            return Err(StorageError::DuplicateId(project.id.clone()));
        }
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner
            .projects
            .insert(project.id.clone(), (seq, project.clone()));
        debug!("Stored project {} in memory", project.id);
        Ok(())
    }

    async fn fetch(&self, id: &str) -> StorageResult<Option<Project>> {
        let inner = self.inner.read().await;
        Ok(inner.projects.get(id).map(|(_, project)| project.clone()))
    }

    async fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Project>> {
        let inner = self.inner.read().await;
        let mut owned: Vec<&(u64, Project)> = inner
            .projects
            .values()
            .filter(|(_, project)| project.is_owned_by(owner_id))
            .collect();
        owned.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        Ok(owned.into_iter().map(|(_, project)| project.clone()).collect())
    }

    async fn replace_data(&self, id: &str, data: &Document) -> StorageResult<Project> {
        let mut inner = self.inner.write().await;
        let (_, project) = inner.projects.get_mut(id).ok_or(StorageError::NotFound)?;
        project.replace_document(data.clone());
        Ok(project.clone())
    }

    async fn remove(&self, id: &str) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .projects
            .remove(id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibespecs_core::test_fixtures::{named_document, sample_document};
    use vibespecs_core::{generate_project_id, now_millis};

    fn project(owner: &str, app_name: &str) -> Project {
        Project::from_document(
            generate_project_id(),
            owner.to_string(),
            now_millis(),
            named_document(app_name),
        )
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let storage = MemoryStorage::new();
        let p = project("u_alice", "TaskFlow");
        storage.insert(&p).await.unwrap();

        assert_eq!(storage.fetch(&p.id).await.unwrap(), Some(p.clone()));
        assert!(matches!(
            storage.insert(&p).await,
            Err(StorageError::DuplicateId(_))
        ));
    }

    #[tokio::test]
    async fn test_same_timestamp_orders_by_insertion() {
        let storage = MemoryStorage::new();
        let created_at = now_millis();
        let mut ids = Vec::new();
        for name in ["One", "Two", "Three"] {
            let p = Project::from_document(
                generate_project_id(),
                "u_alice".to_string(),
                created_at,
                named_document(name),
            );
            ids.push(p.id.clone());
            storage.insert(&p).await.unwrap();
        }

        let listed: Vec<String> = storage
            .list_by_owner("u_alice")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_replace_and_remove_missing() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.replace_data("p_missing", &sample_document()).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            storage.remove("p_missing").await,
            Err(StorageError::NotFound)
        ));
    }
}
