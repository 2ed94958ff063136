// ABOUTME: Integration tests for ProjectManager over both storage backends
// ABOUTME: Ownership, ordering, validation, delete semantics, and same-project races

use std::sync::Arc;

use vibespecs_core::test_fixtures::{named_document, sample_document};
use vibespecs_storage::{
    MemoryStorage, ProjectError, ProjectManager, ProjectStorage, StorageConfig, StorageFactory,
};

async fn backends() -> Vec<(&'static str, ProjectManager)> {
    let sqlite: Arc<dyn ProjectStorage> = StorageFactory::create_storage(StorageConfig::sqlite(":memory:"))
        .await
        .unwrap();
    let memory: Arc<dyn ProjectStorage> = Arc::new(MemoryStorage::new());

    vec![
        ("sqlite", ProjectManager::new(sqlite)),
        ("memory", ProjectManager::new(memory)),
    ]
}

#[tokio::test]
async fn test_ownership_round_trip() {
    for (backend, manager) in backends().await {
        let project = manager.create("u_alice", sample_document()).await.unwrap();

        assert_eq!(project.name, "TaskFlow", "{}", backend);
        assert_eq!(project.summary, "Tasks that move themselves", "{}", backend);
        assert_eq!(project.owner_id, "u_alice", "{}", backend);

        let fetched = manager.get("u_alice", &project.id).await.unwrap();
        assert_eq!(fetched, project, "{}", backend);

        assert!(
            matches!(
                manager.get("u_bob", &project.id).await,
                Err(ProjectError::Forbidden(_))
            ),
            "{}",
            backend
        );
        assert!(
            matches!(
                manager.delete("u_bob", &project.id).await,
                Err(ProjectError::Forbidden(_))
            ),
            "{}",
            backend
        );
        assert!(manager.list("u_bob").await.unwrap().is_empty(), "{}", backend);

        manager.delete("u_alice", &project.id).await.unwrap();
    }
}

#[tokio::test]
async fn test_list_is_newest_first() {
    for (backend, manager) in backends().await {
        let p1 = manager.create("u_alice", named_document("P1")).await.unwrap();
        let p2 = manager.create("u_alice", named_document("P2")).await.unwrap();
        let p3 = manager.create("u_alice", named_document("P3")).await.unwrap();
        manager.create("u_bob", named_document("Other")).await.unwrap();

        let ids: Vec<String> = manager
            .list("u_alice")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![p3.id, p2.id, p1.id], "{}", backend);
    }
}

#[tokio::test]
async fn test_unknown_owner_lists_nothing() {
    for (backend, manager) in backends().await {
        manager.create("u_alice", sample_document()).await.unwrap();
        assert!(manager.list("").await.unwrap().is_empty(), "{}", backend);
        assert!(manager.list("u_nobody").await.unwrap().is_empty(), "{}", backend);
    }
}

#[tokio::test]
async fn test_delete_then_not_found() {
    for (backend, manager) in backends().await {
        let project = manager.create("u_alice", sample_document()).await.unwrap();

        manager.delete("u_alice", &project.id).await.unwrap();

        assert!(
            matches!(
                manager.delete("u_alice", &project.id).await,
                Err(ProjectError::NotFound(_))
            ),
            "{}",
            backend
        );
        assert!(
            matches!(
                manager.get("u_alice", &project.id).await,
                Err(ProjectError::NotFound(_))
            ),
            "{}",
            backend
        );
    }
}

#[tokio::test]
async fn test_update_keeps_identity_and_rederives_name() {
    for (backend, manager) in backends().await {
        let project = manager.create("u_alice", sample_document()).await.unwrap();

        let updated = manager
            .update("u_alice", &project.id, named_document("Renamed"))
            .await
            .unwrap();

        assert_eq!(updated.id, project.id, "{}", backend);
        assert_eq!(updated.created_at, project.created_at, "{}", backend);
        assert_eq!(updated.owner_id, "u_alice", "{}", backend);
        assert_eq!(updated.name, "Renamed", "{}", backend);
        assert_eq!(updated.data.app_name, "Renamed", "{}", backend);

        assert!(
            matches!(
                manager
                    .update("u_bob", &project.id, sample_document())
                    .await,
                Err(ProjectError::Forbidden(_))
            ),
            "{}",
            backend
        );
        assert!(
            matches!(
                manager
                    .update("u_alice", "p_missing", sample_document())
                    .await,
                Err(ProjectError::NotFound(_))
            ),
            "{}",
            backend
        );
    }
}

#[tokio::test]
async fn test_invalid_documents_never_persist() {
    for (backend, manager) in backends().await {
        let mut invalid = sample_document();
        invalid.tagline = "  ".to_string();

        assert!(
            matches!(
                manager.create("u_alice", invalid.clone()).await,
                Err(ProjectError::Validation(_))
            ),
            "{}",
            backend
        );
        assert!(manager.list("u_alice").await.unwrap().is_empty(), "{}", backend);

        let project = manager.create("u_alice", sample_document()).await.unwrap();
        assert!(
            matches!(
                manager.update("u_alice", &project.id, invalid).await,
                Err(ProjectError::Validation(_))
            ),
            "{}",
            backend
        );
        let unchanged = manager.get("u_alice", &project.id).await.unwrap();
        assert_eq!(unchanged.data, sample_document(), "{}", backend);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_racing_update_has_defined_outcome() {
    for _ in 0..20 {
        let manager = Arc::new(ProjectManager::new(Arc::new(MemoryStorage::new())));
        let project = manager.create("u_alice", sample_document()).await.unwrap();

        let updater = {
            let manager = manager.clone();
            let id = project.id.clone();
            tokio::spawn(async move {
                manager
                    .update("u_alice", &id, named_document("Racing"))
                    .await
            })
        };
        let deleter = {
            let manager = manager.clone();
            let id = project.id.clone();
            tokio::spawn(async move { manager.delete("u_alice", &id).await })
        };

        let update_result = updater.await.unwrap();
        let delete_result = deleter.await.unwrap();

        assert!(delete_result.is_ok());
        match update_result {
            Ok(updated) => assert_eq!(updated.name, "Racing"),
            Err(ProjectError::NotFound(_)) => {}
            Err(other) => panic!("unexpected update outcome: {:?}", other),
        }
        assert!(matches!(
            manager.get("u_alice", &project.id).await,
            Err(ProjectError::NotFound(_))
        ));
    }
}

#[tokio::test]
async fn test_lock_entries_released_after_each_operation() {
    for (backend, manager) in backends().await {
        let project = manager.create("u_alice", sample_document()).await.unwrap();

        for i in 0..100 {
            assert!(
                matches!(
                    manager.get("u_alice", &format!("p_missing_{}", i)).await,
                    Err(ProjectError::NotFound(_))
                ),
                "{}",
                backend
            );
        }
        assert!(manager.get("u_bob", &project.id).await.is_err(), "{}", backend);
        manager.get("u_alice", &project.id).await.unwrap();
        manager
            .update("u_alice", &project.id, named_document("Renamed"))
            .await
            .unwrap();

        assert_eq!(manager.tracked_locks(), 0, "{}", backend);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lock_entries_released_after_contention() {
    let manager = Arc::new(ProjectManager::new(Arc::new(MemoryStorage::new())));
    let project = manager.create("u_alice", sample_document()).await.unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let manager = manager.clone();
            let id = project.id.clone();
            tokio::spawn(async move {
                manager
                    .update("u_alice", &id, named_document(&format!("Rev {}", i)))
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(manager.tracked_locks(), 0);
}
