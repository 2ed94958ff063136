// ABOUTME: Composition root turning configuration into concrete services
// ABOUTME: Selects storage and session backends and wires the generator to the Anthropic adapter

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use vibespecs_ai::AIService;
use vibespecs_api::AppState;
use vibespecs_config::{Config, StorageSelection};
use vibespecs_ideate::{GeneratorSettings, PrdGenerator, RetryPolicy};
use vibespecs_security::{
    AuthService, IdentityGate, MemoryUserStorage, SignedSessionGate, SqliteUserStorage,
    UserDirectory,
};
use vibespecs_storage::{
    MemoryStorage, ProjectManager, ProjectStorage, StorageConfig, StorageFactory,
};

/// Delay before the first retry; later retries back off linearly.
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

pub fn retry_policy(config: &Config) -> RetryPolicy {
    match config.generation.retry_attempts {
        0 => RetryPolicy::none(),
        n => RetryPolicy::retries(n, RETRY_BACKOFF),
    }
}

pub fn build_generator(config: &Config) -> PrdGenerator {
    let settings = &config.generation;
    if settings.api_key.is_none() {
        warn!("ANTHROPIC_API_KEY not set - generation requests will fail until configured");
    }

    let service = AIService::with_settings(settings.api_key.clone(), settings.model.clone());
    info!("Generation model: {}", service.model());

    PrdGenerator::with_settings(
        Arc::new(service),
        GeneratorSettings {
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_secs),
        },
    )
}

async fn build_stores(
    selection: &StorageSelection,
) -> anyhow::Result<(Arc<dyn ProjectStorage>, Arc<dyn UserDirectory>)> {
    match selection {
        StorageSelection::Sqlite { path } => {
            let storage = StorageFactory::create_sqlite(StorageConfig::sqlite(path.clone()))
                .await
                .with_context(|| format!("Failed to open database at {}", path.display()))?;
            let users = SqliteUserStorage::new(storage.pool().clone());
            info!("Using SQLite storage at {}", path.display());
            Ok((Arc::new(storage), Arc::new(users)))
        }
        StorageSelection::Memory => {
            warn!("Using in-memory storage - data is lost on exit");
            Ok((
                Arc::new(MemoryStorage::new()),
                Arc::new(MemoryUserStorage::new()),
            ))
        }
    }
}

fn build_gate(
    config: &Config,
    directory: Arc<dyn UserDirectory>,
) -> anyhow::Result<Arc<dyn IdentityGate>> {
    let ttl = chrono::Duration::try_hours(config.session_ttl_hours).with_context(|| {
        format!("Session lifetime of {} hours is out of range", config.session_ttl_hours)
    })?;
    let gate: Arc<dyn IdentityGate> = match &config.session_secret {
        Some(secret) => Arc::new(SignedSessionGate::new(
            secret.as_bytes().to_vec(),
            ttl,
            directory,
        )),
        None => {
            warn!("Generated a per-process session secret; sessions end when the server stops");
            Arc::new(SignedSessionGate::with_random_secret(ttl, directory))
        }
    };
    Ok(gate)
}

/// Build everything the HTTP layer needs.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let (projects, users) = build_stores(&config.storage).await?;
    let gate = build_gate(config, users.clone())?;

    Ok(AppState::new(
        Arc::new(ProjectManager::new(projects)),
        AuthService::new(users, gate),
        build_generator(config),
    )
    .with_retry(retry_policy(config)))
}
