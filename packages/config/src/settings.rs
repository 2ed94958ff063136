use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::constants::*;

const DEFAULT_PORT: u16 = 4001;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const MAX_SESSION_TTL_HOURS: i64 = 8760;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;
const DEFAULT_GENERATION_TEMPERATURE: f32 = 0.4;
const DEFAULT_API_URL: &str = "http://127.0.0.1:4001/api";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid storage selection: {0} (expected 'sqlite' or 'memory')")]
    InvalidStorage(String),
    #[error("Generation temperature {0} must be between 0.0 and 1.0")]
    TemperatureOutOfRange(f32),
}

/// Which project/user store backs the server.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageSelection {
    Sqlite { path: PathBuf },
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub retry_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub storage: StorageSelection,
    pub session_secret: Option<String>,
    pub session_ttl_hours: i64,
    pub generation: GenerationSettings,
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(VIBESPECS_API_PORT).or_else(|| lookup(PORT)) {
            Some(raw) => parse_value(VIBESPECS_API_PORT, &raw)?,
            None => DEFAULT_PORT,
        };
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host = lookup(VIBESPECS_API_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let cors_origin = lookup(VIBESPECS_CORS_ORIGIN).filter(|s| !s.trim().is_empty());

        let storage = match lookup(VIBESPECS_STORAGE)
            .unwrap_or_else(|| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "sqlite" => StorageSelection::Sqlite {
                path: lookup(VIBESPECS_DATABASE_URL)
                    .map(|url| PathBuf::from(url.strip_prefix("sqlite:").unwrap_or(&url)))
                    .unwrap_or_else(vibespecs_core::default_database_path),
            },
            "memory" => StorageSelection::Memory,
            other => return Err(ConfigError::InvalidStorage(other.to_string())),
        };

        let session_secret = lookup(VIBESPECS_SESSION_SECRET).filter(|s| !s.is_empty());
        if session_secret.is_none() {
            warn!(
                "{} not set - sessions will not survive a restart",
                VIBESPECS_SESSION_SECRET
            );
        }

        let session_ttl_hours = match lookup(VIBESPECS_SESSION_TTL_HOURS) {
            Some(raw) => parse_value(VIBESPECS_SESSION_TTL_HOURS, &raw)?,
            None => DEFAULT_SESSION_TTL_HOURS,
        };
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(ConfigError::InvalidValue {
                name: VIBESPECS_SESSION_TTL_HOURS,
                value: session_ttl_hours.to_string(),
            });
        }

        let temperature = match lookup(VIBESPECS_GENERATION_TEMPERATURE) {
            Some(raw) => parse_value(VIBESPECS_GENERATION_TEMPERATURE, &raw)?,
            None => DEFAULT_GENERATION_TEMPERATURE,
        };
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::TemperatureOutOfRange(temperature));
        }

        let generation = GenerationSettings {
            api_key: lookup(ANTHROPIC_API_KEY).filter(|s| !s.trim().is_empty()),
            model: lookup(ANTHROPIC_MODEL).filter(|s| !s.trim().is_empty()),
            temperature,
            timeout_secs: match lookup(VIBESPECS_GENERATION_TIMEOUT_SECS) {
                Some(raw) => parse_value(VIBESPECS_GENERATION_TIMEOUT_SECS, &raw)?,
                None => DEFAULT_GENERATION_TIMEOUT_SECS,
            },
            retry_attempts: match lookup(VIBESPECS_GENERATION_RETRIES) {
                Some(raw) => parse_value(VIBESPECS_GENERATION_RETRIES, &raw)?,
                None => 0,
            },
        };

        let api_url = lookup(VIBESPECS_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Config {
            host,
            port,
            cors_origin,
            storage,
            session_secret,
            session_ttl_hours,
            generation,
            api_url,
        })
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}
