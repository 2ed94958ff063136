// ABOUTME: Configuration for the VibeSpecs server and CLI
// ABOUTME: Environment variable names and typed, validated settings with defaults

pub mod constants;
pub mod settings;

pub use settings::{Config, ConfigError, GenerationSettings, StorageSelection};
