// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across VibeSpecs

// Server
pub const VIBESPECS_API_PORT: &str = "VIBESPECS_API_PORT";
pub const VIBESPECS_API_HOST: &str = "VIBESPECS_API_HOST";
pub const PORT: &str = "PORT"; // Legacy
pub const VIBESPECS_CORS_ORIGIN: &str = "VIBESPECS_CORS_ORIGIN";

// Storage
pub const VIBESPECS_STORAGE: &str = "VIBESPECS_STORAGE";
pub const VIBESPECS_DATABASE_URL: &str = "VIBESPECS_DATABASE_URL";

// Sessions
pub const VIBESPECS_SESSION_SECRET: &str = "VIBESPECS_SESSION_SECRET";
pub const VIBESPECS_SESSION_TTL_HOURS: &str = "VIBESPECS_SESSION_TTL_HOURS";

// Generation
pub const VIBESPECS_GENERATION_TIMEOUT_SECS: &str = "VIBESPECS_GENERATION_TIMEOUT_SECS";
pub const VIBESPECS_GENERATION_TEMPERATURE: &str = "VIBESPECS_GENERATION_TEMPERATURE";
pub const VIBESPECS_GENERATION_RETRIES: &str = "VIBESPECS_GENERATION_RETRIES";
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ANTHROPIC_MODEL: &str = "ANTHROPIC_MODEL";

// Remote client
pub const VIBESPECS_API_URL: &str = "VIBESPECS_API_URL";
