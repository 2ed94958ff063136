use std::env;
use std::path::PathBuf;

/// Get the path to the VibeSpecs data directory (~/.vibespecs)
pub fn vibespecs_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".vibespecs")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".vibespecs")
    }
}

/// Default SQLite database location (~/.vibespecs/vibespecs.db)
pub fn default_database_path() -> PathBuf {
    vibespecs_dir().join("vibespecs.db")
}
