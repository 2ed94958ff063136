// ABOUTME: VibeSpecs binary support library
// ABOUTME: Service composition from configuration, the HTTP server, and one-shot commands

pub mod app;
pub mod commands;
pub mod server;

pub use app::{build_generator, build_state, retry_policy};
pub use server::run_server;
