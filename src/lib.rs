pub mod config;
pub mod error;

// GitHub API client
pub mod github;

// Model orchestration
pub mod assistant;

// HTTP surface
pub mod web;

// CLI
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
