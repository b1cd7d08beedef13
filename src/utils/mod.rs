// Shared utilities
pub mod sanitize;
pub mod validation;
