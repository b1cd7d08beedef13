pub mod client;
pub mod enrich;
pub mod models;
pub mod search;

pub use client::GitHubClient;
pub use models::{AccountType, ApiStatus, License, RateLimitInfo, RepositorySummary, UserSummary};
pub use search::{RepoSearchQuery, SortKey, UserTypeFilter};
