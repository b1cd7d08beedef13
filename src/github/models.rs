use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One repository record as returned by the GitHub API.
/// Immutable snapshot; never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub full_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Repository size in kilobytes
    #[serde(default)]
    pub size: u64,
    pub license: Option<License>,
    pub homepage: Option<String>,
    pub default_branch: String,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
}

/// Repository license information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub name: String,
}

/// GitHub account type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    User,
    Organization,
}

/// One user or organization record. Search hits carry only the identity
/// fields; a detail fetch fills in the statistics and profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub login: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub html_url: String,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
}

/// Envelope of the GitHub search endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults<T> {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<T>,
}

/// Response of the rate-limit introspection endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub rate: RateLimitInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

/// Summary of API connectivity, surfaced for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ApiStatus {
    pub authenticated: bool,
    pub base_url: String,
    pub rate_limit: RateLimitInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_deserializes_from_api_shape() {
        let json = r#"{
            "full_name": "microsoft/vscode",
            "description": "Visual Studio Code",
            "stargazers_count": 160000,
            "forks_count": 28000,
            "language": "TypeScript",
            "html_url": "https://github.com/microsoft/vscode",
            "created_at": "2015-09-03T20:23:38Z",
            "updated_at": "2024-01-15T08:00:00Z",
            "size": 900000,
            "license": {"name": "MIT License"},
            "homepage": "https://code.visualstudio.com",
            "default_branch": "main",
            "open_issues_count": 8000,
            "watchers_count": 160000
        }"#;

        let repo: RepositorySummary = serde_json::from_str(json).unwrap();
        assert_eq!(repo.full_name, "microsoft/vscode");
        assert_eq!(repo.stargazers_count, 160_000);
        assert_eq!(repo.license.unwrap().name, "MIT License");
        assert_eq!(repo.default_branch, "main");
    }

    #[test]
    fn test_user_search_hit_defaults_missing_statistics() {
        // The user search endpoint omits public_repos/followers
        let json = r#"{
            "login": "octocat",
            "type": "User",
            "html_url": "https://github.com/octocat"
        }"#;

        let user: UserSummary = serde_json::from_str(json).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.account_type, AccountType::User);
        assert_eq!(user.public_repos, 0);
        assert_eq!(user.followers, 0);
        assert!(user.name.is_none());
    }
}
