// Validation utilities for GitHub identifiers and search input
use crate::error::{Error, Result};

/// GitHub's own limit on login names
pub const MAX_LOGIN_LEN: usize = 39;

/// GitHub's own limit on repository names
pub const MAX_REPO_NAME_LEN: usize = 100;

/// Maximum accepted search query length
pub const MAX_QUERY_LEN: usize = 256;

/// Validate a search query string: trimmed, non-empty, bounded length
pub fn validate_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::InvalidArgument(
            "Search query must not be empty".to_string(),
        ));
    }
    if query.len() > MAX_QUERY_LEN {
        return Err(Error::InvalidArgument(format!(
            "Search query too long (max {MAX_QUERY_LEN} characters)"
        )));
    }
    Ok(query)
}

/// Validate an owner or organization login
pub fn validate_login(login: &str) -> Result<&str> {
    let login = login.trim();
    if login.is_empty() {
        return Err(Error::InvalidArgument(
            "Owner must not be empty".to_string(),
        ));
    }
    if login.len() > MAX_LOGIN_LEN {
        return Err(Error::InvalidArgument(format!(
            "Owner name too long (max {MAX_LOGIN_LEN} characters)"
        )));
    }
    Ok(login)
}

/// Validate a repository name
pub fn validate_repo_name(repo: &str) -> Result<&str> {
    let repo = repo.trim();
    if repo.is_empty() {
        return Err(Error::InvalidArgument(
            "Repository name must not be empty".to_string(),
        ));
    }
    if repo.len() > MAX_REPO_NAME_LEN {
        return Err(Error::InvalidArgument(format!(
            "Repository name too long (max {MAX_REPO_NAME_LEN} characters)"
        )));
    }
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("  rust  ").unwrap(), "rust");
        assert!(validate_query("").is_err());
        assert!(validate_query("   ").is_err());
        assert!(validate_query(&"q".repeat(257)).is_err());
        assert!(validate_query(&"q".repeat(256)).is_ok());
    }

    #[test]
    fn test_validate_login() {
        assert_eq!(validate_login("microsoft").unwrap(), "microsoft");
        assert!(validate_login("").is_err());
        // 39 is the platform limit, 40 is over it
        assert!(validate_login(&"a".repeat(39)).is_ok());
        assert!(validate_login(&"a".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_repo_name() {
        assert_eq!(validate_repo_name("vscode").unwrap(), "vscode");
        assert!(validate_repo_name(&"r".repeat(100)).is_ok());
        assert!(validate_repo_name(&"r".repeat(101)).is_err());
    }
}
