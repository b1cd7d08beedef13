use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum keyword length accepted for any search query
pub const MAX_QUERY_LEN: usize = 256;

/// Result count bounds exposed to callers; the remote API caps per_page at 100
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 20;

/// Sort order for repository search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Stars,
    Forks,
    Updated,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
            SortKey::Updated => "updated",
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Stars
    }
}

/// Account type filter for user search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTypeFilter {
    User,
    Org,
}

impl UserTypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserTypeFilter::User => "user",
            UserTypeFilter::Org => "org",
        }
    }
}

/// A validated repository search query
#[derive(Debug, Clone)]
pub struct RepoSearchQuery {
    keywords: String,
    language: Option<String>,
    sort: SortKey,
    limit: u32,
}

impl RepoSearchQuery {
    /// Build a query, trimming the keywords and enforcing the length and
    /// limit bounds before anything reaches the network.
    pub fn new(
        keywords: &str,
        language: Option<String>,
        sort: SortKey,
        limit: u32,
    ) -> Result<Self> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Err(Error::InvalidArgument(
                "Search keywords must not be empty".to_string(),
            ));
        }
        if keywords.len() > MAX_QUERY_LEN {
            return Err(Error::InvalidArgument(format!(
                "Search keywords too long (max {MAX_QUERY_LEN} characters)"
            )));
        }
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(Error::InvalidArgument(format!(
                "Result limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
            )));
        }

        Ok(Self {
            keywords: keywords.to_string(),
            language: language.filter(|l| !l.trim().is_empty()),
            sort,
            limit,
        })
    }

    /// Composite `q` parameter: keywords plus an optional language clause
    pub fn search_string(&self) -> String {
        match &self.language {
            Some(lang) => format!("{} language:{}", self.keywords, lang.trim()),
            None => self.keywords.clone(),
        }
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Page size sent to the API, capped at the remote maximum
    pub fn per_page(&self) -> u32 {
        self.limit.min(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_and_rejects_empty_keywords() {
        let q = RepoSearchQuery::new("  rust web  ", None, SortKey::Stars, 5).unwrap();
        assert_eq!(q.search_string(), "rust web");

        assert!(RepoSearchQuery::new("   ", None, SortKey::Stars, 5).is_err());
        assert!(RepoSearchQuery::new("", None, SortKey::Stars, 5).is_err());
    }

    #[test]
    fn test_query_appends_language_clause_only_when_present() {
        let q = RepoSearchQuery::new(
            "web framework",
            Some("python".to_string()),
            SortKey::Stars,
            8,
        )
        .unwrap();
        assert_eq!(q.search_string(), "web framework language:python");

        let q = RepoSearchQuery::new("web framework", Some("  ".to_string()), SortKey::Stars, 8)
            .unwrap();
        assert_eq!(q.search_string(), "web framework");
    }

    #[test]
    fn test_query_enforces_limit_bounds() {
        assert!(RepoSearchQuery::new("x", None, SortKey::Stars, 0).is_err());
        assert!(RepoSearchQuery::new("x", None, SortKey::Stars, 21).is_err());

        let q = RepoSearchQuery::new("x", None, SortKey::Stars, 20).unwrap();
        assert_eq!(q.per_page(), 20);
    }

    #[test]
    fn test_query_rejects_oversized_keywords() {
        let long = "a".repeat(MAX_QUERY_LEN + 1);
        assert!(RepoSearchQuery::new(&long, None, SortKey::Stars, 5).is_err());
    }
}
