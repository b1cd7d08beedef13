use crate::config::GitHubConfig;
use crate::github::{
    enrich,
    models::{ApiStatus, RateLimitResponse, RepositorySummary, SearchResults, UserSummary},
    search::{RepoSearchQuery, UserTypeFilter, MAX_QUERY_LEN},
};
use crate::{Error, Result};
use reqwest::{header, Client, StatusCode};
use tracing::{debug, error, info};

/// GitHub API client
///
/// One reqwest client with fixed default headers and timeout; every
/// operation goes through the shared GET primitive. Failures propagate
/// immediately as typed errors; there are no retries.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    authenticated: bool,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        // Add authentication if a token is provided
        if let Some(token) = &config.token {
            let auth_value = format!("token {token}");
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("Invalid GitHub token: {e}")))?,
            );
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authenticated: config.token.is_some(),
        })
    }

    /// Make a GET request to the GitHub API
    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("GitHub API request: GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            error!("GitHub API error: {} - {}", status, error_body);

            return Err(match status {
                StatusCode::NOT_FOUND => Error::NotFound("GitHub resource not found".to_string()),
                StatusCode::FORBIDDEN => {
                    Error::RateLimited("access forbidden or rate limit exceeded".to_string())
                }
                _ => Error::Upstream(format!("HTTP {status}")),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Internal(format!("Failed to parse GitHub API response: {e}")))
    }

    /// Search repositories, at most `query.limit()` results
    pub async fn search_repositories(
        &self,
        query: &RepoSearchQuery,
    ) -> Result<Vec<RepositorySummary>> {
        let params = [
            ("q", query.search_string()),
            ("sort", query.sort().as_str().to_string()),
            ("order", "desc".to_string()),
            ("per_page", query.per_page().to_string()),
        ];

        info!("Searching repositories: {}", query.search_string());

        let results: SearchResults<RepositorySummary> =
            self.get("/search/repositories", &params).await?;

        let mut items = results.items;
        items.truncate(query.limit() as usize);
        debug!("Found {} repositories", items.len());
        Ok(items)
    }

    /// Get detailed information for one repository
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositorySummary> {
        let path = format!("/repos/{owner}/{repo}");
        info!("Getting repository info: {owner}/{repo}");
        self.get(&path, &[]).await
    }

    /// Search users and organizations. Search hits carry only partial
    /// records, so each hit is upgraded to a full profile with bounded
    /// concurrency before being returned.
    pub async fn search_users(
        &self,
        query: &str,
        type_filter: Option<UserTypeFilter>,
        per_page: u32,
    ) -> Result<Vec<UserSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidArgument(
                "User search query must not be empty".to_string(),
            ));
        }
        if query.len() > MAX_QUERY_LEN {
            return Err(Error::InvalidArgument(format!(
                "User search query too long (max {MAX_QUERY_LEN} characters)"
            )));
        }

        let search_string = match type_filter {
            Some(filter) => format!("{query} type:{}", filter.as_str()),
            None => query.to_string(),
        };

        let params = [
            ("q", search_string.clone()),
            ("per_page", per_page.min(100).to_string()),
        ];

        info!("Searching users: {}", search_string);

        let results: SearchResults<UserSummary> = self.get("/search/users", &params).await?;
        debug!("Found {} users", results.items.len());

        Ok(enrich::enrich_users(self, results.items).await)
    }

    /// Get the full profile for one user or organization
    pub async fn get_user(&self, login: &str) -> Result<UserSummary> {
        let path = format!("/users/{login}");
        debug!("Getting user info: {login}");
        self.get(&path, &[]).await
    }

    /// Query the rate-limit introspection endpoint
    pub async fn rate_limit_status(&self) -> Result<ApiStatus> {
        let response: RateLimitResponse = self.get("/rate_limit", &[]).await?;
        Ok(ApiStatus {
            authenticated: self.authenticated,
            base_url: self.base_url.clone(),
            rate_limit: response.rate,
        })
    }
}
