use crate::assistant::llm::ToolCall;
use crate::assistant::tools::{self, ToolArgs, TRENDING_LIMIT, USER_SEARCH_PAGE_SIZE};
use crate::github::{
    models::AccountType, search::SortKey, GitHubClient, RepoSearchQuery, UserTypeFilter,
};
use crate::utils::validation::MAX_LOGIN_LEN;
use crate::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Uniform wrapper for tool outcomes fed back into the conversation
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResultEnvelope {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Maps model-issued tool calls to client operations.
///
/// `execute` never fails: every error, including validation failures
/// caught before any network call, is returned as a `success: false`
/// envelope so one bad tool call cannot abort the turn.
#[derive(Clone)]
pub struct ToolDispatcher {
    github: GitHubClient,
}

impl ToolDispatcher {
    pub fn new(github: GitHubClient) -> Self {
        Self { github }
    }

    pub async fn execute(&self, call: &ToolCall) -> ToolResultEnvelope {
        info!(
            tool = %call.function.name,
            args = %call.function.arguments,
            "Executing tool call"
        );

        match self.run(call).await {
            Ok(data) => {
                info!(tool = %call.function.name, "Tool call succeeded");
                ToolResultEnvelope::ok(data)
            }
            Err(e) => {
                warn!(tool = %call.function.name, "Tool call failed: {e}");
                ToolResultEnvelope::err(e.to_string())
            }
        }
    }

    async fn run(&self, call: &ToolCall) -> Result<Value> {
        let args = tools::parse_call(&call.function.name, &call.function.arguments)?;

        match args {
            ToolArgs::SearchRepositories(a) => {
                let query = RepoSearchQuery::new(&a.query, a.language, a.sort, a.limit)?;
                let repositories = self.github.search_repositories(&query).await?;
                Ok(json!({
                    "query": a.query,
                    "count": repositories.len(),
                    "repositories": repositories,
                }))
            }
            ToolArgs::GetRepositoryDetails(a) => {
                let repository = self
                    .github
                    .get_repository(a.owner.trim(), a.repo.trim())
                    .await?;
                serde_json::to_value(repository)
                    .map_err(|e| crate::Error::Internal(format!("Serialization failed: {e}")))
            }
            ToolArgs::SearchUsers(a) => {
                let query = a.query.trim();

                // A bare login gets one direct profile lookup before
                // falling back to the search API
                if !query.contains(' ') && query.len() <= MAX_LOGIN_LEN {
                    if let Ok(user) = self.github.get_user(query).await {
                        let type_matches = match a.user_type {
                            None => true,
                            Some(UserTypeFilter::User) => user.account_type == AccountType::User,
                            Some(UserTypeFilter::Org) => {
                                user.account_type == AccountType::Organization
                            }
                        };
                        if type_matches {
                            return Ok(json!({
                                "query": query,
                                "count": 1,
                                "users": [user],
                            }));
                        }
                    }
                }

                let users = self
                    .github
                    .search_users(query, a.user_type, USER_SEARCH_PAGE_SIZE)
                    .await?;
                Ok(json!({
                    "query": query,
                    "count": users.len(),
                    "users": users,
                }))
            }
            ToolArgs::GetTrendingRepositories(a) => {
                let derived = a.period.derived_query(Utc::now());
                let query =
                    RepoSearchQuery::new(&derived, a.language, SortKey::Stars, TRENDING_LIMIT)?;
                let repositories = self.github.search_repositories(&query).await?;
                Ok(json!({
                    "query": derived,
                    "period": a.period.as_str(),
                    "count": repositories.len(),
                    "repositories": repositories,
                }))
            }
        }
    }
}
