use askama::Template;
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    assistant::{Assistant, ToolCall},
    config::Settings,
    github::{
        AccountType, GitHubClient, RateLimitInfo, RepoSearchQuery, RepositorySummary, SortKey,
        UserSummary,
    },
    Error, Result,
};

/// Shared application state; constructed once at startup and injected
/// into every handler
#[derive(Clone)]
pub struct AppState {
    pub github: GitHubClient,
    pub assistant: Option<Arc<Assistant>>,
    pub settings: Settings,
}

/// Deserialize optional string, treating empty strings as None
fn deserialize_optional_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(s.to_string())),
    }
}

// ---------------------------------------------------------------------------
// AI chat surface
// ---------------------------------------------------------------------------

/// Chat page template
#[derive(Template)]
#[template(path = "chat.html")]
struct ChatTemplate {
    ai_enabled: bool,
}

#[derive(Deserialize)]
pub struct ChatForm {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// GET / - Chat page
pub async fn chat_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let template = ChatTemplate {
        ai_enabled: state.assistant.is_some(),
    };
    Ok(Html(template.render().map_err(|e| {
        Error::Internal(format!("Template render failed: {e}"))
    })?))
}

/// POST /chat - Handle one chat turn
///
/// Always answers 200 with a `{success, message, tool_calls}` body; errors
/// become a best-effort natural-language message, never a raw error code.
pub async fn chat(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Json<ChatResponse> {
    let message = form.message.trim();
    if message.is_empty() {
        return Json(ChatResponse {
            success: false,
            message: "Please enter a message.".to_string(),
            tool_calls: None,
        });
    }

    let Some(assistant) = &state.assistant else {
        return Json(ChatResponse {
            success: false,
            message: "AI chat is not configured on this server (MODEL_API_KEY is missing)."
                .to_string(),
            tool_calls: None,
        });
    };

    match assistant.chat(message).await {
        Ok(outcome) => Json(ChatResponse {
            success: true,
            message: outcome.message_html,
            tool_calls: outcome.tool_calls,
        }),
        Err(e) => {
            error!("Chat turn failed: {}", e.log_safe());
            Json(ChatResponse {
                success: false,
                message: format!("Sorry, something went wrong while handling your request: {e}"),
                tool_calls: None,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Simple-form surface (no model involved)
// ---------------------------------------------------------------------------

/// Simple search forms page
#[derive(Template)]
#[template(path = "search.html")]
struct SearchTemplate {}

#[derive(Clone)]
#[allow(dead_code)] // Fields are used by Askama templates
struct RepoCardData {
    full_name: String,
    description: String,
    stars: String,
    forks: String,
    language: String,
    html_url: String,
}

impl RepoCardData {
    fn from_summary(repo: &RepositorySummary) -> Self {
        Self {
            full_name: repo.full_name.clone(),
            description: repo
                .description
                .clone()
                .unwrap_or_else(|| "No description".to_string()),
            stars: repo.stargazers_count.to_string(),
            forks: repo.forks_count.to_string(),
            language: repo.language.clone().unwrap_or_else(|| "Unknown".to_string()),
            html_url: repo.html_url.clone(),
        }
    }
}

/// Repository search results page
#[derive(Template)]
#[template(path = "repo_results.html")]
struct RepoResultsTemplate {
    title: String,
    results: Vec<RepoCardData>,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct RepoSearchForm {
    pub query: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub language: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

/// GET /search - Simple search forms page
pub async fn search_page() -> Result<impl IntoResponse> {
    let template = SearchTemplate {};
    Ok(Html(template.render().map_err(|e| {
        Error::Internal(format!("Template render failed: {e}"))
    })?))
}

/// POST /search - Server-rendered repository search
pub async fn search_repositories(
    State(state): State<AppState>,
    Form(form): Form<RepoSearchForm>,
) -> Result<impl IntoResponse> {
    debug!("Form repository search: {}", form.query);

    let template = match run_repo_search(&state, &form).await {
        Ok(results) => RepoResultsTemplate {
            title: format!("Search results: {}", form.query),
            results,
            error: None,
        },
        Err(e) => RepoResultsTemplate {
            title: "Search failed".to_string(),
            results: vec![],
            error: Some(e.to_string()),
        },
    };

    Ok(Html(template.render().map_err(|e| {
        Error::Internal(format!("Template render failed: {e}"))
    })?))
}

async fn run_repo_search(state: &AppState, form: &RepoSearchForm) -> Result<Vec<RepoCardData>> {
    let query = RepoSearchQuery::new(&form.query, form.language.clone(), form.sort, 10)?;
    let repositories = state.github.search_repositories(&query).await?;
    Ok(repositories.iter().map(RepoCardData::from_summary).collect())
}

/// Repository detail page
#[derive(Template)]
#[template(path = "repo_detail.html")]
struct RepoDetailTemplate {
    repo: Option<RepoDetailData>,
    error: Option<String>,
}

#[derive(Clone)]
#[allow(dead_code)] // Fields are used by Askama templates
struct RepoDetailData {
    full_name: String,
    description: String,
    stars: String,
    forks: String,
    watchers: String,
    open_issues: String,
    language: String,
    size_kb: String,
    created_at: String,
    updated_at: String,
    html_url: String,
    license: String,
    homepage: String,
    default_branch: String,
}

#[derive(Deserialize)]
pub struct RepoInfoForm {
    pub owner: String,
    pub repo: String,
}

/// POST /repo_info - Server-rendered repository detail
pub async fn repository_info(
    State(state): State<AppState>,
    Form(form): Form<RepoInfoForm>,
) -> Result<impl IntoResponse> {
    debug!("Form repository detail: {}/{}", form.owner, form.repo);

    let template = match state
        .github
        .get_repository(form.owner.trim(), form.repo.trim())
        .await
    {
        Ok(repo) => RepoDetailTemplate {
            repo: Some(RepoDetailData {
                full_name: repo.full_name,
                description: repo
                    .description
                    .unwrap_or_else(|| "No description".to_string()),
                stars: repo.stargazers_count.to_string(),
                forks: repo.forks_count.to_string(),
                watchers: repo.watchers_count.to_string(),
                open_issues: repo.open_issues_count.to_string(),
                language: repo.language.unwrap_or_else(|| "Unknown".to_string()),
                size_kb: repo.size.to_string(),
                created_at: repo.created_at.format("%Y-%m-%d").to_string(),
                updated_at: repo.updated_at.format("%Y-%m-%d").to_string(),
                html_url: repo.html_url,
                license: repo
                    .license
                    .map(|l| l.name)
                    .unwrap_or_else(|| "No license".to_string()),
                homepage: repo
                    .homepage
                    .filter(|h| !h.is_empty())
                    .unwrap_or_else(|| "None".to_string()),
                default_branch: repo.default_branch,
            }),
            error: None,
        },
        Err(e) => RepoDetailTemplate {
            repo: None,
            error: Some(e.to_string()),
        },
    };

    Ok(Html(template.render().map_err(|e| {
        Error::Internal(format!("Template render failed: {e}"))
    })?))
}

/// User search results page
#[derive(Template)]
#[template(path = "user_results.html")]
struct UserResultsTemplate {
    results: Vec<UserCardData>,
    error: Option<String>,
}

#[derive(Clone)]
#[allow(dead_code)] // Fields are used by Askama templates
struct UserCardData {
    login: String,
    kind: String,
    html_url: String,
    public_repos: String,
    followers: String,
}

impl UserCardData {
    fn from_summary(user: &UserSummary) -> Self {
        Self {
            login: user.login.clone(),
            kind: match user.account_type {
                AccountType::User => "User".to_string(),
                AccountType::Organization => "Organization".to_string(),
            },
            html_url: user.html_url.clone(),
            public_repos: user.public_repos.to_string(),
            followers: user.followers.to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct UserSearchForm {
    pub user_query: String,
}

/// POST /search_users - Server-rendered user search
pub async fn search_users(
    State(state): State<AppState>,
    Form(form): Form<UserSearchForm>,
) -> Result<impl IntoResponse> {
    debug!("Form user search: {}", form.user_query);

    let template = match state.github.search_users(&form.user_query, None, 10).await {
        Ok(users) => UserResultsTemplate {
            results: users.iter().map(UserCardData::from_summary).collect(),
            error: None,
        },
        Err(e) => UserResultsTemplate {
            results: vec![],
            error: Some(e.to_string()),
        },
    };

    Ok(Html(template.render().map_err(|e| {
        Error::Internal(format!("Template render failed: {e}"))
    })?))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub ai_enabled: bool,
    pub github_authenticated: bool,
    /// Current GitHub API quota; None when the introspection call fails
    pub rate_limit: Option<RateLimitInfo>,
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let rate_limit = match state.github.rate_limit_status().await {
        Ok(status) => Some(status.rate_limit),
        Err(e) => {
            debug!("Rate limit lookup failed: {e}");
            None
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        ai_enabled: state.assistant.is_some(),
        github_authenticated: state.settings.github.token.is_some(),
        rate_limit,
    })
}
