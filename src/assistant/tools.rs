use crate::error::{Error, Result};
use crate::github::search::{SortKey, UserTypeFilter, MAX_LIMIT, MIN_LIMIT};
use crate::utils::validation;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default result count for repository search, matching the remote
/// assistant's behavior when the model omits the argument
pub const DEFAULT_SEARCH_LIMIT: u32 = 8;

/// Result count used for trending queries
pub const TRENDING_LIMIT: u32 = 10;

/// Page size for user search
pub const USER_SEARCH_PAGE_SIZE: u32 = 10;

/// One tool made available to the model: name, description and JSON
/// schema of its parameters. Registered once at construction, read-only
/// afterward.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// The closed set of tools the model may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    SearchRepositories,
    GetRepositoryDetails,
    SearchUsers,
    GetTrendingRepositories,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::SearchRepositories => "search_github_repositories",
            ToolKind::GetRepositoryDetails => "get_repository_details",
            ToolKind::SearchUsers => "search_github_users",
            ToolKind::GetTrendingRepositories => "get_trending_repositories",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "search_github_repositories" => Ok(ToolKind::SearchRepositories),
            "get_repository_details" => Ok(ToolKind::GetRepositoryDetails),
            "search_github_users" => Ok(ToolKind::SearchUsers),
            "get_trending_repositories" => Ok(ToolKind::GetTrendingRepositories),
            other => Err(Error::InvalidArgument(format!("Unknown tool: {other}"))),
        }
    }
}

/// Recency class for trending queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl Default for TrendPeriod {
    fn default() -> Self {
        TrendPeriod::Daily
    }
}

impl TrendPeriod {
    /// Derive the search query for this recency class. Daily looks for
    /// recently pushed high-star repositories; weekly and monthly for
    /// recently created ones with a lower star floor.
    pub fn derived_query(&self, now: DateTime<Utc>) -> String {
        let (field, days, min_stars) = match self {
            TrendPeriod::Daily => ("pushed", 7, 50),
            TrendPeriod::Weekly => ("created", 30, 10),
            TrendPeriod::Monthly => ("created", 90, 5),
        };
        let cutoff = (now - Duration::days(days)).format("%Y-%m-%d");
        format!("{field}:>{cutoff} stars:>{min_stars}")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendPeriod::Daily => "daily",
            TrendPeriod::Weekly => "weekly",
            TrendPeriod::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRepositoriesArgs {
    pub query: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryDetailsArgs {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchUsersArgs {
    pub query: String,
    #[serde(default)]
    pub user_type: Option<UserTypeFilter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingArgs {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub period: TrendPeriod,
}

/// A parsed and validated tool invocation
#[derive(Debug, Clone)]
pub enum ToolArgs {
    SearchRepositories(SearchRepositoriesArgs),
    GetRepositoryDetails(RepositoryDetailsArgs),
    SearchUsers(SearchUsersArgs),
    GetTrendingRepositories(TrendingArgs),
}

/// Parse a model-issued call against the matching tool's schema.
/// Everything here runs before any network call is made.
pub fn parse_call(name: &str, arguments_json: &str) -> Result<ToolArgs> {
    let kind = ToolKind::from_name(name)?;

    match kind {
        ToolKind::SearchRepositories => {
            let args: SearchRepositoriesArgs = parse_arguments(name, arguments_json)?;
            validation::validate_query(&args.query)?;
            if !(MIN_LIMIT..=MAX_LIMIT).contains(&args.limit) {
                return Err(Error::InvalidArgument(format!(
                    "Result limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
                )));
            }
            Ok(ToolArgs::SearchRepositories(args))
        }
        ToolKind::GetRepositoryDetails => {
            let args: RepositoryDetailsArgs = parse_arguments(name, arguments_json)?;
            validation::validate_login(&args.owner)?;
            validation::validate_repo_name(&args.repo)?;
            Ok(ToolArgs::GetRepositoryDetails(args))
        }
        ToolKind::SearchUsers => {
            let args: SearchUsersArgs = parse_arguments(name, arguments_json)?;
            validation::validate_query(&args.query)?;
            Ok(ToolArgs::SearchUsers(args))
        }
        ToolKind::GetTrendingRepositories => {
            let args: TrendingArgs = parse_arguments(name, arguments_json)?;
            if let Some(lang) = &args.language {
                if lang.trim().len() > 50 {
                    return Err(Error::InvalidArgument(
                        "Language name too long (max 50 characters)".to_string(),
                    ));
                }
            }
            Ok(ToolArgs::GetTrendingRepositories(args))
        }
    }
}

fn parse_arguments<T: serde::de::DeserializeOwned>(name: &str, json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| Error::InvalidArgument(format!("Invalid arguments for {name}: {e}")))
}

/// The static tool registry handed to the model on every request
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            kind: "function",
            function: FunctionSpec {
                name: "search_github_repositories",
                description: "Search GitHub repositories by keyword, optionally filtered by \
                              programming language. Returns popular repositories matching the \
                              search criteria.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search keywords (English works best), e.g. 'python web framework', 'machine learning'"
                        },
                        "language": {
                            "type": "string",
                            "description": "Optional programming language filter (python, javascript, java, etc.)"
                        },
                        "sort": {
                            "type": "string",
                            "enum": ["stars", "forks", "updated"],
                            "description": "Sort results by stars, forks, or last updated"
                        },
                        "limit": {
                            "type": "integer",
                            "description": "Number of results to return (1-20)",
                            "minimum": 1,
                            "maximum": 20
                        }
                    },
                    "required": ["query"]
                }),
            },
        },
        ToolDefinition {
            kind: "function",
            function: FunctionSpec {
                name: "get_repository_details",
                description: "Get detailed information about a specific GitHub repository, \
                              including statistics, description and license.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "owner": {
                            "type": "string",
                            "description": "Repository owner or organization name"
                        },
                        "repo": {
                            "type": "string",
                            "description": "Repository name"
                        }
                    },
                    "required": ["owner", "repo"]
                }),
            },
        },
        ToolDefinition {
            kind: "function",
            function: FunctionSpec {
                name: "search_github_users",
                description: "Search GitHub users and organizations.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Username or organization name to search for"
                        },
                        "user_type": {
                            "type": "string",
                            "enum": ["user", "org"],
                            "description": "Account type filter: user (individual) or org (organization)"
                        }
                    },
                    "required": ["query"]
                }),
            },
        },
        ToolDefinition {
            kind: "function",
            function: FunctionSpec {
                name: "get_trending_repositories",
                description: "List currently trending GitHub repositories.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "language": {
                            "type": "string",
                            "description": "Optional programming language filter (python, javascript, go, etc.)"
                        },
                        "period": {
                            "type": "string",
                            "enum": ["daily", "weekly", "monthly"],
                            "description": "Trend window, default daily"
                        }
                    },
                    "required": []
                }),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_call_rejects_unknown_tool() {
        let err = parse_call("delete_everything", "{}").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_call_applies_search_defaults() {
        let args = parse_call("search_github_repositories", r#"{"query":"rust"}"#).unwrap();
        match args {
            ToolArgs::SearchRepositories(a) => {
                assert_eq!(a.limit, DEFAULT_SEARCH_LIMIT);
                assert_eq!(a.sort, SortKey::Stars);
                assert!(a.language.is_none());
            }
            other => panic!("unexpected parse result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_call_rejects_out_of_range_limit() {
        assert!(parse_call(
            "search_github_repositories",
            r#"{"query":"rust","limit":0}"#
        )
        .is_err());
        assert!(parse_call(
            "search_github_repositories",
            r#"{"query":"rust","limit":21}"#
        )
        .is_err());
    }

    #[test]
    fn test_parse_call_rejects_bad_enum_values() {
        assert!(parse_call(
            "search_github_repositories",
            r#"{"query":"rust","sort":"popularity"}"#
        )
        .is_err());
        assert!(parse_call("get_trending_repositories", r#"{"period":"yearly"}"#).is_err());
        assert!(parse_call(
            "search_github_users",
            r#"{"query":"octocat","user_type":"robot"}"#
        )
        .is_err());
    }

    #[test]
    fn test_parse_call_rejects_oversized_owner() {
        let owner = "a".repeat(50);
        let json = format!(r#"{{"owner":"{owner}","repo":"vscode"}}"#);
        assert!(parse_call("get_repository_details", &json).is_err());
    }

    #[test]
    fn test_parse_call_rejects_missing_required_field() {
        assert!(parse_call("get_repository_details", r#"{"owner":"microsoft"}"#).is_err());
    }

    #[test]
    fn test_trending_query_derivation() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();

        assert_eq!(
            TrendPeriod::Daily.derived_query(now),
            "pushed:>2024-03-24 stars:>50"
        );
        assert_eq!(
            TrendPeriod::Weekly.derived_query(now),
            "created:>2024-03-01 stars:>10"
        );
        assert_eq!(
            TrendPeriod::Monthly.derived_query(now),
            "created:>2024-01-01 stars:>5"
        );
    }

    #[test]
    fn test_tool_definitions_have_unique_names() {
        let defs = tool_definitions();
        assert_eq!(defs.len(), 4);
        let mut names: Vec<_> = defs.iter().map(|d| d.function.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_tool_definition_serializes_as_function_schema() {
        let defs = tool_definitions();
        let json = serde_json::to_value(&defs[0]).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "search_github_repositories");
        assert_eq!(
            json["function"]["parameters"]["required"],
            serde_json::json!(["query"])
        );
    }
}
