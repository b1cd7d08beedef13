use mockito::Matcher;
use octoassist::config::GitHubConfig;
use octoassist::github::{GitHubClient, RepoSearchQuery, SortKey, UserTypeFilter};
use octoassist::Error;
use serde_json::json;

fn test_config(base_url: &str) -> GitHubConfig {
    GitHubConfig {
        token: None,
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        user_agent: "octoassist-tests".to_string(),
        cache_ttl_seconds: 300,
    }
}

fn repo_json(full_name: &str, stars: u64) -> serde_json::Value {
    json!({
        "full_name": full_name,
        "description": "A test repository",
        "stargazers_count": stars,
        "forks_count": 10,
        "language": "Rust",
        "html_url": format!("https://github.com/{full_name}"),
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "size": 1024,
        "license": {"name": "MIT License"},
        "homepage": null,
        "default_branch": "main",
        "open_issues_count": 3,
        "watchers_count": stars
    })
}

fn user_json(login: &str, followers: u64) -> serde_json::Value {
    json!({
        "login": login,
        "type": "User",
        "html_url": format!("https://github.com/{login}"),
        "public_repos": 12,
        "followers": followers,
        "name": login,
        "bio": null,
        "location": null,
        "company": null
    })
}

#[tokio::test]
async fn test_repository_search_sends_expected_parameters() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "web framework language:rust".into()),
            Matcher::UrlEncoded("sort".into(), "stars".into()),
            Matcher::UrlEncoded("order".into(), "desc".into()),
            Matcher::UrlEncoded("per_page".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total_count": 2,
                "incomplete_results": false,
                "items": [repo_json("tokio-rs/axum", 17000), repo_json("actix/actix-web", 20000)]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let query = RepoSearchQuery::new(
        "web framework",
        Some("rust".to_string()),
        SortKey::Stars,
        5,
    )
    .unwrap();

    let repos = client.search_repositories(&query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].full_name, "tokio-rs/axum");
}

#[tokio::test]
async fn test_repository_search_truncates_to_requested_limit() {
    let mut server = mockito::Server::new_async().await;

    let items: Vec<_> = (0..5).map(|i| repo_json(&format!("owner/repo{i}"), 100)).collect();
    server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"total_count": 5, "items": items}).to_string())
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let query = RepoSearchQuery::new("anything", None, SortKey::Stars, 3).unwrap();

    let repos = client.search_repositories(&query).await.unwrap();
    assert_eq!(repos.len(), 3);
}

#[tokio::test]
async fn test_missing_repository_maps_to_not_found() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/repos/nobody/nothing")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let err = client.get_repository("nobody", "nothing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_forbidden_maps_to_rate_limited() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/repos/some/repo")
        .with_status(403)
        .with_body(r#"{"message": "API rate limit exceeded"}"#)
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let err = client.get_repository("some", "repo").await.unwrap_err();
    assert!(matches!(err, Error::RateLimited(_)));
}

#[tokio::test]
async fn test_server_error_maps_to_upstream() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/repos/some/repo")
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let err = client.get_repository("some", "repo").await.unwrap_err();
    assert!(matches!(err, Error::Upstream(_)));
}

#[tokio::test]
async fn test_user_search_enriches_hits_and_preserves_order() {
    let mut server = mockito::Server::new_async().await;

    // Search hits carry only identity fields
    server
        .mock("GET", "/search/users")
        .match_query(Matcher::UrlEncoded("q".into(), "rust developers".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total_count": 2,
                "items": [
                    {"login": "alice", "type": "User", "html_url": "https://github.com/alice"},
                    {"login": "bob", "type": "User", "html_url": "https://github.com/bob"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("GET", "/users/alice")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("alice", 500).to_string())
        .create_async()
        .await;

    // The second detail fetch fails; the partial hit is kept in place
    server
        .mock("GET", "/users/bob")
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let users = client.search_users("rust developers", None, 10).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].login, "alice");
    assert_eq!(users[0].followers, 500);
    assert_eq!(users[1].login, "bob");
    assert_eq!(users[1].followers, 0);
}

#[tokio::test]
async fn test_user_search_appends_type_filter() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/search/users")
        .match_query(Matcher::UrlEncoded("q".into(), "rustacean type:org".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"total_count": 0, "items": []}).to_string())
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let users = client
        .search_users("rustacean", Some(UserTypeFilter::Org), 10)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_empty_user_query_is_rejected_before_any_request() {
    let server = mockito::Server::new_async().await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let err = client.search_users("   ", None, 10).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn test_rate_limit_status_reports_authentication() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/rate_limit")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"rate": {"limit": 60, "remaining": 42, "reset": 1700000000}}).to_string(),
        )
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url())).unwrap();
    let status = client.rate_limit_status().await.unwrap();

    assert!(!status.authenticated);
    assert_eq!(status.rate_limit.limit, 60);
    assert_eq!(status.rate_limit.remaining, 42);
}
