use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub github: GitHubConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_rate_limit: u64,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Optional personal access token; without it the API falls back to
    /// unauthenticated (heavily rate-limited) access
    pub token: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Declared for deployments that set it; the core performs no caching
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Chat-completion API key; when missing the AI chat path is disabled
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let api_rate_limit = std::env::var("API_RATE_LIMIT")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid API_RATE_LIMIT value".to_string()))?;

        let max_request_body_size = std::env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| "65536".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_REQUEST_BODY_SIZE value".to_string()))?;

        let github_base_url = std::env::var("GITHUB_BASE_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string());

        let github_timeout = std::env::var("GITHUB_API_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid GITHUB_API_TIMEOUT value".to_string()))?;

        let cache_ttl_seconds = std::env::var("CACHE_TTL")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid CACHE_TTL value".to_string()))?;

        let model_api_url = std::env::var("MODEL_API_URL")
            .unwrap_or_else(|_| "https://api.deepseek.com/chat/completions".to_string());

        let model = std::env::var("MODEL_ID").unwrap_or_else(|_| "deepseek-chat".to_string());

        let max_tokens = std::env::var("MODEL_MAX_TOKENS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MODEL_MAX_TOKENS value".to_string()))?;

        let temperature = std::env::var("MODEL_TEMPERATURE")
            .unwrap_or_else(|_| "0.7".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MODEL_TEMPERATURE value".to_string()))?;

        let model_timeout = std::env::var("MODEL_API_TIMEOUT")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MODEL_API_TIMEOUT value".to_string()))?;

        Ok(Settings {
            server: ServerConfig {
                host,
                port,
                api_rate_limit,
                max_request_body_size,
            },
            github: GitHubConfig {
                token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
                base_url: github_base_url,
                timeout_seconds: github_timeout,
                user_agent: format!("octoassist/{}", env!("CARGO_PKG_VERSION")),
                cache_ttl_seconds,
            },
            model: ModelConfig {
                api_key: std::env::var("MODEL_API_KEY")
                    .ok()
                    .filter(|k| !k.is_empty()),
                api_url: model_api_url,
                model,
                max_tokens,
                temperature,
                timeout_seconds: model_timeout,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.github.base_url.is_empty() {
            return Err(Error::Config("GitHub base URL must be set".to_string()));
        }

        if self.model.api_url.is_empty() {
            return Err(Error::Config("Model API URL must be set".to_string()));
        }

        if self.github.token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set; GitHub API access will be rate-limited");
        }

        if self.model.api_key.is_none() {
            tracing::warn!("MODEL_API_KEY not set; the AI chat endpoint will be disabled");
        }

        Ok(())
    }

    /// Check whether the AI chat path can be enabled
    pub fn ai_enabled(&self) -> bool {
        self.model.api_key.is_some()
    }
}
