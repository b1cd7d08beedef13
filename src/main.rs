use clap::Parser;
use octoassist::{
    assistant::Assistant,
    cli::{Cli, Commands},
    config::Settings,
    github::GitHubClient,
    web::{routes, AppState},
    Error, Result,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    // Silently ignore if file doesn't exist
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,octoassist=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Ask { question } => {
            octoassist::cli::commands::ask(&settings, &question).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting OctoAssist server");
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    let github = GitHubClient::new(&settings.github)?;

    // The chat endpoint degrades gracefully when no model key is present;
    // the simple-form endpoints keep working either way
    let assistant = if settings.ai_enabled() {
        info!("AI chat enabled (model: {})", settings.model.model);
        Some(Arc::new(Assistant::new(&settings.model, github.clone())?))
    } else {
        info!("AI chat disabled (MODEL_API_KEY not set)");
        None
    };

    let state = AppState {
        github,
        assistant,
        settings: settings.clone(),
    };

    let app = routes::create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("OctoAssist Server");
    println!("========================================");
    println!("Status: Running");
    println!("Address: http://{addr}");
    println!(
        "AI Chat: {}",
        if settings.ai_enabled() {
            "Enabled"
        } else {
            "Disabled (set MODEL_API_KEY)"
        }
    );
    println!(
        "GitHub Auth: {}",
        if settings.github.token.is_some() {
            "Token"
        } else {
            "Anonymous (rate-limited)"
        }
    );
    println!("\nEndpoints:");
    println!("  GET  /            Chat page");
    println!("  POST /chat        Chat turn");
    println!("  GET  /search      Search forms");
    println!("  POST /search      Repository search");
    println!("  POST /repo_info   Repository detail");
    println!("  POST /search_users User search");
    println!("  GET  /health      Health check");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
