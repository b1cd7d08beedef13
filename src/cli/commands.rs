use crate::assistant::Assistant;
use crate::config::Settings;
use crate::github::GitHubClient;
use crate::{Error, Result};

/// Run one chat turn against the configured model and print the answer
pub async fn ask(settings: &Settings, question: &str) -> Result<()> {
    if !settings.ai_enabled() {
        return Err(Error::Config(
            "MODEL_API_KEY is not set; the ask command needs a model API key".to_string(),
        ));
    }

    let github = GitHubClient::new(&settings.github)?;
    let assistant = Assistant::new(&settings.model, github)?;

    let outcome = assistant.chat(question).await?;

    if let Some(calls) = &outcome.tool_calls {
        let names: Vec<&str> = calls.iter().map(|c| c.function.name.as_str()).collect();
        eprintln!("[tools used: {}]", names.join(", "));
    }
    println!("{}", outcome.message_text);

    Ok(())
}
