use crate::assistant::dispatch::ToolDispatcher;
use crate::assistant::llm::{ChatMessage, ModelClient, ToolCall};
use crate::assistant::markdown::MarkdownRenderer;
use crate::assistant::tools::{self, ToolDefinition};
use crate::config::ModelConfig;
use crate::github::GitHubClient;
use crate::Result;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "\
You are a GitHub search assistant. You have the following tools available:

1. search_github_repositories - search GitHub repositories
2. get_repository_details - get detailed information about a repository (requires owner and repo)
3. search_github_users - search GitHub users and organizations
4. get_trending_repositories - list trending repositories

Strategy for handling queries:
- If the user asks about a specific user's specific project, prefer get_repository_details
- If the user asks for recommendations of a kind of project, use search_github_repositories
- If the user asks about a particular user or organization, use search_github_users
- If the user asks about popular or trending projects, use get_trending_repositories

Important:
- English search keywords give the best results
- You may call multiple tools when a broader answer helps
- Always fetch data first, then answer based on the actual data
- If nothing is found, tell the user so explicitly";

const EMPTY_ANSWER_FALLBACK: &str =
    "Sorry, I was unable to generate a response. Please try again.";

/// Result of one chat turn
pub struct ChatOutcome {
    /// Final answer rendered to sanitized HTML
    pub message_html: String,
    /// Final answer as the model produced it
    pub message_text: String,
    /// The tool calls the model issued in round one, if any
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Drives the two-round conversation: one model call, optional tool
/// execution, one final model call. Never more than two model round-trips
/// per user turn.
pub struct Assistant {
    model: ModelClient,
    dispatcher: ToolDispatcher,
    tools: Vec<ToolDefinition>,
    renderer: MarkdownRenderer,
}

impl Assistant {
    pub fn new(model_config: &ModelConfig, github: GitHubClient) -> Result<Self> {
        Ok(Self {
            model: ModelClient::new(model_config)?,
            dispatcher: ToolDispatcher::new(github),
            tools: tools::tool_definitions(),
            renderer: MarkdownRenderer::new()?,
        })
    }

    /// Handle one user message. A failing first model call propagates to
    /// the caller; after tools have run, failures degrade to a best-effort
    /// answer so the collected tool results are not lost.
    pub async fn chat(&self, user_message: &str) -> Result<ChatOutcome> {
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_message),
        ];

        info!("User message: {}", user_message);

        let assistant_message = self.model.chat(&messages, &self.tools).await?;
        let tool_calls = assistant_message.tool_calls.clone().unwrap_or_default();

        if tool_calls.is_empty() {
            let text = non_empty_or_fallback(assistant_message.content.unwrap_or_default());
            return Ok(self.outcome(text, None));
        }

        info!("Model requested {} tool call(s)", tool_calls.len());
        messages.push(assistant_message);

        // Each dispatch is self-contained; results are appended in call
        // order, tagged with the originating call id
        for call in &tool_calls {
            let envelope = self.dispatcher.execute(call).await;
            let content = serde_json::to_string(&envelope).unwrap_or_else(|_| {
                r#"{"success":false,"error":"failed to serialize tool result"}"#.to_string()
            });
            messages.push(ChatMessage::tool(call.id.clone(), content));
        }

        // Second round. Any tool calls issued here are ignored, bounding
        // every turn to exactly two model round-trips.
        match self.model.chat(&messages, &self.tools).await {
            Ok(final_message) => {
                let text = non_empty_or_fallback(final_message.content.unwrap_or_default());
                Ok(self.outcome(text, Some(tool_calls)))
            }
            Err(e) => {
                warn!("Final answer generation failed: {e}");
                let text =
                    format!("Tool calls completed, but generating the final answer failed: {e}");
                Ok(self.outcome(text, Some(tool_calls)))
            }
        }
    }

    fn outcome(&self, text: String, tool_calls: Option<Vec<ToolCall>>) -> ChatOutcome {
        ChatOutcome {
            message_html: self.renderer.render(&text),
            message_text: text,
            tool_calls,
        }
    }
}

fn non_empty_or_fallback(text: String) -> String {
    if text.trim().is_empty() {
        EMPTY_ANSWER_FALLBACK.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_answers_get_the_fallback() {
        assert_eq!(non_empty_or_fallback(String::new()), EMPTY_ANSWER_FALLBACK);
        assert_eq!(
            non_empty_or_fallback("   \n  ".to_string()),
            EMPTY_ANSWER_FALLBACK
        );
        assert_eq!(non_empty_or_fallback("ok".to_string()), "ok");
    }
}
