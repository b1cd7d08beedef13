pub mod chat;
pub mod dispatch;
pub mod llm;
pub mod markdown;
pub mod tools;

pub use chat::{Assistant, ChatOutcome};
pub use dispatch::{ToolDispatcher, ToolResultEnvelope};
pub use llm::{ChatMessage, ModelClient, Role, ToolCall};
pub use markdown::MarkdownRenderer;
pub use tools::{ToolDefinition, ToolKind, TrendPeriod};
