//! Language-model and embedding providers
//!
//! The chat abstraction, the OpenAI-compatible HTTP client and the retry
//! wrapper applied to rate-limited calls.

mod chat;
mod openai;
mod retry;

pub use chat::{ChatMessage, ChatModel, CompletionParams, ProviderError, Role};
pub use openai::{OpenAiClient, OpenAiEmbedder};
pub use retry::{BackoffPolicy, RetryingModel};
