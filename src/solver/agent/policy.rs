//! Conversation-driven guess policy

use super::parse::{parse_group, parse_partition};
use super::prompts;
use crate::engine::{Guess, Mode, Observation};
use crate::provider::{ChatMessage, ChatModel, CompletionParams};
use crate::solver::policy::{GuessPolicy, PolicyError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Sampling and prompting settings for the agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Prepend a system message to the conversation
    pub use_system_prompt: bool,
    /// Ask for step-by-step reasoning before the answer
    pub chain_of_thought: bool,
}

impl AgentOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 1024,
            temperature: 0.0,
            use_system_prompt: false,
            chain_of_thought: false,
        }
    }
}

/// Asks a chat model for each guess, keeping the whole conversation
pub struct AgentPolicy {
    model: Arc<dyn ChatModel>,
    mode: Mode,
    options: AgentOptions,
    seed: Option<u64>,
    messages: Vec<ChatMessage>,
    parse_failures: usize,
}

impl AgentPolicy {
    #[must_use]
    pub fn new(
        model: Arc<dyn ChatModel>,
        mode: Mode,
        options: AgentOptions,
        seed: Option<u64>,
    ) -> Self {
        Self {
            model,
            mode,
            options,
            seed,
            messages: Vec::new(),
            parse_failures: 0,
        }
    }

    /// The conversation so far
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Replies that held no usable answer
    #[must_use]
    pub const fn parse_failures(&self) -> usize {
        self.parse_failures
    }

    #[must_use]
    pub const fn options(&self) -> &AgentOptions {
        &self.options
    }

    fn push_prompt(&mut self, observation: &Observation) {
        let words = observation.word_texts().join(", ");
        let cot = self.options.chain_of_thought;

        let prompt = if self.messages.is_empty() {
            if self.options.use_system_prompt {
                self.messages.push(ChatMessage::system(prompts::SYSTEM_PROMPT));
            }
            prompts::initial(self.mode, &words, cot)
        } else {
            prompts::follow_up(
                self.mode,
                observation.response,
                &observation.message,
                &words,
                cot,
            )
        };
        self.messages.push(ChatMessage::user(prompt));
    }

    fn parse(&self, reply: &str) -> Option<Guess> {
        match self.mode {
            Mode::Iterative => parse_group(reply).map(Guess::Group),
            Mode::AllAtOnce => parse_partition(reply).map(Guess::Partition),
        }
    }
}

impl GuessPolicy for AgentPolicy {
    fn name(&self) -> &'static str {
        "agent"
    }

    fn next_guess(&mut self, observation: &Observation) -> Result<Option<Guess>, PolicyError> {
        if observation.mode != self.mode {
            return Err(PolicyError::ModeMismatch {
                policy: self.name(),
                mode: observation.mode,
            });
        }

        self.push_prompt(observation);

        let params = CompletionParams {
            model: self.options.model.clone(),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
            seed: self.seed,
        };
        let reply = self.model.complete(&self.messages, &params)?;
        debug!(model = %params.model, chars = reply.len(), "received reply");

        let guess = self.parse(&reply);
        self.messages.push(ChatMessage::assistant(reply));

        // An unparseable reply still reaches the game so it is scored invalid
        let guess = guess.unwrap_or_else(|| {
            self.parse_failures += 1;
            warn!(model = %params.model, "reply had no parseable answer");
            match self.mode {
                Mode::Iterative => Guess::Group(Vec::new()),
                Mode::AllAtOnce => Guess::Partition(Vec::new()),
            }
        });
        Ok(Some(guess))
    }
}
