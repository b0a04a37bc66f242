//! Language-model agent policy

mod parse;
mod policy;
mod prompts;

pub use parse::{answer_block, parse_group, parse_partition};
pub use policy::{AgentOptions, AgentPolicy};
pub use prompts::SYSTEM_PROMPT;
