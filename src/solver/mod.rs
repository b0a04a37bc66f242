//! Guess policies for Connections puzzles
//!
//! Similarity ranking over word embeddings, the offline partition
//! enumeration it relies on, a k-means clustering baseline, and the
//! language-model agent.

pub mod agent;
pub mod clustering;
pub mod combinations;
pub mod partition;
mod policy;
pub mod ranking;
pub mod similarity;

pub use combinations::combinations4;
pub use policy::{GuessPolicy, Policy, PolicyError};
