//! Connections puzzle evaluation
//!
//! A puzzle engine for the Connections word-grouping game, similarity
//! baselines over word embeddings, and a language-model agent, with the
//! drivers used to sweep them over a puzzle dataset.
//!
//! # Quick Start
//!
//! ```rust
//! use connections_eval::core::PuzzleSet;
//! use connections_eval::engine::{GameConfig, Guess, PuzzleGame, Response};
//!
//! let puzzles = PuzzleSet::sample().unwrap();
//! let mut game = PuzzleGame::new(puzzles.get(1).unwrap().clone(), GameConfig::default());
//!
//! let step = game.step(&Guess::group(["Bass", "Flounder", "Salmon", "Trout"])).unwrap();
//! assert_eq!(step.observation.response, Some(Response::Correct));
//! assert_eq!(step.observation.words.len(), 12);
//! ```

// Provider credentials and endpoint
pub mod config;

// Core domain types
pub mod core;

// Puzzle state machine
pub mod engine;

// Guess policies
pub mod solver;

// Chat and embedding providers
pub mod provider;

// Command implementations
pub mod commands;

// Result files and summaries
pub mod report;

// Terminal output formatting
pub mod output;
