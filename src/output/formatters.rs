//! Formatting utilities for terminal output

use crate::core::{Difficulty, Word};
use crate::engine::{Observation, Response};
use colored::{ColoredString, Colorize};

/// Difficulty label in its puzzle colour
#[must_use]
pub fn difficulty_label(difficulty: Difficulty) -> ColoredString {
    let label = difficulty.label().to_uppercase();
    match difficulty {
        Difficulty::Yellow => label.yellow().bold(),
        Difficulty::Green => label.green().bold(),
        Difficulty::Blue => label.blue().bold(),
        Difficulty::Purple => label.magenta().bold(),
    }
}

/// Feedback classification, coloured by outcome
#[must_use]
pub fn response_label(response: Response) -> ColoredString {
    let text = response.to_string();
    match response {
        Response::Correct => text.green().bold(),
        Response::NearlyCorrect => text.yellow().bold(),
        Response::Incorrect => text.red().bold(),
        Response::Invalid => text.bright_black().bold(),
    }
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    // Cast is safe: values are clamped to [0, width]
    let filled = if max > 0.0 {
        ((value / max) * width as f64) as usize
    } else {
        0
    };
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Revealed categories, remaining words and guesses left
#[must_use]
pub fn render_observation(observation: &Observation) -> String {
    let mut out = String::new();

    for category in &observation.revealed {
        let words: Vec<&str> = category.words.iter().map(Word::text).collect();
        out.push_str(&format!(
            "  {:<8} {}: {}\n",
            difficulty_label(category.difficulty),
            category.description.bold(),
            words.join(", ")
        ));
    }

    if !observation.words.is_empty() {
        for row in observation.words.chunks(4) {
            let cells: Vec<String> = row.iter().map(|w| format!("{:<12}", w.text())).collect();
            out.push_str(&format!("  {}\n", cells.join(" ")));
        }
    }

    out.push_str(&format!(
        "  Guesses remaining: {}",
        "●".repeat(observation.guesses_remaining).bright_cyan()
    ));
    out
}
