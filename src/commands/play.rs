//! Interactive play on the terminal

use crate::core::Puzzle;
use crate::engine::{GameConfig, Guess, Mode, PuzzleGame};
use crate::output::formatters::{render_observation, response_label};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

/// Turn a line of input into a guess
///
/// Words are comma-separated; in all-at-once mode groups are separated by
/// semicolons.
#[must_use]
pub fn parse_input(mode: Mode, line: &str) -> Guess {
    let split = |group: &str| -> Vec<String> {
        group
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    };
    match mode {
        Mode::Iterative => Guess::Group(split(line)),
        Mode::AllAtOnce => Guess::Partition(line.split(';').map(split).collect()),
    }
}

/// Let a human play `puzzle` until it ends or they quit
///
/// # Errors
/// Returns an error on terminal I/O failure.
pub fn run_play(puzzle: Puzzle, config: GameConfig) -> Result<()> {
    let mode = config.mode;
    let mut game = PuzzleGame::new(puzzle, config);
    let mut observation = game.reset();

    println!("\n{}", "═".repeat(60).bright_cyan());
    println!(
        " {} {}",
        "CONNECTIONS".bright_cyan().bold(),
        format!("#{}", game.puzzle().id()).bright_yellow()
    );
    println!("{}", "═".repeat(60).bright_cyan());
    match mode {
        Mode::Iterative => println!("Enter four words separated by commas."),
        Mode::AllAtOnce => {
            println!("Enter four groups of four words: commas between words, ';' between groups.");
        }
    }
    println!("Commands: 'quit' to exit\n");

    loop {
        println!("{}", render_observation(&observation));

        let input = get_user_input("Guess")?;
        if matches!(input.to_lowercase().as_str(), "quit" | "q" | "exit") {
            println!("\nThanks for playing!\n");
            return Ok(());
        }

        let step = game.step(&parse_input(mode, &input))?;
        if let Some(response) = step.observation.response {
            println!("\n{} {}\n", response_label(response), step.observation.message);
        }
        observation = step.observation;

        if step.done {
            println!("{}", render_observation(&observation));
            if step.reward == 1 {
                println!("{}", "Puzzle solved!".green().bold());
            } else {
                println!("{}", "Out of guesses.".red().bold());
            }
            return Ok(());
        }
    }
}

/// Get user input with a prompt
fn get_user_input(prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}
