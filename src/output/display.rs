//! Display functions for command results

use super::formatters::{create_progress_bar, difficulty_label};
use crate::commands::{EnumerationResult, SweepOutcome};
use crate::report::Summary;
use colored::Colorize;
use std::path::Path;

/// Print the counts of a finished sweep
pub fn print_sweep_outcome(outcome: &SweepOutcome, results: &Path) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", "SWEEP FINISHED".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    println!("   Completed:        {}", outcome.completed.to_string().green());
    println!("   Skipped:          {}", outcome.skipped);
    if outcome.failed > 0 {
        println!("   Failed:           {}", outcome.failed.to_string().red().bold());
    }
    println!("   Time taken:       {:.2}s", outcome.duration.as_secs_f64());
    println!("   Results:          {}", results.display());
}

/// Print aggregate statistics for a result file
pub fn print_summary(summary: &Summary, results: &Path) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        "SUMMARY:".bright_cyan().bold(),
        results.display().to_string().bright_yellow()
    );
    println!("{}", "═".repeat(60).cyan());

    if summary.total == 0 {
        println!("\n   No results recorded yet.");
        return;
    }

    println!("\n📊 {}", "Overall:".bright_cyan().bold());
    println!("   Playthroughs:     {}", summary.total);
    println!(
        "   Solved:           {} ({})",
        summary.solved,
        format!("{:.1}%", summary.solve_rate * 100.0)
            .bright_yellow()
            .bold()
    );
    println!("   Mean steps:       {:.2}", summary.mean_steps);
    println!("   Mean invalid:     {:.2}", summary.mean_invalid);

    println!("\n📈 {}", "By difficulty:".bright_cyan().bold());
    for (&difficulty, stats) in &summary.by_difficulty {
        let bar = create_progress_bar(stats.solve_rate, 1.0, 30);
        let solved_at = stats
            .mean_solved_at
            .map_or_else(|| "-".to_string(), |at| format!("{at:.2}"));
        println!(
            "   {:<8} {} {:5.1}%  mean solved at {}",
            difficulty_label(difficulty),
            bar.green(),
            stats.solve_rate * 100.0,
            solved_at
        );
    }
}

/// Print the result of an offline enumeration
pub fn print_enumeration_result(result: &EnumerationResult) {
    println!(
        "{} {} partitions written to {} in {:.2}s",
        "✓".green().bold(),
        result.count.to_string().bright_yellow(),
        result.path.display(),
        result.duration.as_secs_f64()
    );
}
