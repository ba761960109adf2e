// Colored terminal output for classification results.
//
// The classifier itself only produces plain messages. This module draws the
// optional per-theme bar chart shown by `themescope text --chart`.

use colored::Colorize;

use super::{format_percent, title_case};
use crate::scoring::ScoreResult;

const BAR_WIDTH: usize = 20;

/// Build the `[====      ]` bar for a 0-100 percentage.
pub fn percent_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

/// Display every theme's share as a bar chart, winner highlighted.
pub fn display_scores(result: &ScoreResult) {
    let winner = result.winner();
    println!(
        "\n{}",
        format!(
            "=== Theme match ({} keyword occurrences) ===",
            result.total_matches()
        )
        .bold()
    );
    println!();

    for (i, score) in result.scores().iter().enumerate() {
        let bar = percent_bar(score.percent);
        let colored_bar = if score.name == winner.name {
            bar.bright_green()
        } else if score.percent >= 25.0 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>2}. {:<30} {} {:>6}%  ({} matches)",
            i + 1,
            title_case(&score.name).bold(),
            colored_bar,
            format_percent(score.percent),
            score.matches
        );
    }
    println!();
}
