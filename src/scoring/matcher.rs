// Theme match scoring.
//
// For every theme we add up how often its keywords occur in the text, then
// express each theme's total as a share of the total across all themes:
//
//   percent(theme) = round(matches(theme) / sum(matches) * 100, 2)
//
// The denominator is the number of matched occurrences, not the number of
// words in the text, so the percentages describe relative matching strength
// between themes and always sum to ~100.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ThemeError;
use crate::store::ThemeStore;
use crate::text::normalize::WordFrequencyTable;

/// One theme's share of the matched keyword occurrences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeScore {
    pub name: String,
    /// Raw number of keyword occurrences found in the text.
    pub matches: u32,
    /// Share of all matches, 0-100 with two decimals.
    pub percent: f64,
}

/// Per-theme scores in theme insertion order. Only `score` builds one, and
/// only when at least one keyword matched, so `scores` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    scores: Vec<ThemeScore>,
    total_matches: u32,
}

impl ScoreResult {
    pub fn scores(&self) -> &[ThemeScore] {
        &self.scores
    }

    /// Matched keyword occurrences across all themes. Always non-zero.
    pub fn total_matches(&self) -> u32 {
        self.total_matches
    }

    /// The highest-scoring theme. Ties go to the theme inserted first.
    pub fn winner(&self) -> &ThemeScore {
        let mut best = &self.scores[0];
        for candidate in &self.scores[1..] {
            if candidate.percent > best.percent {
                best = candidate;
            }
        }
        best
    }

    pub fn get(&self, name: &str) -> Option<&ThemeScore> {
        self.scores.iter().find(|s| s.name == name)
    }
}

/// Round to two decimal places, exact halves to the even digit.
///
/// Goes through the decimal formatter, which rounds the exact binary value:
/// 3.125 becomes 3.12 and 96.875 becomes 96.88.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Score the frequency table against every theme in the store.
///
/// Fails with `NoMatch` when no keyword of any theme occurs in the text,
/// including when the store has no themes.
pub fn score(table: &WordFrequencyTable, store: &ThemeStore) -> Result<ScoreResult, ThemeError> {
    let counts: Vec<(&str, u32)> = store
        .themes()
        .iter()
        .map(|theme| {
            let matches: u32 = theme.keywords.iter().map(|kw| table.count(kw)).sum();
            debug!(theme = %theme.name, matches, "Matching occurrences for theme");
            (theme.name.as_str(), matches)
        })
        .collect();

    let total_matches: u32 = counts.iter().map(|(_, m)| m).sum();
    info!(themes = counts.len(), total_matches, "Keyword occurrences counted");

    if total_matches == 0 {
        return Err(ThemeError::NoMatch);
    }

    let scores: Vec<ThemeScore> = counts
        .into_iter()
        .map(|(name, matches)| ThemeScore {
            name: name.to_string(),
            matches,
            percent: round2(matches as f64 / total_matches as f64 * 100.0),
        })
        .collect();

    info!(
        percentages = %scores
            .iter()
            .map(|s| format!("{}={}", s.name, s.percent))
            .collect::<Vec<_>>()
            .join(", "),
        "Theme percentages"
    );

    Ok(ScoreResult {
        scores,
        total_matches,
    })
}
