// Keyword acquisition pipeline.
//
// Candidate phrases from a KeywordSource are cleaned into a keyword set:
//
//   split on whitespace -> lowercase -> drop the theme word and anything
//   with a digit -> dedup -> stem (keep the word if there is no stem)
//   -> dedup -> sort
//
// Fetching is retried in a loop with a fixed backoff. By default there is no
// retry cap: a theme is only added once its keywords have been collected.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::traits::KeywordSource;
use crate::error::ThemeError;
use crate::text::stemmer::WordStemmer;

/// How keyword fetches are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Pause between failed attempts.
    pub backoff: Duration,
    /// Give up after this many attempts. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(3),
            max_attempts: None,
        }
    }
}

/// Turn raw candidate phrases into the sorted, deduplicated stem set for
/// `theme`.
pub fn build_keyword_set(
    theme: &str,
    candidates: &[String],
    stemmer: &dyn WordStemmer,
) -> Vec<String> {
    let theme = theme.to_lowercase();

    let words: BTreeSet<String> = candidates
        .iter()
        .flat_map(|phrase| phrase.split_whitespace())
        .map(str::to_lowercase)
        .filter(|word| *word != theme && !word.chars().any(|c| c.is_numeric()))
        .collect();
    debug!(theme = %theme, words = words.len(), "Candidate words after filtering");

    let stems: BTreeSet<String> = words.iter().map(|w| stemmer.stem_or_keep(w)).collect();
    debug!(theme = %theme, stems = stems.len(), "Keyword stems collected");

    stems.into_iter().collect()
}

/// Ask `source` for candidates until it returns a non-empty list.
///
/// Failures and empty answers are logged and retried after
/// `policy.backoff`. With `max_attempts` set, running out of attempts
/// returns `KeywordSourceExhausted`.
pub async fn acquire_candidates(
    source: &dyn KeywordSource,
    theme: &str,
    policy: &RetryPolicy,
) -> Result<Vec<String>, ThemeError> {
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let outcome = match source.fetch_candidates(theme).await {
            Ok(candidates) if !candidates.is_empty() => {
                info!(theme, entries = candidates.len(), attempts, "Collected keyword candidates");
                return Ok(candidates);
            }
            Ok(_) => ThemeError::KeywordSourceTransient {
                theme: theme.to_string(),
                reason: "empty response".to_string(),
            },
            Err(e) => ThemeError::KeywordSourceTransient {
                theme: theme.to_string(),
                reason: format!("{e:#}"),
            },
        };

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            warn!(theme, attempts, error = %outcome, "Giving up on keyword source");
            return Err(ThemeError::KeywordSourceExhausted {
                theme: theme.to_string(),
                attempts,
            });
        }

        warn!(
            theme,
            attempts,
            backoff_ms = policy.backoff.as_millis() as u64,
            error = %outcome,
            "Failed to get keywords, waiting before retry"
        );
        tokio::time::sleep(policy.backoff).await;
    }
}
