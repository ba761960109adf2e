// Keyword source trait — the boundary to whatever supplies candidate words.
//
// The core only ever sees a list of candidate phrases. How a source gets
// them (HTTP scraping, a fixture file, a test stub) and what its wire format
// looks like stays behind this trait.

use anyhow::Result;
use async_trait::async_trait;

/// Supplies raw candidate phrases for a theme name.
///
/// An empty list is treated by the pipeline the same as an error: both are
/// transient and get retried.
#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn fetch_candidates(&self, theme: &str) -> Result<Vec<String>>;
}

/// Source that always answers with the same phrases. Used in tests and for
/// seeding themes offline.
pub struct StaticKeywordSource {
    candidates: Vec<String>,
}

impl StaticKeywordSource {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl KeywordSource for StaticKeywordSource {
    async fn fetch_candidates(&self, _theme: &str) -> Result<Vec<String>> {
        Ok(self.candidates.clone())
    }
}
