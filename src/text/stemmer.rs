// Stemmer adapter — swap-ready abstraction over the stemming algorithm.
//
// Keyword dictionaries and input texts are both reduced to stems before they
// are compared, so the same implementation must be used on both sides. The
// default wraps the Russian Snowball algorithm from `rust-stemmers`.

use rust_stemmers::{Algorithm, Stemmer};

/// Trait for reducing a word to its root form.
///
/// Returns `None` when the algorithm has nothing to strip; callers keep the
/// original word in that case.
pub trait WordStemmer: Send + Sync {
    fn stem(&self, word: &str) -> Option<String>;

    /// Stem `word`, falling back to the word itself.
    fn stem_or_keep(&self, word: &str) -> String {
        self.stem(word).unwrap_or_else(|| word.to_string())
    }
}

/// Russian Snowball stemmer.
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    pub fn russian() -> Self {
        Self {
            inner: Stemmer::create(Algorithm::Russian),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::russian()
    }
}

impl WordStemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> Option<String> {
        let stemmed = self.inner.stem(word);
        if stemmed.is_empty() || stemmed == word {
            None
        } else {
            Some(stemmed.into_owned())
        }
    }
}

/// Stemmer that never reduces anything. Useful in tests where exact
/// keyword matching keeps expectations readable.
pub struct IdentityStemmer;

impl WordStemmer for IdentityStemmer {
    fn stem(&self, _word: &str) -> Option<String> {
        None
    }
}
