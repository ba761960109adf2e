// Text normalizer — turns raw text into a stemmed word-frequency table.
//
// Words are maximal runs of Latin or Cyrillic letters; digits, punctuation
// and everything else act as delimiters. Each word is lowercased and stemmed,
// and only one form is counted per occurrence (the stem if there is one,
// otherwise the word) so no occurrence is counted twice.

use std::collections::HashMap;

use tracing::debug;

use super::stemmer::WordStemmer;

/// Occurrence counts of stemmed words in a single text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencyTable {
    counts: HashMap<String, u32>,
}

impl WordFrequencyTable {
    /// How many times `word` occurred (0 when absent).
    pub fn count(&self, word: &str) -> u32 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total occurrences across all words.
    pub fn total_words(&self) -> u32 {
        self.counts.values().sum()
    }

    fn record(&mut self, word: String) {
        *self.counts.entry(word).or_insert(0) += 1;
    }
}

/// Is `c` part of a word? Latin a-z and Cyrillic а-я/ё, either case.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Split text into words, dropping empty tokens.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c)).filter(|w| !w.is_empty())
}

/// Build the frequency table for `text`.
pub fn normalize(text: &str, stemmer: &dyn WordStemmer) -> WordFrequencyTable {
    let mut table = WordFrequencyTable::default();
    for word in split_words(text) {
        table.record(stemmer.stem_or_keep(&word.to_lowercase()));
    }

    debug!(
        distinct = table.len(),
        total = table.total_words(),
        "Counted words in text"
    );

    table
}
