// Classifier facade — the single entry point used by the CLI and the TCP
// server.
//
// Owns the one ThemeStore for its backing file, the stemmer and the keyword
// source. Every public operation returns a ready-to-print message; domain
// errors are turned into text here and never leave this module as values.
//
// Concurrency: the store sits behind an async RwLock. Listing and
// classification share read access. Adding and removing take the write lock
// because they rewrite the backing file. Keyword acquisition for a new theme
// runs without holding the lock, and the duplicate check is repeated once
// the write lock is taken.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::error::ThemeError;
use crate::keywords::pipeline::{acquire_candidates, build_keyword_set, RetryPolicy};
use crate::keywords::traits::KeywordSource;
use crate::output::{format_classification, UNDETERMINED_MESSAGE};
use crate::scoring;
use crate::store::ThemeStore;
use crate::text::normalize::normalize;
use crate::text::stemmer::WordStemmer;

pub struct Classifier {
    store: RwLock<ThemeStore>,
    stemmer: Arc<dyn WordStemmer>,
    source: Arc<dyn KeywordSource>,
    retry: RetryPolicy,
}

impl Classifier {
    /// Build the classifier around an already loaded store.
    ///
    /// Create exactly one per theme file and share it (e.g. via `Arc`).
    pub fn new(
        store: ThemeStore,
        stemmer: Arc<dyn WordStemmer>,
        source: Arc<dyn KeywordSource>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store: RwLock::new(store),
            stemmer,
            source,
            retry,
        }
    }

    /// Fetch keywords for `name` and store it as a new theme.
    pub async fn add_theme(&self, name: &str) -> String {
        match self.try_add_theme(name).await {
            Ok(()) => format!("Тема {name} успешно добавлена!"),
            Err(e) => error_message(&e),
        }
    }

    /// Delete the theme called `name`.
    pub async fn remove_theme(&self, name: &str) -> String {
        match self.store.write().await.remove(name) {
            Ok(_) => format!("Тема {name} удалена!"),
            Err(e) => error_message(&e),
        }
    }

    /// Enumerate stored themes.
    pub async fn list_themes(&self) -> String {
        self.store.read().await.list()
    }

    /// Classify a piece of text.
    pub async fn classify(&self, text: &str) -> String {
        match self.score_text(text).await {
            Ok(result) => {
                let winner = result.winner();
                info!(theme = %winner.name, percent = winner.percent, "Text theme determined");
                format_classification(&result)
            }
            Err(e) => error_message(&e),
        }
    }

    /// Classify the contents of a UTF-8 text file.
    pub async fn classify_file(&self, path: &Path) -> String {
        info!(path = %path.display(), "Reading input file");
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                error!(path = %path.display(), "Input file not found");
                return error_message(&ThemeError::InputFileMissing(path.to_path_buf()));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read input file");
                return format!("Ошибка: не удалось прочитать файл {}: {e}", path.display());
            }
        };
        self.classify(&text).await
    }

    /// Score `text` against the current store.
    pub async fn score_text(&self, text: &str) -> Result<scoring::ScoreResult, ThemeError> {
        let table = normalize(text, self.stemmer.as_ref());
        let store = self.store.read().await;
        scoring::score(&table, &store)
    }

    async fn try_add_theme(&self, name: &str) -> Result<(), ThemeError> {
        if name.trim().is_empty() {
            return Err(ThemeError::InvalidThemeName);
        }
        info!(theme = name, "Adding theme");

        // Reject duplicates before any network I/O.
        if self.store.read().await.contains(name) {
            return Err(ThemeError::DuplicateTheme(name.to_string()));
        }

        let candidates = acquire_candidates(self.source.as_ref(), name, &self.retry).await?;
        let mut keywords = build_keyword_set(name, &candidates, self.stemmer.as_ref());
        // A theme always matches its own name.
        keywords.push(self.stemmer.stem_or_keep(&name.to_lowercase()));
        info!(theme = name, keywords = keywords.len(), "Collected key words for theme");

        self.store.write().await.add(name, keywords)
    }
}

/// User-facing text for a domain error.
fn error_message(err: &ThemeError) -> String {
    match err {
        ThemeError::DuplicateTheme(name) => format!("Тема {name} уже существует!"),
        ThemeError::UnknownTheme(name) => format!("Тема {name} не существует!"),
        ThemeError::InvalidThemeName => "Название темы не может быть пустым!".to_string(),
        ThemeError::NoKeywords(name) => {
            format!("Не удалось собрать ключевые слова для темы {name}!")
        }
        ThemeError::KeywordSourceExhausted { theme, attempts } => format!(
            "Не удалось получить ключевые слова для темы {theme} (попыток: {attempts})"
        ),
        ThemeError::NoMatch => {
            warn!("No theme keywords matched");
            UNDETERMINED_MESSAGE.to_string()
        }
        ThemeError::InputFileMissing(path) => {
            format!("Файла с текстом не существует: {}", path.display())
        }
        ThemeError::Storage { .. } | ThemeError::KeywordSourceTransient { .. } => {
            error!(error = %err, "Request failed");
            format!("Ошибка: {err}")
        }
    }
}
