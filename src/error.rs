// Domain error taxonomy for the theme-matching engine.
//
// Every variant is recoverable at the classifier boundary: the facade turns
// each one into a user-facing message, so none of these ever escape to the
// CLI or TCP layer as a raw error value.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    /// The backing theme file could not be read, parsed or written.
    #[error("theme file {path}: {reason}")]
    Storage { path: PathBuf, reason: String },

    #[error("theme {0} already exists")]
    DuplicateTheme(String),

    #[error("theme {0} does not exist")]
    UnknownTheme(String),

    #[error("theme name must not be blank")]
    InvalidThemeName,

    /// A theme must own at least one keyword once it is stored.
    #[error("no keywords collected for theme {0}")]
    NoKeywords(String),

    /// The keyword source returned nothing usable. Retried by the pipeline.
    #[error("keyword source failed for {theme}: {reason}")]
    KeywordSourceTransient { theme: String, reason: String },

    /// Only produced when a retry cap is configured.
    #[error("keyword source gave no keywords for {theme} after {attempts} attempts")]
    KeywordSourceExhausted { theme: String, attempts: u32 },

    /// No theme keyword occurs in the text, so percentages are undefined.
    #[error("no theme keywords found in the text")]
    NoMatch,

    #[error("input file {0} does not exist")]
    InputFileMissing(PathBuf),
}

impl ThemeError {
    pub(crate) fn storage(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ThemeError::Storage {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
