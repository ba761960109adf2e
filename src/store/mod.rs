// Theme store — durable mapping from theme name to its keyword set.
//
// The whole mapping lives in memory and is written back wholesale after
// every mutation. The file is a single JSON object whose key order is the
// theme insertion order; `file::ThemeFile` keeps that order on both read and
// write so a reload reproduces the same listing and tie-breaking.
//
// Only one ThemeStore may be open per backing file. Two live instances would
// each write their own view of the mapping over the other's.

mod file;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::ThemeError;
use crate::output::title_case;
use file::ThemeFile;

/// Message returned by `list()` when no themes exist.
pub const EMPTY_LIST_MESSAGE: &str = "Список тем пуст!";

/// A named topic and its stemmed keywords (sorted, no duplicates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Theme {
    /// Build a theme, sorting and deduplicating the keywords.
    pub fn new(name: impl Into<String>, keywords: impl IntoIterator<Item = String>) -> Self {
        let mut keywords: Vec<String> = keywords.into_iter().collect();
        keywords.sort();
        keywords.dedup();
        Self {
            name: name.into(),
            keywords,
        }
    }
}

pub struct ThemeStore {
    path: PathBuf,
    themes: Vec<Theme>,
}

impl ThemeStore {
    /// Open the theme file at `path`.
    ///
    /// A missing or zero-length file is initialized to `{}`. Anything that
    /// is not a JSON object of string arrays fails with `Storage`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref().to_path_buf();
        debug!(path = %path.display(), "Checking themes file");

        let is_blank = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Created directly so it starts with default permissions.
                fs::create_dir_all(parent_dir(&path))
                    .and_then(|_| fs::File::create(&path))
                    .map_err(|e| ThemeError::storage(&path, e))?;
                true
            }
            Err(e) => return Err(ThemeError::storage(&path, e)),
        };

        if is_blank {
            warn!(path = %path.display(), "Themes file empty or not found, creating new");
            let store = Self {
                path,
                themes: Vec::new(),
            };
            store.persist()?;
            return Ok(store);
        }

        let raw = fs::read_to_string(&path).map_err(|e| ThemeError::storage(&path, e))?;
        let ThemeFile(themes) =
            serde_json::from_str(&raw).map_err(|e| ThemeError::storage(&path, e))?;

        info!(path = %path.display(), themes = themes.len(), "Themes file loaded");
        Ok(Self { path, themes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Themes in insertion order.
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a theme and persist. Fails without touching the store when the
    /// name is taken or the keyword set is empty.
    pub fn add(
        &mut self,
        name: &str,
        keywords: impl IntoIterator<Item = String>,
    ) -> Result<(), ThemeError> {
        if self.contains(name) {
            warn!(theme = name, "Theme already exists");
            return Err(ThemeError::DuplicateTheme(name.to_string()));
        }

        let theme = Theme::new(name, keywords);
        if theme.keywords.is_empty() {
            return Err(ThemeError::NoKeywords(name.to_string()));
        }

        let keyword_count = theme.keywords.len();
        self.themes.push(theme);
        if let Err(e) = self.persist() {
            self.themes.pop();
            return Err(e);
        }

        info!(theme = name, keywords = keyword_count, "Theme added");
        Ok(())
    }

    /// Remove a theme and persist.
    pub fn remove(&mut self, name: &str) -> Result<Theme, ThemeError> {
        let Some(index) = self.themes.iter().position(|t| t.name == name) else {
            warn!(theme = name, "Theme does not exist");
            return Err(ThemeError::UnknownTheme(name.to_string()));
        };

        let removed = self.themes.remove(index);
        if let Err(e) = self.persist() {
            self.themes.insert(index, removed);
            return Err(e);
        }

        info!(theme = name, "Theme removed");
        Ok(removed)
    }

    /// 1-indexed, title-cased enumeration of theme names.
    pub fn list(&self) -> String {
        if self.themes.is_empty() {
            warn!("Themes file is empty");
            return EMPTY_LIST_MESSAGE.to_string();
        }

        let mut answer = String::from("Темы:\n");
        for (i, theme) in self.themes.iter().enumerate() {
            answer.push_str(&format!("{}) {}\n", i + 1, title_case(&theme.name)));
        }
        answer
    }

    /// Write the whole mapping to the backing file.
    ///
    /// Writes a temporary file in the same directory and renames it over the
    /// backing path. The backing file's permissions are kept.
    pub fn persist(&self) -> Result<(), ThemeError> {
        let parent = parent_dir(&self.path);
        fs::create_dir_all(parent).map_err(|e| ThemeError::storage(&self.path, e))?;

        let json = serde_json::to_string(&ThemeFile::borrowed(&self.themes))
            .map_err(|e| ThemeError::storage(&self.path, e))?;

        let mut temp =
            NamedTempFile::new_in(parent).map_err(|e| ThemeError::storage(&self.path, e))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| ThemeError::storage(&self.path, e))?;
        if let Ok(meta) = fs::metadata(&self.path) {
            temp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| ThemeError::storage(&self.path, e))?;
        }
        temp.persist(&self.path)
            .map_err(|e| ThemeError::storage(&self.path, e.error))?;

        debug!(path = %self.path.display(), themes = self.themes.len(), "Themes file updated");
        Ok(())
    }
}

/// Directory holding `path`; `.` for a bare file name.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
