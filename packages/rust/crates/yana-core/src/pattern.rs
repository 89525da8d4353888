//! Note-name matcher used by the filesystem finder.

use std::path::Path;

use regex::Regex;

use crate::error::ConfigError;

/// Default note-name pattern: `note`, `notes`, or anything ending in
/// `.note` / `.notes`.
pub const DEFAULT_NOTE_REGEX: &str = r"(.*\.)?notes?$";

/// Decides which file names qualify as notes.
///
/// The regex is anchored at the start of the file name (not the full path).
#[derive(Debug, Clone)]
pub struct NotePattern {
    source: String,
    regex: Regex,
}

impl NotePattern {
    /// Compile a pattern.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotePattern`] if the regex is invalid.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            ConfigError::NotePattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Pattern text as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether a bare file name matches.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Whether the file-name component of `path` matches.
    #[must_use]
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.matches_name(name))
    }
}
