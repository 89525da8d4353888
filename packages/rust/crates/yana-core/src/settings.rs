//! Settings loader for yana.
//!
//! Loads `<config home>/settings.yaml` and merges it over built-in defaults;
//! CLI flags are merged over the file by the caller. Merge precedence is
//! overlay over base, field by field.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::cache::PathCache;
use crate::dirs::YanaDirs;
use crate::error::ConfigError;
use crate::finder::FinderKind;
use crate::pattern::{DEFAULT_NOTE_REGEX, NotePattern};

const SETTINGS_FILE_NAME: &str = "settings.yaml";
const DEFAULT_TAG_REGEX: &str = r"(?m)(?:^|[^\[])#([\w_]+)";
const DEFAULT_TERMINAL_EDITOR: &str = "nano";
const FALLBACK_EDITOR: &str = "vi";

/// Default bound of the note channel between discovery and the operation.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Raw, mergeable settings. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Regex a file name must match to count as a note.
    pub note_regex: Option<String>,
    /// Regex whose first group extracts tag names from note content.
    pub tag_regex: Option<String>,
    /// Editor command line (GUI or otherwise).
    pub editor: Option<String>,
    /// Editor command line used with `edit --terminal`.
    pub terminal_editor: Option<String>,
    /// Bound of the note channel.
    pub channel_capacity: Option<usize>,
    /// Finder priority order by name.
    pub finders: Option<Vec<String>>,
    /// Path cache file location.
    pub cache_file: Option<PathBuf>,
}

/// Validated settings, ready for a run.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Compiled note-name matcher.
    pub note_pattern: NotePattern,
    /// Compiled tag matcher.
    pub tag_pattern: Regex,
    /// Editor command line.
    pub editor: String,
    /// Terminal editor command line.
    pub terminal_editor: String,
    /// Bound of the note channel (at least 1).
    pub channel_capacity: usize,
    /// Finder priority order.
    pub finder_order: Vec<FinderKind>,
    /// Path cache file location.
    pub cache_file: PathBuf,
}

impl Settings {
    /// Merge `overlay` over `self`; set overlay fields win.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        Self {
            note_regex: overlay.note_regex.or(self.note_regex),
            tag_regex: overlay.tag_regex.or(self.tag_regex),
            editor: overlay.editor.or(self.editor),
            terminal_editor: overlay.terminal_editor.or(self.terminal_editor),
            channel_capacity: overlay.channel_capacity.or(self.channel_capacity),
            finders: overlay.finders.or(self.finders),
            cache_file: overlay.cache_file.or(self.cache_file),
        }
    }

    /// Location of the settings file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        YanaDirs::config_home().join(SETTINGS_FILE_NAME)
    }

    /// Load the settings file from the config home; see [`Settings::load_from_path`].
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(&Self::default_path())
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields defaults. Unreadable or malformed files are
    /// logged and ignored.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!(error = %error, "ignoring settings file");
                Self::default()
            }
        }
    }

    /// Read and parse `path` strictly.
    ///
    /// # Errors
    /// Returns [`ConfigError::Settings`] if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|error| ConfigError::Settings {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        let parsed: Option<Self> =
            serde_yaml::from_str(&raw).map_err(|error| ConfigError::Settings {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })?;
        Ok(parsed.unwrap_or_default())
    }

    /// Validate and fill defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for invalid patterns, unknown or repeated
    /// finder names, or a zero channel capacity.
    pub fn resolve(self) -> Result<ResolvedSettings, ConfigError> {
        let note_pattern = NotePattern::new(self.note_regex.as_deref().unwrap_or(DEFAULT_NOTE_REGEX))?;

        let tag_source = self.tag_regex.as_deref().unwrap_or(DEFAULT_TAG_REGEX);
        let tag_pattern = Regex::new(tag_source).map_err(|source| ConfigError::TagPattern {
            pattern: tag_source.to_string(),
            source,
        })?;

        let channel_capacity = self.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY);
        if channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        let finder_order = match self.finders {
            Some(names) => parse_finder_order(&names)?,
            None => FinderKind::DEFAULT_ORDER.to_vec(),
        };

        Ok(ResolvedSettings {
            note_pattern,
            tag_pattern,
            editor: self.editor.unwrap_or_else(default_editor),
            terminal_editor: self
                .terminal_editor
                .unwrap_or_else(|| DEFAULT_TERMINAL_EDITOR.to_string()),
            channel_capacity,
            finder_order,
            cache_file: self.cache_file.unwrap_or_else(PathCache::default_path),
        })
    }
}

fn parse_finder_order(names: &[String]) -> Result<Vec<FinderKind>, ConfigError> {
    let mut order = Vec::with_capacity(names.len());
    for name in names {
        let kind: FinderKind = name.parse()?;
        if order.contains(&kind) {
            return Err(ConfigError::DuplicateFinder(kind.to_string()));
        }
        order.push(kind);
    }
    Ok(order)
}

fn default_editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}
