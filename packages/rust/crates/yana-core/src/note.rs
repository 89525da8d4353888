//! In-code representation of on-disk notes.
//!
//! A [`Note`] is identified by its absolute path: two notes are equal when
//! their absolute paths are equal, no matter whether they were reached by a
//! relative path, a symlink, a cache index, or a glob.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use regex::Regex;

/// A discovered note.
#[derive(Debug, Clone)]
pub struct Note {
    raw: String,
    absolute: PathBuf,
    relative: PathBuf,
}

impl Note {
    /// Build a note from a path as given by a finder, resolved against the
    /// current working directory.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_base(raw, &base)
    }

    /// Build a note, resolving relative paths against `base`.
    ///
    /// Existing files are canonicalized (symlinks resolved). Paths that do
    /// not exist yet (e.g. notes about to be created) are normalized
    /// lexically instead.
    #[must_use]
    pub fn with_base(raw: impl Into<String>, base: &Path) -> Self {
        let raw = raw.into();
        let joined = base.join(&raw);
        let absolute =
            std::fs::canonicalize(&joined).unwrap_or_else(|_| normalize_lexically(&joined));
        let base = std::fs::canonicalize(base).unwrap_or_else(|_| normalize_lexically(base));
        let relative = relative_to(&absolute, &base);
        Self {
            raw,
            absolute,
            relative,
        }
    }

    /// Path exactly as the finder produced it.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Canonical absolute path; the note's identity.
    #[must_use]
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// Path relative to the working directory, used for display.
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Absolute path as a string, the form stored in the path cache.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.absolute.to_string_lossy().into_owned()
    }

    /// Whether the note currently exists as a regular file.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.absolute.is_file()
    }

    /// Read the whole note.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the file cannot be read.
    pub fn read_to_string(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.absolute)
    }

    /// Distinct tags found in the note, in first-seen order.
    ///
    /// The first capture group of `pattern` is the tag name; patterns
    /// without groups yield the whole match.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the file cannot be read.
    pub fn tags(&self, pattern: &Regex) -> std::io::Result<Vec<String>> {
        let content = self.read_to_string()?;
        Ok(extract_tags(&content, pattern))
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.absolute == other.absolute
    }
}

impl Eq for Note {}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.absolute.hash(state);
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative.display())
    }
}

/// Distinct tag names in `content`, first-seen order.
///
/// The first capture group of `pattern` is the tag name; patterns without
/// groups yield the whole match.
///
/// Each search resumes on the last character of the previous match, so a
/// pattern that consumes the character in front of a tag (the stand-in for
/// a look-behind) still finds adjacent tags such as `#one#two`.
#[must_use]
pub fn extract_tags(content: &str, pattern: &Regex) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    let mut at = 0;
    while at <= content.len() {
        let Some(caps) = pattern.captures_at(content, at) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let tag = caps.get(1).unwrap_or(whole).as_str();
        if !tag.is_empty() && seen.insert(tag) {
            tags.push(tag.to_string());
        }

        let last_char = content[..whole.end()]
            .chars()
            .next_back()
            .map_or(0, char::len_utf8);
        let resume = whole.end() - last_char;
        at = if resume > whole.start() {
            resume
        } else {
            // Empty or single-character match: step past its start.
            whole.start()
                + content[whole.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8)
        };
    }
    tags
}

/// Resolve `.` and `..` components without touching the file system.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Express `path` relative to `base`; both must be absolute and normalized.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Different roots (e.g. another drive): nothing to share.
    if common == 0 {
        return path.to_path_buf();
    }

    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &path_parts[common..] {
        out.push(part);
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
