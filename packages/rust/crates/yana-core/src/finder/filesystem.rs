//! Finder scanning the file system.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use super::{Finder, FinderKind, NoteSink};
use crate::collector::Halted;
use crate::pattern::NotePattern;
use crate::query::Query;

/// Characters that make a term a pattern rather than a file name.
const GLOB_META: &[char] = &['*', '?', '['];

/// Emits matching files given directly, and walks directories recursively.
///
/// Entries are visited sorted by file name so a run is deterministic.
/// Unreadable subtrees are skipped with a warning.
#[derive(Debug, Clone)]
pub struct FileSystemFinder {
    pattern: NotePattern,
    allow_new: bool,
}

impl FileSystemFinder {
    /// Finder accepting file names that match `pattern`.
    #[must_use]
    pub fn new(pattern: NotePattern) -> Self {
        Self {
            pattern,
            allow_new: false,
        }
    }

    /// Also emit terms naming files that do not exist yet, so the
    /// operation can create them.
    #[must_use]
    pub fn allow_new(mut self, allow_new: bool) -> Self {
        self.allow_new = allow_new;
        self
    }

    fn walk(&self, root: &str, sink: &mut dyn NoteSink) -> Result<(), Halted> {
        tracing::debug!(root, "walking file system");
        let walker = WalkDir::new(root).sort_by_file_name().into_iter();
        for entry in walker {
            sink.check()?;
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    let path = error.path().unwrap_or_else(|| Path::new(root));
                    tracing::warn!(
                        path = %path.display(),
                        error = %error,
                        "skipping unreadable path"
                    );
                    continue;
                }
            };
            if !is_regular_file(&entry) || !self.pattern.matches_path(entry.path()) {
                continue;
            }
            let path = entry.path().to_string_lossy();
            tracing::info!(path = %path, "found in file system");
            sink.emit(&path)?;
        }
        Ok(())
    }
}

impl Finder for FileSystemFinder {
    fn kind(&self) -> FinderKind {
        FinderKind::FileSystem
    }

    fn finds(&self) -> &'static str {
        "recursively in the file system"
    }

    fn find(
        &self,
        query: &Query,
        _previous: &[String],
        sink: &mut dyn NoteSink,
    ) -> Result<(), Halted> {
        for term in query.iter() {
            let path = Path::new(term);
            if path.is_dir() {
                self.walk(term, sink)?;
            } else if path.is_file() {
                if self.pattern.matches_path(path) {
                    tracing::info!(path = term, "found in file system");
                    sink.emit(term)?;
                }
            } else if self.allow_new
                && !path.exists()
                && !term.contains(GLOB_META)
                && self.pattern.matches_path(path)
            {
                tracing::info!(path = term, "accepting new note");
                sink.emit(term)?;
            }
        }
        Ok(())
    }
}

/// Regular files, including symlinks that point at one. Symlinked
/// directories are not descended into.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::DEFAULT_NOTE_REGEX;
    use tempfile::TempDir;

    fn finder() -> FileSystemFinder {
        FileSystemFinder::new(NotePattern::new(DEFAULT_NOTE_REGEX).unwrap())
    }

    fn run(finder: &FileSystemFinder, terms: &[&str]) -> Vec<String> {
        let query: Query = terms.iter().copied().collect();
        let mut found = Vec::new();
        finder.find(&query, &[], &mut found).unwrap_or_default();
        found
    }

    #[test]
    fn test_walks_directory_recursively() -> std::io::Result<()> {
        let temp = TempDir::new()?;
        std::fs::write(temp.path().join("a.note"), "a")?;
        std::fs::write(temp.path().join("b.txt"), "b")?;
        std::fs::create_dir(temp.path().join("sub"))?;
        std::fs::write(temp.path().join("sub/c.note"), "c")?;

        let root = temp.path().to_string_lossy().into_owned();
        let found = run(&finder(), &[root.as_str()]);

        assert_eq!(found.len(), 2, "got {found:?}");
        assert!(found[0].ends_with("a.note"));
        assert!(found[1].ends_with("c.note"));
        assert!(!found.iter().any(|f| f.ends_with("b.txt")));
        Ok(())
    }

    #[test]
    fn test_direct_file_must_match_pattern() -> std::io::Result<()> {
        let temp = TempDir::new()?;
        let note = temp.path().join("a.note");
        let text = temp.path().join("b.txt");
        std::fs::write(&note, "a")?;
        std::fs::write(&text, "b")?;

        let note = note.to_string_lossy().into_owned();
        let text = text.to_string_lossy().into_owned();
        assert_eq!(run(&finder(), &[text.as_str(), note.as_str()]), vec![note]);
        Ok(())
    }

    #[test]
    fn test_new_mode_emits_missing_notes_only() -> std::io::Result<()> {
        let temp = TempDir::new()?;
        let fresh = temp.path().join("fresh.note").to_string_lossy().into_owned();
        let wrong = temp.path().join("fresh.txt").to_string_lossy().into_owned();
        let glob = temp.path().join("*.note").to_string_lossy().into_owned();

        assert!(run(&finder(), &[fresh.as_str()]).is_empty());
        let found = run(&finder().allow_new(true), &[fresh.as_str(), wrong.as_str(), glob.as_str()]);
        assert_eq!(found, vec![fresh]);
        Ok(())
    }

    #[test]
    fn test_walk_order_is_sorted() -> std::io::Result<()> {
        let temp = TempDir::new()?;
        for name in ["c.note", "a.note", "b.note"] {
            std::fs::write(temp.path().join(name), name)?;
        }
        let root = temp.path().to_string_lossy().into_owned();
        let names: Vec<String> = run(&finder(), &[root.as_str()])
            .iter()
            .filter_map(|p| Path::new(p).file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, vec!["a.note", "b.note", "c.note"]);
        Ok(())
    }

    #[test]
    fn test_missing_path_is_silent() {
        assert!(run(&finder(), &["/definitely/not/here"]).is_empty());
    }
}
