//! Finders: strategies that turn query terms into candidate note paths.
//!
//! A finder only communicates through its [`NoteSink`]. Finding nothing is a
//! normal, silent outcome; the only reason to return early is a [`Halted`]
//! signal from the sink.
//!
//! The set of finders is assembled explicitly by [`build_finders`] from a
//! configured priority list; adding a variant means adding a [`FinderKind`].

mod filesystem;
mod glob;
mod index;

use std::fmt;
use std::str::FromStr;

pub use filesystem::FileSystemFinder;
pub use glob::GlobFinder;
pub use index::IndexFinder;

use crate::collector::Halted;
use crate::error::ConfigError;
use crate::pattern::NotePattern;
use crate::query::Query;

/// Receiver of paths emitted by a finder.
pub trait NoteSink {
    /// Submit one candidate path.
    ///
    /// # Errors
    /// Returns [`Halted`] when the finder must stop.
    fn emit(&mut self, path: &str) -> Result<(), Halted>;

    /// Cheap cancellation probe for long-running work between emissions.
    ///
    /// # Errors
    /// Returns [`Halted`] when the finder must stop.
    fn check(&self) -> Result<(), Halted> {
        Ok(())
    }
}

/// Plain collecting sink, handy for running a finder on its own.
impl NoteSink for Vec<String> {
    fn emit(&mut self, path: &str) -> Result<(), Halted> {
        self.push(path.to_string());
        Ok(())
    }
}

/// A note-finding strategy.
pub trait Finder: Send + Sync {
    /// Which variant this is.
    fn kind(&self) -> FinderKind;

    /// Short description completing "finds notes ...".
    fn finds(&self) -> &'static str;

    /// Emit every candidate for `query`, consulting `previous` (the
    /// previous run's paths) where relevant.
    ///
    /// # Errors
    /// Propagates [`Halted`] from the sink.
    fn find(
        &self,
        query: &Query,
        previous: &[String],
        sink: &mut dyn NoteSink,
    ) -> Result<(), Halted>;
}

/// Known finder variants, in their default priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinderKind {
    /// Previous-run paths addressed by 1-based (or negative) index.
    Index,
    /// Previous-run paths matching a shell-style glob.
    Glob,
    /// Recursive file-system scan.
    FileSystem,
}

impl FinderKind {
    /// Default priority order.
    pub const DEFAULT_ORDER: [Self; 3] = [Self::Index, Self::Glob, Self::FileSystem];

    /// Configuration name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Glob => "glob",
            Self::FileSystem => "filesystem",
        }
    }
}

impl fmt::Display for FinderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "index" => Ok(Self::Index),
            "glob" | "match" => Ok(Self::Glob),
            "filesystem" | "file_system" | "fs" => Ok(Self::FileSystem),
            other => Err(ConfigError::UnknownFinder(other.to_string())),
        }
    }
}

/// Instantiate finders in the given priority order.
#[must_use]
pub fn build_finders(
    order: &[FinderKind],
    pattern: &NotePattern,
    allow_new: bool,
) -> Vec<Box<dyn Finder>> {
    order
        .iter()
        .map(|kind| -> Box<dyn Finder> {
            match kind {
                FinderKind::Index => Box::new(IndexFinder),
                FinderKind::Glob => Box::new(GlobFinder),
                FinderKind::FileSystem => {
                    Box::new(FileSystemFinder::new(pattern.clone()).allow_new(allow_new))
                }
            }
        })
        .collect()
}
