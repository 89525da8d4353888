//! Deduplicating collector between the finders and the note stream.
//!
//! The collector owns the set of already forwarded notes and the list that
//! becomes the next run's path cache. It has a single owner (the discovery
//! task), so no locking is involved: first occurrence wins and forwarding
//! order equals acceptance order.

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::finder::NoteSink;
use crate::note::Note;

/// Why a finder has to stop emitting.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halted {
    /// The run was cancelled (user interrupt).
    #[error("discovery cancelled")]
    Cancelled,
    /// The consumer dropped its end of the stream.
    #[error("note consumer closed the stream")]
    ConsumerClosed,
}

/// Forwards each distinct note once, in first-seen order, and accumulates
/// the next path cache.
#[derive(Debug)]
pub struct Collector {
    seen: HashSet<PathBuf>,
    next_paths: Vec<String>,
    base: PathBuf,
    tx: mpsc::Sender<Note>,
    cancel: CancellationToken,
}

impl Collector {
    /// Collector resolving relative paths against the current directory.
    #[must_use]
    pub fn new(tx: mpsc::Sender<Note>, cancel: CancellationToken) -> Self {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_base(tx, cancel, base)
    }

    /// Collector resolving relative paths against `base`.
    #[must_use]
    pub fn with_base(tx: mpsc::Sender<Note>, cancel: CancellationToken, base: PathBuf) -> Self {
        Self {
            seen: HashSet::new(),
            next_paths: Vec::new(),
            base,
            tx,
            cancel,
        }
    }

    /// Accept one emitted path.
    ///
    /// Blocks while the channel is full. Must be called from a blocking
    /// context (not from inside an async task).
    ///
    /// # Errors
    /// Returns [`Halted`] when the run was cancelled or the consumer is gone;
    /// the path is not forwarded in that case.
    pub fn put(&mut self, raw: &str) -> Result<(), Halted> {
        if self.cancel.is_cancelled() {
            return Err(Halted::Cancelled);
        }

        let note = Note::with_base(raw, &self.base);
        if !self.seen.insert(note.absolute().to_path_buf()) {
            tracing::trace!(path = %note.absolute().display(), "dropping duplicate note");
            return Ok(());
        }

        let key = note.cache_key();
        self.tx
            .blocking_send(note)
            .map_err(|_| Halted::ConsumerClosed)?;
        self.next_paths.push(key);
        Ok(())
    }

    /// Number of distinct notes forwarded so far.
    #[must_use]
    pub fn forwarded(&self) -> usize {
        self.next_paths.len()
    }

    /// Close the stream (by dropping the sender) and hand back the paths
    /// for the next cache.
    #[must_use]
    pub fn finish(self) -> Vec<String> {
        self.next_paths
    }
}

impl NoteSink for Collector {
    fn emit(&mut self, path: &str) -> Result<(), Halted> {
        self.put(path)
    }

    fn check(&self) -> Result<(), Halted> {
        if self.cancel.is_cancelled() {
            Err(Halted::Cancelled)
        } else if self.tx.is_closed() {
            Err(Halted::ConsumerClosed)
        } else {
            Ok(())
        }
    }
}
