//! Discovery orchestrator.
//!
//! Runs the configured finders, in priority order and one after another, on
//! a blocking task. Every emission goes through the [`Collector`], which
//! forwards distinct notes into a bounded channel read by the operation.
//!
//! ```text
//! Idle ──spawn──▶ Running ──all finders returned──▶ Completed (stream closed, cache saved)
//!                    │
//!                    └──cancel / consumer gone──▶ Cancelled (stream closed, cache untouched)
//! ```
//!
//! Because finders run sequentially, all notes accepted from finder `i`
//! reach the stream before finder `i + 1` starts.

use std::path::PathBuf;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cache::PathCache;
use crate::collector::{Collector, Halted};
use crate::finder::{Finder, build_finders};
use crate::query::Query;
use crate::settings::ResolvedSettings;
use crate::stream::NoteStream;

/// Lifecycle of a discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    /// Not started.
    Idle,
    /// Finders are running.
    Running,
    /// Every finder returned normally.
    Completed,
    /// Stopped early; the cache was left as it was.
    Cancelled,
}

/// How a discovery run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// All finders ran; the stream was closed and the cache save attempted.
    Completed {
        /// Distinct notes forwarded.
        found: usize,
        /// Whether the new cache was written.
        cache_saved: bool,
    },
    /// Stopped before all finders finished.
    Cancelled {
        /// Distinct notes forwarded before stopping.
        found: usize,
        /// What stopped the run.
        reason: Halted,
    },
}

impl DiscoveryOutcome {
    /// Distinct notes forwarded to the stream.
    #[must_use]
    pub fn found(&self) -> usize {
        match self {
            Self::Completed { found, .. } | Self::Cancelled { found, .. } => *found,
        }
    }

    /// Whether the run stopped early.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Discovery orchestrator: the producer side of a run.
pub struct Discovery {
    finders: Vec<Box<dyn Finder>>,
    cache: PathCache,
    capacity: usize,
    base: Option<PathBuf>,
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field(
                "finders",
                &self.finders.iter().map(|f| f.kind()).collect::<Vec<_>>(),
            )
            .field("cache", &self.cache)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl Discovery {
    /// Orchestrator over `finders` (already in priority order).
    ///
    /// A zero `capacity` is raised to 1.
    #[must_use]
    pub fn new(finders: Vec<Box<dyn Finder>>, cache: PathCache, capacity: usize) -> Self {
        Self {
            finders,
            cache,
            capacity: capacity.max(1),
            base: None,
        }
    }

    /// Orchestrator assembled from validated settings.
    #[must_use]
    pub fn from_settings(settings: &ResolvedSettings, allow_new: bool) -> Self {
        let finders = build_finders(&settings.finder_order, &settings.note_pattern, allow_new);
        Self::new(
            finders,
            PathCache::new(settings.cache_file.clone()),
            settings.channel_capacity,
        )
    }

    /// Resolve relative note paths against `base` instead of the current
    /// directory.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Start discovery on a blocking task and return the consumer stream
    /// together with a handle to join the producer.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(
        self,
        query: Query,
        previous: Vec<String>,
        cancel: CancellationToken,
    ) -> (NoteStream, DiscoveryHandle) {
        let (tx, rx) = mpsc::channel(self.capacity);
        let (state_tx, state_rx) = watch::channel(DiscoveryState::Idle);
        let collector = match &self.base {
            Some(base) => Collector::with_base(tx, cancel.clone(), base.clone()),
            None => Collector::new(tx, cancel.clone()),
        };

        let task = tokio::task::spawn_blocking(move || {
            self.run(&query, &previous, collector, &cancel, &state_tx)
        });

        (
            NoteStream::new(rx),
            DiscoveryHandle {
                task,
                state: state_rx,
            },
        )
    }

    /// Drive the state machine to completion on the current thread.
    fn run(
        self,
        query: &Query,
        previous: &[String],
        mut collector: Collector,
        cancel: &CancellationToken,
        state: &watch::Sender<DiscoveryState>,
    ) -> DiscoveryOutcome {
        state.send_replace(DiscoveryState::Running);
        tracing::debug!(
            finders = self.finders.len(),
            terms = query.len(),
            previous = previous.len(),
            "discovery running"
        );

        for finder in &self.finders {
            tracing::debug!(
                finder = %finder.kind(),
                finds = finder.finds(),
                "running finder"
            );
            let halted = finder
                .find(query, previous, &mut collector)
                .err()
                .or_else(|| cancel.is_cancelled().then_some(Halted::Cancelled));
            if let Some(reason) = halted {
                return Self::cancelled(collector, reason, state);
            }
        }

        state.send_replace(DiscoveryState::Completed);
        let next_paths = collector.finish();
        let found = next_paths.len();
        if found == 0 {
            tracing::info!("no notes found");
        }

        let cache_saved = match self.cache.save(&next_paths) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(error = %error, "failed to save path cache");
                false
            }
        };
        tracing::debug!(found, cache_saved, "discovery completed");
        DiscoveryOutcome::Completed { found, cache_saved }
    }

    fn cancelled(
        collector: Collector,
        reason: Halted,
        state: &watch::Sender<DiscoveryState>,
    ) -> DiscoveryOutcome {
        let found = collector.forwarded();
        state.send_replace(DiscoveryState::Cancelled);
        // Dropping the collector closes the stream.
        drop(collector.finish());
        tracing::debug!(found, %reason, "discovery cancelled; keeping previous cache");
        DiscoveryOutcome::Cancelled { found, reason }
    }
}

/// Handle to a running discovery task.
#[derive(Debug)]
pub struct DiscoveryHandle {
    task: JoinHandle<DiscoveryOutcome>,
    state: watch::Receiver<DiscoveryState>,
}

impl DiscoveryHandle {
    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DiscoveryState {
        *self.state.borrow()
    }

    /// Wait for the discovery task to terminate.
    ///
    /// A panicking finder is reported as a cancelled run so the cache is
    /// never written from a half-finished state.
    pub async fn join(self) -> DiscoveryOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!("discovery task crashed: {error}");
                DiscoveryOutcome::Cancelled {
                    found: 0,
                    reason: Halted::Cancelled,
                }
            }
        }
    }
}
