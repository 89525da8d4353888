#![allow(clippy::doc_markdown)]

//! yana-core - Note discovery pipeline for the Yana notes CLI
//!
//! Locates plain text notes through several finder strategies and streams
//! them, deduplicated and in first-seen order, to whichever operation
//! consumes them.
//!
//! # Architecture
//!
//! ```text
//! yana-core/src/
//! ├── lib.rs          # Re-exports (this file)
//! ├── error.rs        # ConfigError, CacheError
//! ├── dirs.rs         # Config and cache directory resolution
//! ├── settings.rs     # Layered YAML settings
//! ├── note.rs         # Note identity (absolute path) and display path
//! ├── query.rs        # Ordered user query terms
//! ├── pattern.rs      # Note-name matcher
//! ├── persistence.rs  # Atomic file writes
//! ├── cache.rs        # PathCache (previous run's paths)
//! ├── finder/         # Finder trait + index, glob, filesystem variants
//! ├── collector.rs    # Deduplicating sink feeding the stream
//! ├── stream.rs       # NoteStream (consumer side of the channel)
//! └── discovery.rs    # Orchestrator running finders off the consumer task
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_util::sync::CancellationToken;
//! use yana_core::{Discovery, PathCache, Query, Settings};
//!
//! let settings = Settings::load().resolve()?;
//! let previous = PathCache::new(settings.cache_file.clone()).load();
//! let discovery = Discovery::from_settings(&settings, false);
//! let token = CancellationToken::new();
//! let (mut notes, handle) = discovery.spawn(Query::new(Vec::<String>::new()), previous, token);
//! while let Some(note) = notes.next().await {
//!     println!("{note}");
//! }
//! let outcome = handle.join().await;
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod cache;
mod collector;
mod dirs;
mod discovery;
mod error;
pub mod finder;
mod note;
mod pattern;
mod persistence;
mod query;
mod settings;
mod stream;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use cache::{CACHE_FILE_NAME, PathCache};
pub use collector::{Collector, Halted};
pub use crate::dirs::YanaDirs;
pub use discovery::{Discovery, DiscoveryHandle, DiscoveryOutcome, DiscoveryState};
pub use error::{CacheError, ConfigError};
pub use finder::{FileSystemFinder, Finder, FinderKind, GlobFinder, IndexFinder, build_finders};
pub use note::{Note, extract_tags};
pub use pattern::{DEFAULT_NOTE_REGEX, NotePattern};
pub use persistence::atomic_write_text;
pub use query::Query;
pub use settings::{DEFAULT_CHANNEL_CAPACITY, ResolvedSettings, Settings};
pub use stream::NoteStream;
