//! Finder addressing previous-run paths by index.

use super::{Finder, FinderKind, NoteSink};
use crate::collector::Halted;
use crate::query::Query;

/// Emits `previous[n - 1]` for every query term that is an integer `n`.
///
/// Negative indices count from the end (`-1` is the last path). Zero,
/// out-of-range indices and non-integer terms emit nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexFinder;

impl Finder for IndexFinder {
    fn kind(&self) -> FinderKind {
        FinderKind::Index
    }

    fn finds(&self) -> &'static str {
        "listed during last run by their index"
    }

    fn find(
        &self,
        query: &Query,
        previous: &[String],
        sink: &mut dyn NoteSink,
    ) -> Result<(), Halted> {
        for term in query.iter() {
            let Some(index) = parse_index(term) else {
                continue;
            };
            if let Some(path) = resolve_index(index, previous) {
                tracing::info!(index, path = %path, "found by index in cache");
                sink.emit(path)?;
            }
        }
        Ok(())
    }
}

/// Parse `"12"` or `"-3"`; signs other than a leading `-` and anything
/// non-digit are rejected.
fn parse_index(term: &str) -> Option<i64> {
    let digits = term.strip_prefix('-').unwrap_or(term);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    term.parse().ok()
}

fn resolve_index(index: i64, previous: &[String]) -> Option<&String> {
    let len = previous.len();
    let offset = usize::try_from(index.unsigned_abs()).ok()?;
    if offset == 0 || offset > len {
        return None;
    }
    if index > 0 {
        previous.get(offset - 1)
    } else {
        previous.get(len - offset)
    }
}
