//! Finder matching previous-run paths against shell-style patterns.

use globset::{GlobBuilder, GlobMatcher};

use super::{Finder, FinderKind, NoteSink};
use crate::collector::Halted;
use crate::query::Query;

/// Emits every previous-run path matching a query term as a glob.
///
/// Only `*`, `?` and `[...]` are wildcards, as with fnmatch; braces and
/// backslashes are plain characters. `*` also crosses path separators, so
/// `*.note` matches `/x/foo.note`. A term equal to a cached path always
/// matches it, and a term that is not a valid glob is compared literally.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobFinder;

enum TermMatcher<'a> {
    Glob(GlobMatcher, &'a str),
    Literal(&'a str),
}

impl TermMatcher<'_> {
    fn is_match(&self, path: &str) -> bool {
        match self {
            Self::Glob(matcher, term) => *term == path || matcher.is_match(path),
            Self::Literal(term) => *term == path,
        }
    }
}

/// Rewrite `term` so that braces outside a character class are literal.
fn fnmatch_glob(term: &str) -> String {
    let mut glob = String::with_capacity(term.len());
    let mut in_class = false;
    let mut class_len = 0;
    for c in term.chars() {
        if in_class {
            glob.push(c);
            class_len += 1;
            // `]` right after `[` or `[!` is a member, not the end.
            if c == ']' && class_len > 1 {
                in_class = false;
            } else if c == '!' && class_len == 1 {
                class_len = 0;
            }
            continue;
        }
        match c {
            '[' => {
                in_class = true;
                class_len = 0;
                glob.push(c);
            }
            '{' => glob.push_str("[{]"),
            '}' => glob.push_str("[}]"),
            c => glob.push(c),
        }
    }
    glob
}

fn matcher_for(term: &str) -> TermMatcher<'_> {
    let built = GlobBuilder::new(&fnmatch_glob(term))
        .literal_separator(false)
        .backslash_escape(false)
        .build();
    match built {
        Ok(glob) => TermMatcher::Glob(glob.compile_matcher(), term),
        Err(error) => {
            tracing::debug!(term, error = %error, "query is not a glob; comparing literally");
            TermMatcher::Literal(term)
        }
    }
}

impl Finder for GlobFinder {
    fn kind(&self) -> FinderKind {
        FinderKind::Glob
    }

    fn finds(&self) -> &'static str {
        "listed during last run by pattern-matching paths"
    }

    fn find(
        &self,
        query: &Query,
        previous: &[String],
        sink: &mut dyn NoteSink,
    ) -> Result<(), Halted> {
        if previous.is_empty() {
            return Ok(());
        }
        for term in query.iter() {
            let matcher = matcher_for(term);
            for path in previous.iter().filter(|p| matcher.is_match(p)) {
                tracing::info!(pattern = term, path = %path, "found by match in cache");
                sink.emit(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(terms: &[&str], previous: &[&str]) -> Vec<String> {
        let query: Query = terms.iter().copied().collect();
        let previous: Vec<String> = previous.iter().map(|s| (*s).to_string()).collect();
        let mut found = Vec::new();
        GlobFinder
            .find(&query, &previous, &mut found)
            .unwrap_or_default();
        found
    }

    #[test]
    fn test_star_matches_in_cache_order() {
        let found = run(&["*.note"], &["/x/foo.note", "/x/bar.note"]);
        assert_eq!(found, vec!["/x/foo.note", "/x/bar.note"]);
    }

    #[test]
    fn test_question_mark_and_class() {
        let previous = ["/n/a1.note", "/n/a2.note", "/n/b1.note"];
        assert_eq!(run(&["/n/a?.note"], &previous), vec!["/n/a1.note", "/n/a2.note"]);
        assert_eq!(run(&["*[b]1.note"], &previous), vec!["/n/b1.note"]);
    }

    #[test]
    fn test_exact_path_without_wildcards() {
        let previous = ["/x/foo.note", "/x/bar.note"];
        assert_eq!(run(&["/x/bar.note"], &previous), vec!["/x/bar.note"]);
        assert!(run(&["bar.note"], &previous).is_empty());
    }

    #[test]
    fn test_braces_and_backslashes_are_literal() {
        let previous = ["/x/notes{1}.note", "/x/a.note", "/x/b.note", r"/x/back\slash.note"];
        assert_eq!(run(&["/x/notes{1}.note"], &previous), vec!["/x/notes{1}.note"]);
        assert!(run(&["/x/{a,b}.note"], &previous).is_empty());
        assert_eq!(run(&["*{1}*"], &previous), vec!["/x/notes{1}.note"]);
        assert_eq!(run(&[r"/x/back\slash.note"], &previous), vec![r"/x/back\slash.note"]);
        assert_eq!(run(&[r"*\s*"], &previous), vec![r"/x/back\slash.note"]);
    }

    #[test]
    fn test_classes_still_work_after_brace_rewrite() {
        let previous = ["/n/a}.note", "/n/b.note", "/n/c.note"];
        assert_eq!(run(&["/n/[!a].note"], &previous), vec!["/n/b.note", "/n/c.note"]);
        assert_eq!(run(&["/n/a[}].note"], &previous), vec!["/n/a}.note"]);
    }

    #[test]
    fn test_invalid_glob_falls_back_to_literal() {
        let previous = ["/x/[odd.note", "/x/foo.note"];
        assert_eq!(run(&["/x/[odd.note"], &previous), vec!["/x/[odd.note"]);
    }

    #[test]
    fn test_terms_processed_in_order() {
        let previous = ["/x/foo.note", "/x/bar.note"];
        let found = run(&["*bar*", "*foo*"], &previous);
        assert_eq!(found, vec!["/x/bar.note", "/x/foo.note"]);
    }
}
