//! Ordered user query terms.

/// Query used when the user supplies none: the current directory.
const DEFAULT_QUERY: &str = ".";

/// Ordered sequence of query strings (directories, files, globs, indices).
///
/// Order matters: within a finder, terms are processed in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    /// Wrap user terms; an empty list becomes `["."]`.
    #[must_use]
    pub fn new(terms: Vec<String>) -> Self {
        if terms.is_empty() {
            return Self {
                terms: vec![DEFAULT_QUERY.to_string()],
            };
        }
        Self { terms }
    }

    /// Terms in the order given.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always false after construction; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Query {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
