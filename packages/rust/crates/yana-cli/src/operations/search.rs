use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use yana_core::NoteStream;

use super::Operation;

/// Prints matching lines, each prefixed by the note's path.
#[derive(Debug, Clone)]
pub struct SearchOperation {
    matcher: Regex,
}

impl SearchOperation {
    /// Search for `pattern`, taken literally unless `regex` is set.
    /// Matching ignores case unless `case_sensitive` is set.
    ///
    /// # Errors
    /// Fails when `pattern` is not a valid regular expression.
    pub fn new(pattern: &str, case_sensitive: bool, regex: bool) -> Result<Self> {
        let source = if regex {
            pattern.to_string()
        } else {
            regex::escape(pattern)
        };
        let matcher = RegexBuilder::new(&source)
            .case_insensitive(!case_sensitive)
            .build()
            .with_context(|| format!("invalid search pattern '{pattern}'"))?;
        Ok(Self { matcher })
    }

    /// Lines of `content` containing a match.
    pub fn matching_lines<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        content
            .lines()
            .filter(move |line| self.matcher.is_match(line))
    }
}

#[async_trait]
impl Operation for SearchOperation {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn invoke(&self, mut notes: NoteStream, out: &mut (dyn Write + Send)) -> Result<()> {
        while let Some(note) = notes.next().await {
            let content = match tokio::fs::read_to_string(note.absolute()).await {
                Ok(content) => content,
                Err(error) => {
                    tracing::warn!(path = %note, error = %error, "cannot read note");
                    continue;
                }
            };
            for line in self.matching_lines(&content) {
                writeln!(out, "{note}: {line}")?;
            }
        }
        Ok(())
    }
}
