use std::collections::{BTreeSet, HashSet};
use std::io::Write;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;

use yana_core::{Note, NoteStream, extract_tags};

use super::Operation;

/// Lists the tags used in notes.
///
/// Plain mode is incremental: each tag is printed the first time it is
/// seen. Sorting or listing the notes per tag needs the whole stream.
#[derive(Debug, Clone)]
pub struct TagsOperation {
    pattern: Regex,
    sort: bool,
    with_notes: bool,
}

impl TagsOperation {
    /// Tags extracted with `pattern`.
    #[must_use]
    pub fn new(pattern: Regex, sort: bool, with_notes: bool) -> Self {
        Self {
            pattern,
            sort,
            with_notes,
        }
    }

    async fn tags_of(&self, note: &Note) -> Vec<String> {
        match tokio::fs::read_to_string(note.absolute()).await {
            Ok(content) => extract_tags(&content, &self.pattern),
            Err(error) => {
                tracing::warn!(path = %note, error = %error, "cannot read note");
                Vec::new()
            }
        }
    }

    async fn print_incrementally(
        &self,
        mut notes: NoteStream,
        out: &mut (dyn Write + Send),
    ) -> Result<()> {
        let mut printed = HashSet::new();
        while let Some(note) = notes.next().await {
            for tag in self.tags_of(&note).await {
                if printed.insert(tag.clone()) {
                    writeln!(out, "#{tag}")?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Operation for TagsOperation {
    fn name(&self) -> &'static str {
        "tags"
    }

    async fn invoke(&self, notes: NoteStream, out: &mut (dyn Write + Send)) -> Result<()> {
        if !self.sort && !self.with_notes {
            return self.print_incrementally(notes, out).await;
        }

        // Tags in first-seen order, each with the notes that use it.
        let mut tags: Vec<(String, BTreeSet<String>)> = Vec::new();
        for note in notes.drain_all().await {
            let display = note.to_string();
            for tag in self.tags_of(&note).await {
                let index = match tags.iter().position(|(known, _)| *known == tag) {
                    Some(index) => index,
                    None => {
                        tags.push((tag, BTreeSet::new()));
                        tags.len() - 1
                    }
                };
                tags[index].1.insert(display.clone());
            }
        }

        if self.sort {
            tags.sort_by_cached_key(|(tag, _)| tag.to_lowercase());
        }

        for (tag, tagged) in &tags {
            writeln!(out, "#{tag}")?;
            if self.with_notes {
                for note in tagged {
                    writeln!(out, "\t{note}")?;
                }
            }
        }
        Ok(())
    }
}
