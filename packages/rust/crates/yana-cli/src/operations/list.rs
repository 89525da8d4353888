use std::io::Write;

use anyhow::Result;
use async_trait::async_trait;

use yana_core::NoteStream;

use super::Operation;

/// Numbered listing; the numbers address the notes in the next run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOperation;

#[async_trait]
impl Operation for ListOperation {
    fn name(&self) -> &'static str {
        "list"
    }

    async fn invoke(&self, mut notes: NoteStream, out: &mut (dyn Write + Send)) -> Result<()> {
        let mut count = 0_usize;
        while let Some(note) = notes.next().await {
            count += 1;
            writeln!(out, "{count} {note}")?;
        }
        Ok(())
    }
}
