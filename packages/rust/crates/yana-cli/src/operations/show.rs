use std::io::Write;

use anyhow::Result;
use async_trait::async_trait;

use yana_core::NoteStream;

use super::Operation;

/// Copies each note to the output, like `cat`.
#[derive(Debug, Clone, Copy)]
pub struct ShowOperation {
    header: bool,
}

impl ShowOperation {
    /// With `header`, each note's path is printed on stderr before its
    /// content (meant for interactive use only).
    #[must_use]
    pub fn new(header: bool) -> Self {
        Self { header }
    }
}

#[async_trait]
impl Operation for ShowOperation {
    fn name(&self) -> &'static str {
        "show"
    }

    async fn invoke(&self, mut notes: NoteStream, out: &mut (dyn Write + Send)) -> Result<()> {
        while let Some(note) = notes.next().await {
            let content = match tokio::fs::read(note.absolute()).await {
                Ok(content) => content,
                Err(error) => {
                    tracing::warn!(path = %note, error = %error, "cannot read note");
                    continue;
                }
            };
            if self.header {
                out.flush()?;
                eprintln!("{note}");
            }
            out.write_all(&content)?;
        }
        out.flush()?;
        Ok(())
    }
}
