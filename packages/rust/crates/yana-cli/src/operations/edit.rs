use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;

use yana_core::NoteStream;

use super::Operation;

/// Opens the notes found in an external editor.
///
/// Buffered: the editor is launched only after discovery has ended, once
/// with every note or once per note with `separate`.
#[derive(Debug, Clone)]
pub struct EditOperation {
    program: String,
    args: Vec<String>,
    separate: bool,
    wait: bool,
}

impl EditOperation {
    /// Editor given as an already split command line (program first).
    ///
    /// A waited editor is killed when the operation is dropped, e.g. on
    /// interrupt.
    #[must_use]
    pub fn new(mut command: Vec<String>, separate: bool, wait: bool) -> Self {
        let program = if command.is_empty() {
            String::new()
        } else {
            command.remove(0)
        };
        Self {
            program,
            args: command,
            separate,
            wait,
        }
    }

    /// Command line for one editor launch.
    #[must_use]
    pub fn command_line(&self, paths: &[PathBuf]) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .chain(paths.iter().map(|path| path.to_string_lossy().into_owned()))
            .collect()
    }

    async fn launch(&self, paths: &[PathBuf]) -> Result<()> {
        tracing::debug!(command = ?self.command_line(paths), "executing editor");
        let mut command = Command::new(&self.program);
        command.args(&self.args).args(paths).kill_on_drop(self.wait);
        let mut child = command
            .spawn()
            .with_context(|| format!("failed to run editor '{}'", self.program))?;
        if self.wait {
            let status = child.wait().await.context("failed to wait for editor")?;
            if !status.success() {
                tracing::warn!(status = %status, "editor exited unsuccessfully");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Operation for EditOperation {
    fn name(&self) -> &'static str {
        "edit"
    }

    async fn invoke(&self, notes: NoteStream, _out: &mut (dyn Write + Send)) -> Result<()> {
        let paths: Vec<PathBuf> = notes
            .drain_all()
            .await
            .iter()
            .map(|note| note.absolute().to_path_buf())
            .collect();
        if paths.is_empty() {
            return Ok(());
        }

        if self.separate {
            for path in &paths {
                self.launch(std::slice::from_ref(path)).await?;
            }
            Ok(())
        } else {
            self.launch(&paths).await
        }
    }
}

/// Split an editor command line into words the way a POSIX shell does.
///
/// # Errors
/// Fails on an unterminated quote or escape, or an empty command.
pub fn split_command(line: &str) -> Result<Vec<String>> {
    let Some(words) = shlex::split(line) else {
        bail!("unterminated quote or escape in '{line}'");
    };
    if words.is_empty() {
        bail!("empty editor command");
    }
    Ok(words)
}
