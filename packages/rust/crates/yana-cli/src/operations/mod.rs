//! Operations: consumers of the note stream.
//!
//! Every sub command maps to exactly one [`Operation`]; the registry is the
//! `match` in [`operation_for`]. Incremental operations act on each note as
//! it arrives, buffered ones drain the stream first.

mod edit;
mod list;
mod search;
mod show;
mod tags;

use std::io::{IsTerminal, Write};

use anyhow::Result;
use async_trait::async_trait;

use yana_core::{NoteStream, ResolvedSettings};

use crate::cli::Command;

pub use edit::{EditOperation, split_command};
pub use list::ListOperation;
pub use search::SearchOperation;
pub use show::ShowOperation;
pub use tags::TagsOperation;

/// Consumer side of a run.
///
/// `invoke` returns once the stream has ended (or earlier on an error); the
/// discovery side is joined by the caller.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Sub command name.
    fn name(&self) -> &'static str;

    /// Consume `notes`, writing user-facing output to `out`.
    async fn invoke(&self, notes: NoteStream, out: &mut (dyn Write + Send)) -> Result<()>;
}

/// Build the operation for a parsed sub command.
///
/// # Errors
/// Fails when the sub command's own arguments are invalid (e.g. a bad search
/// regex); this counts as a configuration error.
pub fn operation_for(command: &Command, settings: &ResolvedSettings) -> Result<Box<dyn Operation>> {
    let operation: Box<dyn Operation> = match command {
        Command::List { .. } => Box::new(ListOperation),
        Command::Show { .. } => Box::new(ShowOperation::new(std::io::stderr().is_terminal())),
        Command::Edit {
            separate,
            terminal,
            wait,
            ..
        } => {
            let editor = if *terminal {
                &settings.terminal_editor
            } else {
                &settings.editor
            };
            Box::new(EditOperation::new(
                split_command(editor)?,
                *separate,
                *terminal || *wait,
            ))
        }
        Command::Search {
            case,
            regex,
            pattern,
            ..
        } => Box::new(SearchOperation::new(pattern, *case, *regex)?),
        Command::Tags { sort, notes, .. } => Box::new(TagsOperation::new(
            settings.tag_pattern.clone(),
            *sort,
            *notes,
        )),
    };
    Ok(operation)
}
