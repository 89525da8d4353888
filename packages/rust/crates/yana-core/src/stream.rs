//! Consumer side of the discovery channel.

use tokio::sync::mpsc;

use crate::note::Note;

/// Ordered, deduplicated stream of discovered notes.
///
/// Supports both pulling one note at a time ([`NoteStream::next`]) and
/// draining everything ([`NoteStream::drain_all`]). The stream ends when
/// discovery completes or is cancelled.
#[derive(Debug)]
pub struct NoteStream {
    rx: mpsc::Receiver<Note>,
}

impl NoteStream {
    /// Wrap the receiving half of the note channel.
    #[must_use]
    pub fn new(rx: mpsc::Receiver<Note>) -> Self {
        Self { rx }
    }

    /// Stream over a fixed set of notes, already closed.
    #[must_use]
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let (tx, rx) = mpsc::channel(notes.len().max(1));
        for note in notes {
            // Capacity equals the number of notes, so this cannot be full.
            let _ = tx.try_send(note);
        }
        Self { rx }
    }

    /// Next note, or `None` at end of stream.
    pub async fn next(&mut self) -> Option<Note> {
        self.rx.recv().await
    }

    /// Collect every remaining note, waiting for the end of the stream.
    pub async fn drain_all(mut self) -> Vec<Note> {
        let mut notes = Vec::new();
        while let Some(note) = self.rx.recv().await {
            notes.push(note);
        }
        notes
    }
}
