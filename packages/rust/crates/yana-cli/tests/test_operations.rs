//! Output of the operations, fed from a fixed note stream.

use std::path::Path;

use tempfile::TempDir;

use yana_cli::Operation;
use yana_cli::operations::{
    EditOperation, ListOperation, SearchOperation, TagsOperation, split_command,
};
use yana_core::{Note, NoteStream, Settings};

fn notes_in(dir: &Path, files: &[(&str, &str)]) -> NoteStream {
    let notes = files
        .iter()
        .map(|(name, content)| {
            std::fs::write(dir.join(name), content).unwrap();
            Note::with_base(*name, dir)
        })
        .collect();
    NoteStream::from_notes(notes)
}

async fn output_of(operation: &dyn Operation, notes: NoteStream) -> String {
    let mut out: Vec<u8> = Vec::new();
    operation.invoke(notes, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn tag_operation(sort: bool, with_notes: bool) -> TagsOperation {
    let settings = Settings::default().resolve().unwrap();
    TagsOperation::new(settings.tag_pattern, sort, with_notes)
}

const TAGGED: &[(&str, &str)] = &[
    ("a.note", "#work #home\nsome text\n"),
    ("b.note", "#Zeta #work [#skip] #alpha\n"),
];

#[tokio::test]
async fn test_list_numbers_notes_from_one() {
    let temp = TempDir::new().unwrap();
    let notes = notes_in(temp.path(), &[("b.note", ""), ("a.note", ""), ("c.note", "")]);

    let out = output_of(&ListOperation, notes).await;
    assert_eq!(out, "1 b.note\n2 a.note\n3 c.note\n");
}

#[tokio::test]
async fn test_search_prefixes_matching_lines_with_path() {
    let temp = TempDir::new().unwrap();
    let notes = notes_in(
        temp.path(),
        &[
            ("a.note", "call Bob\nbuy milk\n"),
            ("b.note", "nothing\n"),
            ("c.note", "BUY bread\n"),
        ],
    );
    let search = SearchOperation::new("buy", false, false).unwrap();

    let out = output_of(&search, notes).await;
    assert_eq!(out, "a.note: buy milk\nc.note: BUY bread\n");
}

#[tokio::test]
async fn test_search_skips_unreadable_notes() {
    let temp = TempDir::new().unwrap();
    let notes = NoteStream::from_notes(vec![Note::with_base("missing.note", temp.path())]);
    let search = SearchOperation::new("x", false, false).unwrap();

    assert_eq!(output_of(&search, notes).await, "");
}

#[tokio::test]
async fn test_tags_first_seen_order_without_repeats() {
    let temp = TempDir::new().unwrap();
    let out = output_of(&tag_operation(false, false), notes_in(temp.path(), TAGGED)).await;
    assert_eq!(out, "#work\n#home\n#Zeta\n#alpha\n");
}

#[tokio::test]
async fn test_tags_sorted_case_insensitively() {
    let temp = TempDir::new().unwrap();
    let out = output_of(&tag_operation(true, false), notes_in(temp.path(), TAGGED)).await;
    assert_eq!(out, "#alpha\n#home\n#work\n#Zeta\n");
}

#[tokio::test]
async fn test_tags_with_notes() {
    let temp = TempDir::new().unwrap();
    let out = output_of(&tag_operation(true, true), notes_in(temp.path(), TAGGED)).await;
    assert_eq!(
        out,
        "#alpha\n\tb.note\n#home\n\ta.note\n#work\n\ta.note\n\tb.note\n#Zeta\n\tb.note\n"
    );
}

#[tokio::test]
async fn test_edit_without_notes_launches_nothing() {
    let editor = EditOperation::new(
        split_command("/definitely/not/an/editor").unwrap(),
        false,
        true,
    );
    let out = output_of(&editor, NoteStream::from_notes(Vec::new())).await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_edit_reports_missing_editor() {
    let temp = TempDir::new().unwrap();
    let editor = EditOperation::new(
        split_command("/definitely/not/an/editor").unwrap(),
        true,
        true,
    );
    let notes = notes_in(temp.path(), &[("a.note", "a")]);

    let mut out: Vec<u8> = Vec::new();
    let error = editor.invoke(notes, &mut out).await.unwrap_err();
    assert!(format!("{error:#}").contains("failed to run editor"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_waited_editor_receives_all_paths() {
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("ran");
    let script = format!("sh -c 'touch \"$0\"' {}", marker.display());
    let editor = EditOperation::new(split_command(&script).unwrap(), false, true);
    let notes = notes_in(temp.path(), &[("a.note", "a")]);

    output_of(&editor, notes).await;
    assert!(marker.exists());
}
