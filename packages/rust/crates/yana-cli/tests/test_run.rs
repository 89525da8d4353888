//! Whole runs: discovery feeding an operation, exit status and cache.

use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use yana_cli::{Cli, Exit, run_with_settings};
use yana_core::{PathCache, ResolvedSettings, Settings};

struct Fixture {
    _temp: TempDir,
    notes: PathBuf,
    cache: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let notes = root.join("notes");
        std::fs::create_dir_all(notes.join("sub")).unwrap();
        std::fs::write(notes.join("a.note"), "alpha #one\n").unwrap();
        std::fs::write(notes.join("b.note"), "beta\n").unwrap();
        std::fs::write(notes.join("sub/c.notes"), "gamma #two\n").unwrap();
        std::fs::write(notes.join("ignored.txt"), "alpha\n").unwrap();
        Self {
            cache: root.join("list_cache.json"),
            notes,
            _temp: temp,
        }
    }

    fn settings(&self, overlay: Settings) -> ResolvedSettings {
        Settings {
            cache_file: Some(self.cache.clone()),
            ..Settings::default()
        }
        .merge(overlay)
        .resolve()
        .unwrap()
    }

    fn dir(&self) -> String {
        self.notes.to_string_lossy().into_owned()
    }

    async fn run(&self, args: &[&str]) -> (Exit, String) {
        let cli = Cli::try_parse_from(std::iter::once("yana").chain(args.iter().copied())).unwrap();
        let settings = self.settings(cli.settings_overlay());
        let mut out: Vec<u8> = Vec::new();
        let exit = run_with_settings(&cli, &settings, &mut out).await;
        (exit, String::from_utf8(out).unwrap())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_then_address_by_index() {
    let fx = Fixture::new();
    let dir = fx.dir();

    let (exit, out) = fx.run(&["list", dir.as_str()]).await;
    assert_eq!(exit, Exit::Success);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3, "got {out}");
    assert!(lines[0].starts_with("1 ") && lines[0].ends_with("a.note"));
    assert!(lines[1].starts_with("2 ") && lines[1].ends_with("b.note"));
    assert!(lines[2].starts_with("3 ") && lines[2].ends_with("c.notes"));

    let cached = PathCache::new(&fx.cache).load();
    assert_eq!(cached.len(), 3);

    let (exit, out) = fx.run(&["show", "-1"]).await;
    assert_eq!(exit, Exit::Success);
    assert_eq!(out, "gamma #two\n");

    // Each completed run replaces the cache, so list again before indexing.
    let (exit, _) = fx.run(&["list", dir.as_str()]).await;
    assert_eq!(exit, Exit::Success);
    let (exit, out) = fx.run(&["show", "2"]).await;
    assert_eq!(exit, Exit::Success);
    assert_eq!(out, "beta\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_grep_over_directory() {
    let fx = Fixture::new();
    let dir = fx.dir();

    let (exit, out) = fx.run(&["grep", "ALPHA", dir.as_str()]).await;
    assert_eq!(exit, Exit::Success);
    assert_eq!(out.lines().count(), 1, "only notes are searched: {out}");
    assert!(out.ends_with("a.note: alpha #one\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_notes_is_success() {
    let fx = Fixture::new();
    let empty = fx.notes.join("empty");
    std::fs::create_dir(&empty).unwrap();

    let empty = empty.to_string_lossy().into_owned();

    let (exit, out) = fx.run(&["list", empty.as_str()]).await;
    assert_eq!(exit, Exit::Success);
    assert!(out.is_empty());
    assert!(PathCache::new(&fx.cache).load().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_note_regex_flag_changes_what_counts_as_note() {
    let fx = Fixture::new();
    let dir = fx.dir();

    let (exit, out) = fx.run(&["--note-regex", r".*\.txt", "list", dir.as_str()]).await;
    assert_eq!(exit, Exit::Success);
    assert_eq!(out.lines().count(), 1);
    assert!(out.trim_end().ends_with("ignored.txt"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_search_regex_is_config_error() {
    let fx = Fixture::new();
    let dir = fx.dir();

    let (exit, out) = fx.run(&["search", "-e", "([", dir.as_str()]).await;
    assert_eq!(exit, Exit::Config);
    assert!(out.is_empty());
    assert!(!fx.cache.exists(), "discovery must not start");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_editor_is_runtime_failure() {
    let fx = Fixture::new();
    let note = fx.notes.join("a.note").to_string_lossy().into_owned();

    let (exit, _) = fx
        .run(&["edit", "--editor", "/definitely/not/an/editor", note.as_str()])
        .await;
    assert_eq!(exit, Exit::Failure);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_flag_accepts_missing_note() {
    let fx = Fixture::new();
    let fresh = fx.notes.join("fresh.note");
    let fresh_arg = fresh.to_string_lossy().into_owned();

    let (exit, _) = fx.run(&["list", fresh_arg.as_str()]).await;
    assert_eq!(exit, Exit::Success);
    assert!(PathCache::new(&fx.cache).load().is_empty());

    let (exit, out) = fx.run(&["--new", "list", fresh_arg.as_str()]).await;
    assert_eq!(exit, Exit::Success);
    assert!(out.trim_end().ends_with("fresh.note"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_flag_after_sub_command() {
    let fx = Fixture::new();
    let fresh = fx.notes.join("later.note");
    let fresh_arg = fresh.to_string_lossy().into_owned();

    let (exit, out) = fx.run(&["list", "--new", fresh_arg.as_str()]).await;
    assert_eq!(exit, Exit::Success);
    assert!(out.trim_end().ends_with("later.note"));
    assert!(!fresh.exists(), "listing must not create the note");
}
