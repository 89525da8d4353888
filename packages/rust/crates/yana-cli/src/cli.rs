use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use yana_core::Settings;

/// Command line of the `yana` binary.
#[derive(Parser, Debug)]
#[command(name = "yana", version)]
#[command(
    about = "Yet Another Notes App - builds on what will persist: plain text files and a file system."
)]
#[command(after_help = "Now you know.")]
pub struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    pub conf: Option<PathBuf>,

    /// Turn on debug messages.
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Turn on verbose messages.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Regex a file name must match to count as a note [default: (.*\.)?notes?$].
    #[arg(long)]
    pub note_regex: Option<String>,

    /// Regex whose first group is a tag name.
    #[arg(long)]
    pub tag_regex: Option<String>,

    /// Also accept queries naming notes that do not exist yet.
    #[arg(short = 'n', long = "new")]
    pub allow_new: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Settings given on the command line, to be merged over the file.
    #[must_use]
    pub fn settings_overlay(&self) -> Settings {
        let (editor, terminal_editor) = match &self.command {
            Command::Edit {
                editor,
                terminal_editor,
                ..
            } => (editor.clone(), terminal_editor.clone()),
            _ => (None, None),
        };
        Settings {
            note_regex: self.note_regex.clone(),
            tag_regex: self.tag_regex.clone(),
            editor,
            terminal_editor,
            ..Settings::default()
        }
    }

    /// Whether `--new` was given before or after the sub command.
    #[must_use]
    pub fn allows_new(&self) -> bool {
        self.allow_new || self.command.query_args().allow_new
    }

    /// Default log directive when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

/// Query terms shared by every sub command.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// A query for notes (finds: last listed by index, last listed by
    /// pattern-matching paths, recursively in the file system) [default: .]
    #[arg(allow_negative_numbers = true)]
    pub query: Vec<String>,

    /// Also accept queries naming notes that do not exist yet.
    #[arg(long = "new")]
    pub allow_new: bool,
}

/// Operations on the discovered notes.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List notes.
    List {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Show notes.
    Show {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Edit notes.
    Edit {
        /// Run the editor for every note separately.
        #[arg(short, long)]
        separate: bool,

        /// Use a terminal editor (always waited for).
        #[arg(short, long)]
        terminal: bool,

        /// Wait for the editor to finish.
        #[arg(short, long)]
        wait: bool,

        /// Editor command line.
        #[arg(long)]
        editor: Option<String>,

        /// Terminal editor command line.
        #[arg(long)]
        terminal_editor: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Search for contents in notes.
    #[command(alias = "grep")]
    Search {
        /// Case-sensitive.
        #[arg(short, long)]
        case: bool,

        /// Treat pattern as regular expression.
        #[arg(short = 'e', long)]
        regex: bool,

        /// Pattern to search for.
        pattern: String,

        #[command(flatten)]
        query: QueryArgs,
    },
    /// Show used tags for notes.
    Tags {
        /// Sort output.
        #[arg(short, long)]
        sort: bool,

        /// Show notes containing the corresponding tag.
        #[arg(short, long)]
        notes: bool,

        #[command(flatten)]
        query: QueryArgs,
    },
}

impl Command {
    /// Query arguments given to this sub command.
    #[must_use]
    pub fn query_args(&self) -> &QueryArgs {
        match self {
            Self::List { query }
            | Self::Show { query }
            | Self::Edit { query, .. }
            | Self::Search { query, .. }
            | Self::Tags { query, .. } => query,
        }
    }

    /// Query terms given to this sub command.
    #[must_use]
    pub fn query(&self) -> &[String] {
        &self.query_args().query
    }

    /// Sub command name, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Show { .. } => "show",
            Self::Edit { .. } => "edit",
            Self::Search { .. } => "search",
            Self::Tags { .. } => "tags",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("yana").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_negative_index_is_a_query_term() {
        let cli = parse(&["list", "-1", "2"]);
        assert_eq!(cli.command.query(), ["-1", "2"]);
    }

    #[test]
    fn test_grep_is_an_alias_for_search() {
        let cli = parse(&["grep", "-c", "TODO", "notes/"]);
        match cli.command {
            Command::Search {
                case,
                regex,
                pattern,
                query,
            } => {
                assert!(case);
                assert!(!regex);
                assert_eq!(pattern, "TODO");
                assert_eq!(query.query, ["notes/"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_new_flag_before_sub_command_and_tags_notes_flag() {
        let cli = parse(&["-n", "tags", "-n", "-s"]);
        assert!(cli.allows_new());
        assert!(matches!(
            cli.command,
            Command::Tags {
                notes: true,
                sort: true,
                ..
            }
        ));
    }

    #[test]
    fn test_new_flag_after_sub_command() {
        let cli = parse(&["list", "--new", "fresh.note"]);
        assert!(cli.allows_new());
        assert!(!cli.allow_new);
        assert_eq!(cli.command.query(), ["fresh.note"]);

        let cli = parse(&["tags", "-n", "--new", "x.note"]);
        assert!(cli.allows_new());
        assert!(matches!(cli.command, Command::Tags { notes: true, .. }));

        assert!(!parse(&["list", "fresh.note"]).allows_new());
    }

    #[test]
    fn test_overlay_carries_editor_flags() {
        let cli = parse(&["--note-regex", ".*\\.md$", "edit", "--editor", "code -w", "a.md"]);
        let overlay = cli.settings_overlay();
        assert_eq!(overlay.note_regex.as_deref(), Some(".*\\.md$"));
        assert_eq!(overlay.editor.as_deref(), Some("code -w"));
        assert_eq!(overlay.terminal_editor, None);
    }

    #[test]
    fn test_log_level_flags() {
        assert_eq!(parse(&["list"]).log_level(), "warn");
        assert_eq!(parse(&["list", "-v"]).log_level(), "info");
        assert_eq!(parse(&["-d", "-v", "list"]).log_level(), "debug");
    }
}
