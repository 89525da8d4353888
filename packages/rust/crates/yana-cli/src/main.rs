//! yana: find plain text notes, then list, show, edit, search or tag them.
//!
//! Logging: `-v` / `-d` raise the level on stderr; `RUST_LOG` (e.g.
//! `RUST_LOG=yana_core=debug`) overrides both.

use std::process::ExitCode;

use clap::Parser;

use yana_cli::{Cli, init_tracing, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    tracing::debug!(command = cli.command.name(), "yana starting");
    run(cli).await.into()
}
