//! One invocation: settings, discovery, operation, exit status.

use std::io::Write;
use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use yana_core::{
    ConfigError, Discovery, DiscoveryOutcome, PathCache, Query, ResolvedSettings, Settings,
    YanaDirs,
};

use crate::cli::Cli;
use crate::operations::operation_for;

/// How a run ended, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Operation finished (possibly with no notes found).
    Success,
    /// The operation failed at runtime.
    Failure,
    /// Invalid configuration; discovery never started.
    Config,
    /// Interrupted by the user.
    Interrupted,
}

impl Exit {
    /// Numeric exit status.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Config => 2,
            Self::Interrupted => 130,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the level chosen by
/// `--debug` / `--verbose`.
pub fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = cli.log_level();
        EnvFilter::new(format!("warn,yana_core={level},yana_cli={level}"))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Layer defaults, the settings file and the command line.
///
/// # Errors
/// Returns [`ConfigError`] when the merged settings do not validate.
pub fn resolve_settings(cli: &Cli) -> Result<ResolvedSettings, ConfigError> {
    if let Some(conf_dir) = cli.conf.clone() {
        YanaDirs::set_config_home_override(conf_dir);
    }
    Settings::load().merge(cli.settings_overlay()).resolve()
}

/// Run the parsed command line against stdout.
pub async fn run(cli: Cli) -> Exit {
    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("yana: {error}");
            return Exit::Config;
        }
    };
    let mut stdout = std::io::stdout();
    run_with_settings(&cli, &settings, &mut stdout).await
}

/// Run discovery and the selected operation concurrently until both are
/// done, or until the user interrupts.
pub async fn run_with_settings(
    cli: &Cli,
    settings: &ResolvedSettings,
    out: &mut (dyn Write + Send),
) -> Exit {
    let operation = match operation_for(&cli.command, settings) {
        Ok(operation) => operation,
        Err(error) => {
            eprintln!("yana: {error:#}");
            return Exit::Config;
        }
    };

    let previous = PathCache::new(settings.cache_file.clone()).load();
    let query = Query::new(cli.command.query().to_vec());
    let cancel = CancellationToken::new();
    tracing::debug!(
        operation = operation.name(),
        terms = query.len(),
        previous = previous.len(),
        "starting run"
    );
    let (notes, discovery) =
        Discovery::from_settings(settings, cli.allows_new()).spawn(query, previous, cancel.clone());

    // Dropping the operation future on interrupt also drops the stream and
    // kills a waited editor.
    let result = tokio::select! {
        result = operation.invoke(notes, out) => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };

    let Some(result) = result else {
        cancel.cancel();
        let outcome = discovery.join().await;
        tracing::debug!(found = outcome.found(), "interrupted");
        eprintln!();
        return Exit::Interrupted;
    };

    if result.is_err() {
        cancel.cancel();
    }
    let outcome = discovery.join().await;
    if let DiscoveryOutcome::Completed { found: 0, .. } = outcome {
        eprintln!("no notes found");
    }

    match result {
        Ok(()) => Exit::Success,
        Err(error) if is_broken_pipe(&error) => {
            tracing::debug!("output closed early");
            Exit::Success
        }
        Err(error) => {
            eprintln!("yana: {error:#}");
            Exit::Failure
        }
    }
}

fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::BrokenPipe)
}
