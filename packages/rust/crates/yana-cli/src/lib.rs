//! yana-cli - command line front end of the Yana notes app.
//!
//! Wires argument parsing, logging and settings to the discovery pipeline
//! from `yana-core`, and implements the operations consuming its stream.

pub mod cli;
pub mod operations;
mod runner;

pub use cli::{Cli, Command, QueryArgs};
pub use operations::{Operation, operation_for};
pub use runner::{Exit, init_tracing, resolve_settings, run, run_with_settings};
