//! Locsmith CLI Library
//!
//! Command-line interface driving the Locsmith engine against JSON DOM
//! fixtures: locate elements, render snippets, replay picks and live
//! previews, and export page-scan test cases.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, LocateArgs, PickArgs, PreviewArgs, ScanArgs, SnippetArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use handlers::{
    load_fixture, locate, render_snippet, replay_pick, replay_preview, resolve_target,
    LocateReport,
};
pub use output::{OutputFormat, Printer};
