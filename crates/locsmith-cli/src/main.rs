//! Locsmith CLI: locators and automation snippets from DOM fixtures
//!
//! ## Usage
//!
//! ```bash
//! locsmith locate page.json --target "#email"      # Locators, descriptor, snippets
//! locsmith snippet "#email" -d cypress -a type     # Snippet for a stored locator
//! locsmith preview page.json --hover a --hover b   # Replay the live preview
//! locsmith scan page.json --format gherkin         # Suggested test cases
//! ```

use clap::Parser;
use locsmith_cli::{
    handlers, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, OutputFormat, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli)?;
    init_tracing(&config)?;

    match cli.command {
        Commands::Locate(args) => handlers::run_locate(&config, &args),
        Commands::Snippet(args) => handlers::run_snippet(&config, &args),
        Commands::Dialects => handlers::run_dialects(&config),
        Commands::Pick(args) => handlers::run_pick(&config, &args),
        Commands::Preview(args) => handlers::run_preview(&config, &args),
        Commands::Scan(args) => handlers::run_scan(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    let output = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_output(output);
    match &cli.config {
        Some(path) => config.with_engine_file(path),
        None => Ok(config),
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `-v`/`-q`
fn init_tracing(config: &CliConfig) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(config.color.should_color())
        .try_init()
        .map_err(|err| CliError::config(format!("cannot install logger: {err}")))
}
