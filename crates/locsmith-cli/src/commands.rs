//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use locsmith::{Dialect, ExportFormat};
use std::path::PathBuf;

/// Locsmith: stable locators and automation snippets for DOM elements
#[derive(Parser, Debug)]
#[command(name = "locsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Engine configuration file (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize locators, descriptor and snippets for an element
    Locate(LocateArgs),

    /// Render a snippet for a stored locator
    Snippet(SnippetArgs),

    /// List dialects and action verbs
    Dialects,

    /// Replay an interactive pick over a fixture
    Pick(PickArgs),

    /// Replay pointer moves through the live preview
    Preview(PreviewArgs),

    /// Suggest test cases for a page
    Scan(ScanArgs),
}

/// Arguments for the locate command
#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// JSON DOM fixture
    pub fixture: PathBuf,

    /// CSS selector of the element (defaults to the fixture's active element)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Dialects to render (defaults to the configured preview dialects)
    #[arg(short, long = "dialect", value_name = "DIALECT")]
    pub dialects: Vec<Dialect>,
}

/// Arguments for the snippet command
#[derive(Parser, Debug)]
pub struct SnippetArgs {
    /// Stored locator
    pub locator: String,

    /// Target dialect
    #[arg(short, long, default_value = "playwright")]
    pub dialect: Dialect,

    /// Action verb (click, double, hover, drag, key-enter, ...)
    #[arg(short, long)]
    pub action: Option<String>,

    /// Fixture to read element semantics from
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// CSS selector of the element in the fixture (defaults to the active element, then body)
    #[arg(short, long, requires = "fixture")]
    pub target: Option<String>,
}

/// Arguments for the pick command
#[derive(Parser, Debug)]
pub struct PickArgs {
    /// JSON DOM fixture
    pub fixture: PathBuf,

    /// Elements hovered before the click, in order
    #[arg(long = "hover", value_name = "SELECTOR")]
    pub hover: Vec<String>,

    /// Element clicked to complete the pick
    #[arg(long, value_name = "SELECTOR")]
    pub click: String,
}

/// Arguments for the preview command
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// JSON DOM fixture
    pub fixture: PathBuf,

    /// Elements hovered, in order
    #[arg(long = "hover", value_name = "SELECTOR", required = true)]
    pub hover: Vec<String>,

    /// Deliver all moves before the next animation frame
    #[arg(long)]
    pub burst: bool,
}

/// Arguments for the scan command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// JSON DOM fixture
    pub fixture: PathBuf,

    /// Export format
    #[arg(short, long, default_value = "markdown")]
    pub format: ExportFormat,

    /// Write the export to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_locate() {
            let cli = Cli::parse_from(["locsmith", "locate", "page.json", "-t", "#email", "-d", "cypress", "-d", "xpath"]);
            match cli.command {
                Commands::Locate(args) => {
                    assert_eq!(args.fixture, PathBuf::from("page.json"));
                    assert_eq!(args.target.as_deref(), Some("#email"));
                    assert_eq!(args.dialects, vec![Dialect::Cypress, Dialect::XPath]);
                }
                _ => panic!("expected locate"),
            }
        }

        #[test]
        fn test_parse_snippet_defaults() {
            let cli = Cli::parse_from(["locsmith", "snippet", "#go"]);
            match cli.command {
                Commands::Snippet(args) => {
                    assert_eq!(args.locator, "#go");
                    assert_eq!(args.dialect, Dialect::Playwright);
                    assert!(args.action.is_none());
                }
                _ => panic!("expected snippet"),
            }
        }

        #[test]
        fn test_unknown_dialect_rejected() {
            assert!(Cli::try_parse_from(["locsmith", "snippet", "#go", "-d", "puppeteer"]).is_err());
        }

        #[test]
        fn test_snippet_target_requires_fixture() {
            assert!(Cli::try_parse_from(["locsmith", "snippet", "#go", "-t", "button"]).is_err());
        }

        #[test]
        fn test_parse_scan_format() {
            let cli = Cli::parse_from(["locsmith", "scan", "page.json", "-f", "gherkin"]);
            match cli.command {
                Commands::Scan(args) => assert_eq!(args.format, ExportFormat::Gherkin),
                _ => panic!("expected scan"),
            }
        }

        #[test]
        fn test_preview_requires_hover() {
            assert!(Cli::try_parse_from(["locsmith", "preview", "page.json"]).is_err());
        }
    }

    mod global_flag_tests {
        use super::*;

        #[test]
        fn test_verbose_count() {
            let cli = Cli::parse_from(["locsmith", "-vv", "dialects"]);
            assert_eq!(cli.verbose, 2);
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::parse_from(["locsmith", "dialects", "--json", "--color", "never", "-q"]);
            assert!(cli.json);
            assert!(cli.quiet);
            assert!(matches!(cli.color, ColorArg::Never));
        }
    }
}
