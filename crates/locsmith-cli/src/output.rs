//! Output formatting

use console::{style, Term};
use serde::{Deserialize, Serialize};

use crate::config::CliConfig;
use crate::error::CliResult;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Writes command results to stdout and status lines to stderr
#[derive(Debug)]
pub struct Printer {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Printer {
    /// Create a new printer
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Printer honoring the configured color and verbosity
    #[must_use]
    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(config.color.should_color(), config.verbosity.is_quiet())
    }

    /// Print a result line verbatim
    pub fn line(&self, text: &str) -> CliResult<()> {
        self.out.write_line(text)?;
        Ok(())
    }

    /// Print a section heading
    pub fn heading(&self, text: &str) -> CliResult<()> {
        self.line(&render_heading(text, self.use_color))
    }

    /// Print a `label: value` pair
    pub fn field(&self, label: &str, value: &str) -> CliResult<()> {
        self.line(&render_field(label, value, self.use_color))
    }

    /// Print a code block, indented under its label
    pub fn snippet(&self, label: &str, code: &str) -> CliResult<()> {
        self.line(&render_snippet(label, code, self.use_color))
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        self.line(&serde_json::to_string_pretty(value)?)
    }

    /// Print a success message to stderr
    pub fn success(&self, message: &str) -> CliResult<()> {
        if self.quiet {
            return Ok(());
        }
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };
        self.err.write_line(&format!("{prefix} {message}"))?;
        Ok(())
    }

    /// Print a warning message to stderr
    pub fn warning(&self, message: &str) -> CliResult<()> {
        if self.quiet {
            return Ok(());
        }
        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };
        self.err.write_line(&format!("{prefix} {message}"))?;
        Ok(())
    }
}

/// Heading text, bold cyan when colored
#[must_use]
pub fn render_heading(text: &str, use_color: bool) -> String {
    if use_color {
        style(text).cyan().bold().to_string()
    } else {
        text.to_string()
    }
}

/// Indented `label: value`, with a dimmed label when colored
#[must_use]
pub fn render_field(label: &str, value: &str, use_color: bool) -> String {
    let label = format!("{label}:");
    if use_color {
        format!("  {} {value}", style(label).dim())
    } else {
        format!("  {label} {value}")
    }
}

/// Label line followed by the code indented four spaces
#[must_use]
pub fn render_snippet(label: &str, code: &str, use_color: bool) -> String {
    let label = if use_color {
        style(label).green().to_string()
    } else {
        label.to_string()
    };
    let body = if code.is_empty() {
        "    (empty)".to_string()
    } else {
        code.lines()
            .map(|line| format!("    {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("  {label}\n{body}")
}
