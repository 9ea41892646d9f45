//! Message formatting and display.
//!
//! Progress and results go to standard output; warnings and errors always go
//! to standard error.
//!
//! # Examples
//!
//! ```
//! use imgtopdf::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(true);
//! formatter.debug("Adding page 1");
//! formatter.success("Created album.pdf");
//! formatter.warning("Could not load image broken.png");
//! ```

use std::io::{self, IsTerminal};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    /// Whether messages of this level belong on standard error.
    pub fn is_diagnostic(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }

    fn decoration(self) -> (&'static str, &'static str) {
        match self {
            Self::Info => ("", ""),
            Self::Success => ("✓ ", "\x1b[32m"), // Green
            Self::Warning => ("warning: ", "\x1b[33m"), // Yellow
            Self::Error => ("error: ", "\x1b[31m"), // Red
            Self::Debug => ("→ ", "\x1b[36m"),     // Cyan
        }
    }
}

/// Output formatter with configurable verbosity.
pub struct OutputFormatter {
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether stdout gets colour.
    color_stdout: bool,
    /// Whether stderr gets colour.
    color_stderr: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(verbose: bool) -> Self {
        let term = std::env::var_os("TERM").is_some();
        Self {
            verbose,
            color_stdout: term && io::stdout().is_terminal(),
            color_stderr: term && io::stderr().is_terminal(),
        }
    }

    /// Print an informational message.
    pub fn info(&self, message: &str) {
        self.print_message(MessageLevel::Info, message);
    }

    /// Print a success message.
    pub fn success(&self, message: &str) {
        self.print_message(MessageLevel::Success, message);
    }

    /// Print a warning message. Always displayed.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message. Always displayed.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a debug/verbose message.
    ///
    /// Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Print detailed information.
    ///
    /// Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Format a message the way it will be printed.
    pub fn render(&self, level: MessageLevel, message: &str) -> String {
        let (prefix, color_code) = level.decoration();
        let colored = if level.is_diagnostic() {
            self.color_stderr
        } else {
            self.color_stdout
        };

        if colored && !color_code.is_empty() {
            format!("{color_code}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let line = self.render(level, message);
        if level.is_diagnostic() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}
