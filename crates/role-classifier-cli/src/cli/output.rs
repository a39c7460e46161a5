//! Shared CLI output formatting with colors, symbols, and structured display.

use std::io::IsTerminal;

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    // Respect NO_COLOR env (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    // Respect --no-color flag via our global flag
    if std::env::var("ROLE_CLASSIFIER_NO_COLOR").is_ok() {
        return false;
    }
    // Human-facing output goes to stderr; stdout carries the report.
    std::io::stderr().is_terminal()
}

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    /// Plain output regardless of environment.
    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    /// Yellow warning symbol.
    pub fn warn_sym(&self) -> &str {
        if self.use_color {
            "\x1b[33m\u{26a0}\x1b[0m"
        } else {
            "??"
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Print a branded header for CLI output.
pub fn print_header(s: &Styled) {
    eprintln!(
        "  {} {}",
        s.bold("role-classifier"),
        s.dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    eprintln!();
}

/// Print a section header (e.g., "title", "content").
pub fn print_section(s: &Styled, title: &str) {
    eprintln!("  {}", s.bold(title));
}

/// Print a check result line with symbol and label/value.
pub fn print_check(symbol: &str, label: &str, value: &str) {
    eprintln!("    {symbol} {label:<16} {value}");
}

/// Print an indented detail line under a check.
pub fn print_detail(msg: &str) {
    eprintln!("                        {msg}");
}

/// Check if --quiet mode is active.
pub fn is_quiet() -> bool {
    std::env::var("ROLE_CLASSIFIER_QUIET").is_ok()
}

/// Check if --json mode is active.
pub fn is_json() -> bool {
    std::env::var("ROLE_CLASSIFIER_JSON").is_ok()
}

/// Print JSON output to stdout.
pub fn print_json(value: &serde_json::Value) {
    if let Ok(s) = serde_json::to_string_pretty(value) {
        println!("{s}");
    }
}
