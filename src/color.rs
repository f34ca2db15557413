//! Terminal color capability and 24-bit escape encoding.
//!
//! Structure:
//! - Detection: what the terminal supports (decided once per process)
//! - Encoding: pure text + colors → escape sequence

use std::env;
use std::sync::OnceLock;

use crate::types::Color;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Resets every SGR attribute.
pub const RESET: &str = "\x1b[0m";

/// `TERM_PROGRAM` values of terminals known to render true color
/// without advertising it through `COLORTERM`.
const TRUECOLOR_PROGRAMS: &[&str] = &["vscode", "wezterm", "iterm.app", "warpterminal", "ghostty"];

static DETECTED: OnceLock<ColorMode> = OnceLock::new();

// ============================================================================
// DETECTION
// ============================================================================

/// Color capability of the output terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// 24-bit color escapes are rendered.
    TrueColor,
    /// Anything less: escapes are omitted entirely.
    Plain,
}

impl ColorMode {
    /// The process-wide mode, probed from the environment on first use.
    pub fn current() -> ColorMode {
        *DETECTED.get_or_init(|| {
            let mode = ColorMode::detect();
            tracing::debug!(?mode, "detected terminal color mode");
            mode
        })
    }

    /// Probe the real environment.
    pub fn detect() -> ColorMode {
        ColorMode::from_env(|key| env::var(key).ok())
    }

    /// Decide the mode from an environment lookup.
    ///
    /// Separated for testability: tests inject a fake environment.
    pub fn from_env<F>(lookup: F) -> ColorMode
    where
        F: Fn(&str) -> Option<String>,
    {
        // https://no-color.org/
        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return ColorMode::Plain;
        }

        if lookup("TERM").is_some_and(|t| t == "dumb") {
            return ColorMode::Plain;
        }

        if let Some(colorterm) = lookup("COLORTERM") {
            let colorterm = colorterm.to_ascii_lowercase();
            if colorterm == "truecolor" || colorterm == "24bit" {
                return ColorMode::TrueColor;
            }
        }

        if let Some(program) = lookup("TERM_PROGRAM") {
            let program = program.to_ascii_lowercase();
            if TRUECOLOR_PROGRAMS.contains(&program.as_str()) {
                return ColorMode::TrueColor;
            }
        }

        ColorMode::Plain
    }

    pub fn is_truecolor(self) -> bool {
        self == ColorMode::TrueColor
    }
}

// ============================================================================
// ENCODING
// ============================================================================

/// Wrap `text` in a foreground + background true-color sequence.
///
/// Returns `text` unchanged when the mode is not true color.
pub fn encode(text: &str, fg: Color, bg: Color, mode: ColorMode) -> String {
    if !mode.is_truecolor() {
        return text.to_string();
    }
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}{}",
        fg.r, fg.g, fg.b, bg.r, bg.g, bg.b, text, RESET
    )
}

// ============================================================================
// TESTS
// ============================================================================
