//! Menu definition files.
//!
//! A menu can be described in JSON instead of code:
//!
//! ```json
//! {
//!   "prompt": "Deploy to:",
//!   "selector": "> ",
//!   "prefix": "  ",
//!   "refresh_ms": 500,
//!   "colors": { "fg": "#ffffff", "bg": "#000000", "selected_fg": "black", "selected_bg": "white" },
//!   "options": [
//!     { "label": "Staging", "value": "stg", "shortcut": "F1" },
//!     { "label": "Production", "value": "prod" }
//!   ]
//! }
//! ```
//!
//! Structure:
//! - Types: the file schema
//! - Pure functions: key-name parsing, schema → `Menu`
//! - Effect functions: reading from disk

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::menu::{Menu, MenuOption};
use crate::types::{Color, Palette};

// ============================================================================
// TYPES
// ============================================================================

/// Top-level menu file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuFile {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub refresh_ms: Option<u64>,
    #[serde(default)]
    pub colors: ColorsSection,
    pub options: Vec<OptionEntry>,
}

/// Color overrides. Missing entries keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorsSection {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub selected_fg: Option<Color>,
    pub selected_bg: Option<Color>,
}

/// One option in a menu file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionEntry {
    pub label: String,
    /// Reported when this option is chosen. Defaults to the label.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub shortcut: Option<String>,
}

impl OptionEntry {
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

/// Error loading or interpreting a menu file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Read { path: PathBuf, source: std::io::Error },
    /// The file is not valid menu JSON.
    Parse(serde_json::Error),
    /// A shortcut name is not a key we know.
    InvalidKey(String),
    /// A color string could not be parsed.
    InvalidColor(String),
    /// The file lists no options.
    NoOptions,
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Parse a key name such as `F1`, `Enter`, `PageDown` or `q`.
///
/// Names are case-insensitive; a single character stands for itself.
pub fn parse_key(name: &str) -> Result<KeyCode, ConfigError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = name.trim().to_ascii_lowercase();
    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        other => match other.strip_prefix('f').map(str::parse::<u8>) {
            Some(Ok(n @ 1..=12)) => KeyCode::F(n),
            _ => return Err(ConfigError::InvalidKey(name.to_string())),
        },
    };
    Ok(code)
}

/// Parse a color string for the command line.
pub fn parse_color(s: &str) -> Result<Color, ConfigError> {
    s.parse().map_err(ConfigError::InvalidColor)
}

/// Parse menu file contents.
pub fn parse_menu_file(contents: &str) -> Result<MenuFile, ConfigError> {
    let file: MenuFile = serde_json::from_str(contents).map_err(ConfigError::Parse)?;
    if file.options.is_empty() {
        return Err(ConfigError::NoOptions);
    }
    Ok(file)
}

impl ColorsSection {
    /// Apply the overrides on top of `base`.
    pub fn apply(&self, base: Palette) -> Palette {
        Palette {
            fg: self.fg.unwrap_or(base.fg),
            bg: self.bg.unwrap_or(base.bg),
            selected_fg: self.selected_fg.unwrap_or(base.selected_fg),
            selected_bg: self.selected_bg.unwrap_or(base.selected_bg),
        }
    }
}

impl MenuFile {
    /// Build a menu with static labels from this file.
    pub fn to_menu(&self) -> Result<Menu, ConfigError> {
        let palette = self.colors.apply(Palette::default());
        let mut menu = Menu::new()
            .colors(palette.fg, palette.bg)
            .colors_when_selected(palette.selected_fg, palette.selected_bg);

        if let Some(prompt) = &self.prompt {
            menu = menu.prompt(prompt.as_str());
        }
        if let Some(selector) = &self.selector {
            menu = menu.selector(selector.as_str());
        }
        if let Some(prefix) = &self.prefix {
            menu = menu.option_prefix(prefix.as_str());
        }
        if let Some(ms) = self.refresh_ms {
            menu = menu.refresh_interval(Duration::from_millis(ms));
        }

        for entry in &self.options {
            let mut option = MenuOption::new(entry.label.as_str());
            if let Some(name) = &entry.shortcut {
                option = option.shortcut(parse_key(name)?);
            }
            menu = menu.option(option);
        }

        Ok(menu)
    }
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Read and parse a menu file.
pub fn load_menu_file(path: &Path) -> Result<MenuFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_menu_file(&contents)
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Cannot read menu file {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "Invalid menu file: {}", e),
            ConfigError::InvalidKey(name) => write!(f, "Unknown shortcut key '{}'", name),
            ConfigError::InvalidColor(reason) => write!(f, "Invalid color: {}", reason),
            ConfigError::NoOptions => write!(f, "Menu file lists no options"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
