//! Domain types for livemenu.
//!
//! Value types shared by the codec, the frame builder and the menu file
//! loader. No behavior beyond parsing and formatting lives here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::menu::theme;

// ============================================================================
// COLOR
// ============================================================================

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Returns the color as a lowercase `#rrggbb` string.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn named(name: &str) -> Option<Color> {
        let color = match name {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "yellow" => Color::YELLOW,
            "cyan" => Color::CYAN,
            "magenta" => Color::MAGENTA,
            "gray" | "grey" => Color::GRAY,
            _ => return None,
        };
        Some(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Accepts `#rrggbb`, `rrggbb`, `r,g,b` or a color name.
impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        if let Some(color) = Color::named(&lower) {
            return Ok(color);
        }

        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(format!("Expected three components in '{}'", s));
            }
            let mut rgb = [0u8; 3];
            for (slot, part) in rgb.iter_mut().zip(&parts) {
                *slot = part
                    .parse::<u8>()
                    .map_err(|_| format!("Component '{}' is not in 0-255", part))?;
            }
            return Ok(Color::rgb(rgb[0], rgb[1], rgb[2]));
        }

        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Unrecognized color '{}'", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| e.to_string())
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// PALETTE & LAYOUT
// ============================================================================

/// The four colors a menu line can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
}

/// White on black, inverted for the selected line.
impl Default for Palette {
    fn default() -> Self {
        theme::DEFAULT_PALETTE
    }
}

/// Static text framing the option labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Line shown above the options. Empty means no prompt line.
    pub prompt: String,
    /// Prepended to every unselected label.
    pub option_prefix: String,
    /// Prepended to the selected label.
    pub selector: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            prompt: String::new(),
            option_prefix: "  ".to_string(),
            selector: "> ".to_string(),
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// How the binary reports the committed choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// The committed choice, as reported by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub index: usize,
    pub value: String,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!("#ff8000".parse::<Color>(), Ok(Color::rgb(255, 128, 0)));
        assert_eq!("FF8000".parse::<Color>(), Ok(Color::rgb(255, 128, 0)));
    }

    #[test]
    fn parses_rgb_triplet() {
        assert_eq!("10, 20,30".parse::<Color>(), Ok(Color::rgb(10, 20, 30)));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("White".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("grey".parse::<Color>(), Ok(Color::GRAY));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert!("256,0,0".parse::<Color>().is_err());
        assert!("1,2".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("mauve".parse::<Color>().is_err());
    }

    #[test]
    fn hex_display_is_lowercase() {
        assert_eq!(Color::rgb(171, 205, 239).to_string(), "#abcdef");
    }

    #[test]
    fn color_serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(1, 2, 3));
    }

    #[test]
    fn default_palette_inverts_for_selection() {
        let p = Palette::default();
        assert_eq!((p.fg, p.bg), (Color::WHITE, Color::BLACK));
        assert_eq!((p.selected_fg, p.selected_bg), (Color::BLACK, Color::WHITE));
    }

    #[test]
    fn default_layout_aligns_prefix_and_selector() {
        let layout = Layout::default();
        assert_eq!(layout.option_prefix.len(), layout.selector.len());
        assert!(layout.prompt.is_empty());
    }
}
