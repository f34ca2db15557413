//! Default colors for menu lines and notices.
//!
//! Color semantics:
//! - White on black: ordinary option
//! - Black on white: the selected option (inverted)
//! - Yellow on black: notices under the menu (invalid shortcut, read errors)

use crate::types::{Color, Palette};

/// Unselected option text.
pub const DEFAULT_FG: Color = Color::WHITE;

/// Unselected option background.
pub const DEFAULT_BG: Color = Color::BLACK;

/// Selected option text.
pub const DEFAULT_SELECTED_FG: Color = Color::BLACK;

/// Selected option background.
pub const DEFAULT_SELECTED_BG: Color = Color::WHITE;

/// Notice text.
pub const NOTICE_FG: Color = Color::YELLOW;

/// Notice background.
pub const NOTICE_BG: Color = Color::BLACK;

pub const DEFAULT_PALETTE: Palette = Palette {
    fg: DEFAULT_FG,
    bg: DEFAULT_BG,
    selected_fg: DEFAULT_SELECTED_FG,
    selected_bg: DEFAULT_SELECTED_BG,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_colors_invert_defaults() {
        assert_eq!(DEFAULT_SELECTED_FG, DEFAULT_BG);
        assert_eq!(DEFAULT_SELECTED_BG, DEFAULT_FG);
    }

    #[test]
    fn notice_stands_out_from_options() {
        assert_ne!(NOTICE_FG, DEFAULT_FG);
        assert_ne!(NOTICE_FG, DEFAULT_SELECTED_FG);
    }
}
