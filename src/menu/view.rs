//! Pure rendering: labels + selection → frame text.
//!
//! Nothing here evaluates labels or touches the terminal. The caller
//! hands in already-resolved label text and writes the result itself.

use crate::color::{self, ColorMode};
use crate::types::{Layout, Palette};

use super::theme;

/// Everything a frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub labels: &'a [String],
    pub selected: usize,
    pub layout: &'a Layout,
    pub palette: &'a Palette,
    pub mode: ColorMode,
}

/// Compose the full frame: optional prompt line, then one line per option.
///
/// Lines are joined with `\n`; there is no trailing newline.
pub fn build(view: &FrameView<'_>) -> String {
    let mut lines = Vec::with_capacity(line_count(view));

    if !view.layout.prompt.is_empty() {
        lines.push(view.layout.prompt.clone());
    }

    for (i, label) in view.labels.iter().enumerate() {
        let line = if i == view.selected {
            color::encode(
                &format!("{}{}", view.layout.selector, label),
                view.palette.selected_fg,
                view.palette.selected_bg,
                view.mode,
            )
        } else {
            color::encode(
                &format!("{}{}", view.layout.option_prefix, label),
                view.palette.fg,
                view.palette.bg,
                view.mode,
            )
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Rows the frame occupies on screen.
pub fn line_count(view: &FrameView<'_>) -> usize {
    let prompt = usize::from(!view.layout.prompt.is_empty());
    prompt + view.labels.len()
}

/// A one-line message shown beneath the menu.
pub fn notice(message: &str, mode: ColorMode) -> String {
    color::encode(message, theme::NOTICE_FG, theme::NOTICE_BG, mode)
}

// ============================================================================
// TESTS
// ============================================================================
