//! Menu construction.
//!
//! Everything about a menu is decided here, before `run`. Once running,
//! only the selected index changes.

use std::io::Write;
use std::time::Duration;

use crossterm::event::KeyCode;

use crate::color::ColorMode;
use crate::types::{Color, Layout, Palette};

use super::refresh::DEFAULT_INTERVAL;
use super::run::{self, KeySource, MenuError};
use super::state::{MenuOption, ShortcutTable};

/// An interactive selection menu.
///
/// ```no_run
/// use livemenu::menu::{Menu, MenuOption};
///
/// let choice = Menu::new()
///     .prompt("Deploy to:")
///     .option(MenuOption::new("staging"))
///     .option(MenuOption::new("production"))
///     .run();
/// ```
#[derive(Debug)]
pub struct Menu {
    options: Vec<MenuOption>,
    shortcuts: ShortcutTable,
    layout: Layout,
    palette: Palette,
    interval: Duration,
    mode: Option<ColorMode>,
}

/// A menu taken apart for the controller.
pub(crate) struct MenuParts {
    pub options: Vec<MenuOption>,
    pub shortcuts: ShortcutTable,
    pub layout: Layout,
    pub palette: Palette,
    pub interval: Duration,
    pub mode: Option<ColorMode>,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Menu {
            options: Vec::new(),
            shortcuts: ShortcutTable::new(),
            layout: Layout::default(),
            palette: Palette::default(),
            interval: DEFAULT_INTERVAL,
            mode: None,
        }
    }

    /// Line shown above the options.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.layout.prompt = prompt.into();
        self
    }

    /// Colors of unselected options.
    pub fn colors(mut self, fg: Color, bg: Color) -> Self {
        self.palette.fg = fg;
        self.palette.bg = bg;
        self
    }

    /// Colors of the selected option.
    pub fn colors_when_selected(mut self, fg: Color, bg: Color) -> Self {
        self.palette.selected_fg = fg;
        self.palette.selected_bg = bg;
        self
    }

    /// Text in front of the selected option.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.layout.selector = selector.into();
        self
    }

    /// Text in front of every unselected option. Empty prefixes are ignored.
    pub fn option_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !prefix.is_empty() {
            self.layout.option_prefix = prefix;
        }
        self
    }

    /// How often labels are re-evaluated while waiting for input.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Override the detected terminal color mode.
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Append an option. Its shortcut, if any, is bound to its position.
    pub fn option(mut self, option: MenuOption) -> Self {
        if let Some(key) = option.shortcut_key() {
            self.shortcuts.bind(key, self.options.len());
        }
        self.options.push(option);
        self
    }

    /// Bind `key` to the option at `index`.
    ///
    /// The index is checked when the key is pressed, not here.
    pub fn shortcut(mut self, key: KeyCode, index: usize) -> Self {
        self.shortcuts.bind(key, index);
        self
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub(crate) fn into_parts(self) -> MenuParts {
        MenuParts {
            options: self.options,
            shortcuts: self.shortcuts,
            layout: self.layout,
            palette: self.palette,
            interval: self.interval,
            mode: self.mode,
        }
    }

    /// Show the menu on the terminal until an option is committed.
    ///
    /// Runs the committed option's action and returns its index.
    ///
    /// # Errors
    ///
    /// Fails if the menu is empty, the terminal cannot be driven, or the
    /// user presses Ctrl+C.
    pub fn run(self) -> Result<usize, MenuError> {
        run::run_terminal(self)
    }

    /// Like [`Menu::run`], with keys from `keys` and output to `out`.
    ///
    /// The caller owns terminal setup; frames are drawn starting at
    /// `origin_row`.
    ///
    /// # Errors
    ///
    /// As [`Menu::run`], plus [`MenuError::InputClosed`] when `keys`
    /// runs out before a commit.
    pub fn run_with<K, W>(self, keys: &mut K, out: W, origin_row: u16) -> Result<usize, MenuError>
    where
        K: KeySource + ?Sized,
        W: Write + Send + 'static,
    {
        let committed = run::drive(self, keys, out, origin_row)?;
        Ok(committed.invoke())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let menu = Menu::new();
        assert!(menu.is_empty());
        assert_eq!(menu.layout(), &Layout::default());
        assert_eq!(menu.palette(), &Palette::default());
        assert_eq!(menu.into_parts().interval, Duration::from_millis(500));
    }

    #[test]
    fn empty_prefix_is_ignored() {
        let menu = Menu::new().option_prefix("- ").option_prefix("");
        assert_eq!(menu.layout().option_prefix, "- ");
    }

    #[test]
    fn option_shortcuts_bind_to_position() {
        let menu = Menu::new()
            .option(MenuOption::new("a"))
            .option(MenuOption::new("b").shortcut(KeyCode::F(2)));
        let parts = menu.into_parts();
        assert_eq!(parts.shortcuts.get(KeyCode::F(2)), Some(1));
    }

    #[test]
    fn explicit_shortcut_overrides_option_binding() {
        let menu = Menu::new()
            .option(MenuOption::new("a").shortcut(KeyCode::Char('a')))
            .shortcut(KeyCode::Char('a'), 4);
        assert_eq!(menu.into_parts().shortcuts.get(KeyCode::Char('a')), Some(4));
    }

    #[test]
    fn colors_are_set_per_state() {
        let menu = Menu::new()
            .colors(Color::RED, Color::BLUE)
            .colors_when_selected(Color::GREEN, Color::YELLOW);
        let p = menu.palette();
        assert_eq!((p.fg, p.bg), (Color::RED, Color::BLUE));
        assert_eq!((p.selected_fg, p.selected_bg), (Color::GREEN, Color::YELLOW));
    }
}
