//! Menu effects boundary: terminal lifecycle, key mapping, input loop.
//!
//! This is where the pure layers (state, update, view) meet the real
//! terminal. Two activities run while the menu is up:
//! - the input loop on the caller's thread, blocked on the key source
//! - the label refresher on its own thread, woken by a timer
//!
//! Both draw through the same locked `Screen`.

use std::fmt;
use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::cursor::{self, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use tracing::{debug, info, trace, warn};

use crate::color::ColorMode;

use super::builder::Menu;
use super::refresh::{self, Refresher};
use super::screen::{self, Screen};
use super::state::{self, Label, MenuOption, Phase, ShortcutTable, Transition};
use super::update;

/// Shown when a shortcut points at an option that does not exist.
pub const INVALID_OPTION: &str = "Invalid option.";

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

// ============================================================================
// ERRORS
// ============================================================================

/// Why a menu run ended without a committed option.
#[derive(Debug)]
pub enum MenuError {
    /// The terminal could not be set up, drawn to or restored.
    Io(io::Error),
    /// The menu has no options to choose from.
    NoOptions,
    /// The user pressed Ctrl+C.
    Interrupted,
    /// The key source ran dry before anything was committed.
    InputClosed,
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::Io(e) => write!(f, "Terminal error: {}", e),
            MenuError::NoOptions => write!(f, "Menu has no options"),
            MenuError::Interrupted => write!(f, "Interrupted"),
            MenuError::InputClosed => write!(f, "Input closed before an option was chosen"),
        }
    }
}

impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MenuError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MenuError {
    fn from(e: io::Error) -> Self {
        MenuError::Io(e)
    }
}

// ============================================================================
// KEY INPUT
// ============================================================================

/// Where key presses come from.
pub trait KeySource {
    /// Block until the next key event.
    ///
    /// `ErrorKind::UnexpectedEof` means no more keys will ever arrive;
    /// any other error is reported to the user and reading continues.
    fn read_key(&mut self) -> io::Result<KeyEvent>;
}

/// Keys from the real terminal via crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(key) = event::read()? {
                return Ok(key);
            }
            // mouse, resize, focus and paste events are not menu input
        }
    }
}

/// Keys delivered over a channel, e.g. from another thread or a test.
impl KeySource for mpsc::Receiver<KeyEvent> {
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        self.recv()
            .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "key channel closed"))
    }
}

/// What the input loop does with a raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Resolve this key against the menu.
    Key(KeyCode),
    /// Abandon the menu.
    Interrupt,
}

/// Map a crossterm key event to menu input.
///
/// Returns None for events the menu ignores (key releases).
pub fn map_key(key: KeyEvent) -> Option<KeyInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // Raw mode swallows SIGINT, so Ctrl+C has to be honored here.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyInput::Interrupt);
    }

    Some(KeyInput::Key(key.code))
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Raw mode for the lifetime of the guard.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Leave raw mode and show the cursor. Best effort.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), Show);
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            // Caught and reported by the label machinery; the menu keeps running.
            if state::in_label_evaluation() {
                return;
            }
            restore_terminal();
            original_hook(panic_info);
        }));
    });
}

// ============================================================================
// RUN
// ============================================================================

/// The committed option, with its action not yet invoked.
pub(crate) struct Committed {
    pub index: usize,
    action: Option<Box<dyn FnOnce()>>,
}

impl Committed {
    /// Run the option's action, if any, and hand back its index.
    pub fn invoke(self) -> usize {
        if let Some(action) = self.action {
            action();
        }
        self.index
    }
}

/// Run `menu` on the real terminal.
///
/// The action runs after raw mode has been left, so it may print freely.
pub(crate) fn run_terminal(menu: Menu) -> Result<usize, MenuError> {
    if menu.is_empty() {
        return Err(MenuError::NoOptions);
    }

    let guard = TerminalGuard::enter()?;
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    let origin_row = match cursor::position() {
        Ok((_, row)) => row,
        Err(e) => {
            debug!(error = %e, "cursor position unavailable, drawing from the top");
            0
        }
    };

    let committed = drive(menu, &mut TerminalKeys, io::stdout(), origin_row);
    drop(guard);

    Ok(committed?.invoke())
}

/// Run the full Idle → Running → Committing → Done cycle against any key
/// source and output sink.
pub(crate) fn drive<K, W>(menu: Menu, keys: &mut K, out: W, origin_row: u16) -> Result<Committed, MenuError>
where
    K: KeySource + ?Sized,
    W: Write + Send + 'static,
{
    let parts = menu.into_parts();
    let mut options = parts.options;
    if options.is_empty() {
        return Err(MenuError::NoOptions);
    }
    debug!(phase = %Phase::Idle, options = options.len(), "starting menu");

    let mode = parts.mode.unwrap_or_else(ColorMode::current);
    let labels: Vec<Label> = options.iter().map(|o| o.label().clone()).collect();
    let initial: Vec<String> = refresh::evaluate_all(&labels)
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();

    let screen = Arc::new(Mutex::new(Screen::new(
        out,
        initial,
        parts.layout,
        parts.palette,
        mode,
        origin_row,
    )));
    screen::lock(&screen).redraw()?;

    let refresher = Refresher::spawn(labels, Arc::clone(&screen), parts.interval)?;
    debug!(phase = %Phase::Running, "menu running");

    let outcome = input_loop(keys, &screen, options.len(), &parts.shortcuts);

    debug!(phase = %Phase::Committing, "stopping label refresher");
    refresher.stop();
    if let Err(e) = screen::lock(&screen).teardown() {
        warn!(error = %e, "teardown failed");
    }

    let index = outcome?;
    let action = options.get_mut(index).and_then(MenuOption::take_action);
    info!(index, has_action = action.is_some(), "option committed");
    debug!(phase = %Phase::Done, "menu finished");

    Ok(Committed { index, action })
}

/// Read and resolve keys until one commits. Returns the committed index.
///
/// The screen lock is taken only after a key has been read, never across
/// the blocking read itself.
fn input_loop<K, W>(
    keys: &mut K,
    screen: &Mutex<Screen<W>>,
    count: usize,
    shortcuts: &ShortcutTable,
) -> Result<usize, MenuError>
where
    K: KeySource + ?Sized,
    W: Write,
{
    loop {
        let event = match keys.read_key() {
            Ok(event) => event,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(MenuError::InputClosed);
            }
            Err(e) => {
                warn!(error = %e, "failed to read key");
                let mut screen = screen::lock(screen);
                screen.set_notice(Some(e.to_string()));
                if let Err(e) = screen.redraw() {
                    warn!(error = %e, "redraw failed");
                }
                continue;
            }
        };

        let key = match map_key(event) {
            Some(KeyInput::Key(key)) => key,
            Some(KeyInput::Interrupt) => return Err(MenuError::Interrupted),
            None => continue,
        };

        let mut screen = screen::lock(screen);
        let selected = screen.selected();
        let transition = update::resolve(key, selected, count, shortcuts);
        trace!(?key, ?transition, selected, "key resolved");

        let notice = match transition {
            Transition::Commit => return Ok(selected),
            Transition::InvalidShortcut(index) => {
                warn!(index, count, "shortcut bound to a missing option");
                Some(INVALID_OPTION.to_string())
            }
            _ => None,
        };

        screen.select(update::apply(selected, transition));
        screen.set_notice(notice);
        if let Err(e) = screen.redraw() {
            warn!(error = %e, "redraw failed");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
