//! Menu state algebra: options, shortcuts, transitions, phases.
//!
//! These types describe everything the controller manipulates. The pure
//! layers (`update`, `view`) program against them; only `run`, `screen`
//! and `refresh` perform effects.

use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossterm::event::KeyCode;

// ============================================================================
// LABELS
// ============================================================================

/// Why a label could not be produced this time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelError(pub String);

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for LabelError {}

impl From<String> for LabelError {
    fn from(message: String) -> Self {
        LabelError(message)
    }
}

impl From<&str> for LabelError {
    fn from(message: &str) -> Self {
        LabelError(message.to_string())
    }
}

type LabelFn = dyn Fn() -> Result<String, LabelError> + Send + Sync;

/// Source of an option's current text.
///
/// Cheap to clone: the refresher thread holds its own handles to the
/// same callables the controller uses for the initial draw.
#[derive(Clone)]
pub struct Label(Arc<LabelFn>);

thread_local! {
    static EVALUATING: Cell<bool> = const { Cell::new(false) };
}

/// Whether this thread is inside [`Label::evaluate`].
///
/// The terminal panic hook consults this so a caught label panic neither
/// restores the terminal nor prints over the menu.
pub(crate) fn in_label_evaluation() -> bool {
    EVALUATING.with(Cell::get)
}

impl Label {
    /// Produce the current text.
    ///
    /// A panicking label is reported as an error like any other failure.
    pub fn evaluate(&self) -> Result<String, LabelError> {
        let previous = EVALUATING.replace(true);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.0)()));
        EVALUATING.set(previous);

        outcome.unwrap_or_else(|payload| {
            Err(LabelError(format!("label panicked: {}", panic_message(&*payload))))
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string payload"
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Label(..)")
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

type ActionFn = Box<dyn FnOnce()>;

/// One selectable entry: a label source, an action and an optional shortcut.
pub struct MenuOption {
    label: Label,
    action: Option<ActionFn>,
    shortcut: Option<KeyCode>,
}

impl MenuOption {
    /// An option whose text never changes.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_label(Label(Arc::new(move || Ok(text.clone()))))
    }

    /// An option whose text is recomputed on every refresh tick.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::from_label(Label(Arc::new(move || Ok(f()))))
    }

    /// Like [`MenuOption::dynamic`], but the label may fail.
    ///
    /// A failing label keeps showing its last good text.
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<String, E> + Send + Sync + 'static,
        E: Into<LabelError>,
    {
        Self::from_label(Label(Arc::new(move || f().map_err(Into::into))))
    }

    fn from_label(label: Label) -> Self {
        MenuOption {
            label,
            action: None,
            shortcut: None,
        }
    }

    /// Run `action` when this option is committed.
    pub fn on_select<F>(mut self, action: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Jump to this option when `key` is pressed.
    pub fn shortcut(mut self, key: KeyCode) -> Self {
        self.shortcut = Some(key);
        self
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn shortcut_key(&self) -> Option<KeyCode> {
        self.shortcut
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub(crate) fn take_action(&mut self) -> Option<ActionFn> {
        self.action.take()
    }
}

impl fmt::Debug for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuOption")
            .field("shortcut", &self.shortcut)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

// ============================================================================
// SHORTCUTS
// ============================================================================

/// Key → option index. Frozen once the menu starts running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutTable {
    bindings: HashMap<KeyCode, usize>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `index`, replacing any earlier binding of that key.
    ///
    /// The index is not checked here; out-of-range targets are reported
    /// when the key is pressed.
    pub fn bind(&mut self, key: KeyCode, index: usize) {
        self.bindings.insert(key, index);
    }

    pub fn get(&self, key: KeyCode) -> Option<usize> {
        self.bindings.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// The effect of one resolved key press on the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    MoveUp,
    MoveDown,
    /// Select the option at this index.
    JumpTo(usize),
    /// End the run with the current selection.
    Commit,
    /// Nothing to do.
    NoOp,
    /// A shortcut pointing outside the option list. No state change,
    /// but the user is told.
    InvalidShortcut(usize),
}

// ============================================================================
// PHASES
// ============================================================================

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Committing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Committing => "committing",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

// ============================================================================
// TESTS
// ============================================================================
