//! Pure key resolution: (key, selection, shortcuts) → Transition.
//!
//! Fully testable without a terminal. The controller feeds every key
//! press through `resolve` and folds the result into the selection with
//! `apply`.

use crossterm::event::KeyCode;

use super::state::{ShortcutTable, Transition};

/// Resolve one key press against the current selection bounds.
///
/// Shortcut bindings are consulted first, so a shortcut bound to an
/// arrow key or Enter overrides the built-in meaning of that key.
pub fn resolve(key: KeyCode, selected: usize, count: usize, shortcuts: &ShortcutTable) -> Transition {
    if let Some(index) = shortcuts.get(key) {
        return if index < count {
            Transition::JumpTo(index)
        } else {
            Transition::InvalidShortcut(index)
        };
    }

    match key {
        KeyCode::Up if selected > 0 => Transition::MoveUp,
        KeyCode::Down if selected + 1 < count => Transition::MoveDown,
        KeyCode::Enter => Transition::Commit,
        _ => Transition::NoOp,
    }
}

/// Fold a transition into the selected index.
pub fn apply(selected: usize, transition: Transition) -> usize {
    match transition {
        Transition::MoveUp => selected.saturating_sub(1),
        Transition::MoveDown => selected + 1,
        Transition::JumpTo(index) => index,
        Transition::Commit | Transition::NoOp | Transition::InvalidShortcut(_) => selected,
    }
}

// ============================================================================
// TESTS
// ============================================================================
