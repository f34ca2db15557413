//! Interactive menu: construction, rendering, live refresh and input.
//!
//! Organized along pure/effect boundaries:
//! - `state`, `update`, `view`, `theme`: pure data and functions
//! - `screen`: the locked output surface shared by both activities
//! - `refresh`: the background label refresher
//! - `run`: terminal lifecycle and the input loop
//! - `builder`: the public `Menu` API tying it together

pub mod builder;
pub mod refresh;
pub mod run;
pub mod screen;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

#[cfg(test)]
pub(crate) mod testsupport;

pub use builder::Menu;
pub use run::{KeySource, MenuError, TerminalKeys};
pub use state::{LabelError, MenuOption, ShortcutTable, Transition};
