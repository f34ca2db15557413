//! livemenu: interactive terminal selection menus with live-refreshing labels.

pub mod color;
pub mod config;
pub mod logging;
pub mod menu;
pub mod types;
