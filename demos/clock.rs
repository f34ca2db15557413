//! Live-label demo - run with: cargo run --example clock
//!
//! The first option counts seconds since start, the second shows how many
//! times the label functions have been polled. Both update without any key
//! being pressed. F1 jumps straight to "Quit".

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use livemenu::menu::{Menu, MenuError, MenuOption};
use livemenu::types::Color;

fn main() -> ExitCode {
    let started = Instant::now();
    let polls = Arc::new(AtomicUsize::new(0));

    let menu = Menu::new()
        .prompt("Live labels (arrows to move, Enter to pick, F1 for Quit):")
        .selector("> ")
        .option_prefix("  ")
        .colors_when_selected(Color::BLACK, Color::rgb(135, 206, 250))
        .refresh_interval(Duration::from_millis(250))
        .option(
            MenuOption::dynamic(move || format!("Uptime: {}s", started.elapsed().as_secs()))
                .on_select(move || println!("Ran for {}s", started.elapsed().as_secs())),
        )
        .option(MenuOption::dynamic(move || {
            format!("Polled {} times", polls.fetch_add(1, Ordering::Relaxed))
        }))
        .option(
            MenuOption::new("Quit")
                .shortcut(KeyCode::F(1))
                .on_select(|| println!("Bye")),
        );

    match menu.run() {
        Ok(index) => {
            println!("Picked option {}", index);
            ExitCode::SUCCESS
        }
        Err(MenuError::Interrupted) => ExitCode::from(130),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
