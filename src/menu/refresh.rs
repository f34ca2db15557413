//! Background label refresher.
//!
//! A dedicated thread re-evaluates every label on a fixed interval and
//! repaints the shared screen when any of them changed. The interval
//! sleep is a `recv_timeout` on the cancellation channel, so a stop
//! request wakes the thread immediately instead of waiting out the tick.

use std::io::{self, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::screen::{self, Screen};
use super::state::Label;

/// Time between refresh ticks unless configured otherwise.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Evaluate every label once.
///
/// A failing label yields `None` for its slot; the others are unaffected.
pub fn evaluate_all(labels: &[Label]) -> Vec<Option<String>> {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| match label.evaluate() {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(index, error = %e, "label evaluation failed, keeping previous text");
                None
            }
        })
        .collect()
}

/// One refresh tick. Returns whether a redraw happened.
///
/// Labels are evaluated before taking the lock; the comparison, cache
/// update and repaint happen under it.
pub fn refresh_once<W: Write>(labels: &[Label], screen: &Mutex<Screen<W>>) -> bool {
    let fresh = evaluate_all(labels);
    let mut screen = screen::lock(screen);

    if !screen.merge_labels(fresh) {
        return false;
    }

    trace!("labels changed, redrawing");
    if let Err(e) = screen.redraw() {
        warn!(error = %e, "refresh redraw failed");
    }
    true
}

/// Handle to a running refresher thread.
#[derive(Debug)]
pub struct Refresher {
    cancel: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl Refresher {
    /// Start refreshing `labels` into `screen` every `interval`.
    pub fn spawn<W>(labels: Vec<Label>, screen: Arc<Mutex<Screen<W>>>, interval: Duration) -> io::Result<Self>
    where
        W: Write + Send + 'static,
    {
        let (cancel, cancelled) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("livemenu-refresh".to_string())
            .spawn(move || {
                debug!(?interval, options = labels.len(), "label refresher started");
                loop {
                    match cancelled.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            refresh_once(&labels, &screen);
                        }
                        // Cancelled, or the controller went away.
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("label refresher stopped");
            })?;

        Ok(Refresher { cancel, handle })
    }

    /// Request cancellation and wait for the thread to finish.
    ///
    /// Once this returns the refresher will not touch the screen again.
    pub fn stop(self) {
        // A send error means the thread already exited.
        let _ = self.cancel.send(());
        if self.handle.join().is_err() {
            warn!("label refresher panicked");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use crate::color::ColorMode;
    use crate::menu::state::MenuOption;
    use crate::types::{Layout, Palette};

    fn shared_screen(labels: &[Label]) -> Arc<Mutex<Screen<Vec<u8>>>> {
        let initial = evaluate_all(labels)
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        Arc::new(Mutex::new(Screen::new(
            Vec::new(),
            initial,
            Layout::default(),
            Palette::default(),
            ColorMode::Plain,
            0,
        )))
    }

    fn counter_label(counter: &Arc<AtomicUsize>) -> Label {
        let c = Arc::clone(counter);
        MenuOption::dynamic(move || format!("count {}", c.load(Ordering::SeqCst)))
            .label()
            .clone()
    }

    fn redraws(screen: &Mutex<Screen<Vec<u8>>>) -> usize {
        screen::lock(screen).redraw_count()
    }

    #[test]
    fn unchanged_labels_do_not_redraw() {
        let labels = vec![MenuOption::new("static").label().clone()];
        let screen = shared_screen(&labels);

        assert!(!refresh_once(&labels, &screen));
        assert!(!refresh_once(&labels, &screen));
        assert_eq!(redraws(&screen), 0);
    }

    #[test]
    fn changed_label_redraws_once_and_shows_new_text() {
        let counter = Arc::new(AtomicUsize::new(0));
        let labels = vec![counter_label(&counter), MenuOption::new("fixed").label().clone()];
        let screen = shared_screen(&labels);

        counter.store(5, Ordering::SeqCst);
        assert!(refresh_once(&labels, &screen));
        assert!(!refresh_once(&labels, &screen));

        let s = screen::lock(&screen);
        assert_eq!(s.redraw_count(), 1);
        assert_eq!(s.labels()[0], "count 5");
        assert!(String::from_utf8_lossy(s.output()).contains("count 5"));
    }

    #[test]
    fn failing_label_does_not_block_others() {
        let counter = Arc::new(AtomicUsize::new(0));
        let broken = MenuOption::fallible(|| Err::<String, _>("boom")).label().clone();
        let labels = vec![broken, counter_label(&counter)];
        let screen = Arc::new(Mutex::new(Screen::new(
            Vec::new(),
            vec!["last good".to_string(), "count 0".to_string()],
            Layout::default(),
            Palette::default(),
            ColorMode::Plain,
            0,
        )));

        counter.store(1, Ordering::SeqCst);
        assert!(refresh_once(&labels, &screen));

        let s = screen::lock(&screen);
        assert_eq!(s.labels(), ["last good", "count 1"]);
    }

    fn explodes_after_first_call() -> Label {
        let calls = Arc::new(AtomicUsize::new(0));
        MenuOption::dynamic(move || {
            if calls.fetch_add(1, Ordering::SeqCst) > 0 {
                panic!("label exploded");
            }
            "steady".to_string()
        })
        .label()
        .clone()
    }

    #[test]
    fn panicking_label_keeps_cached_text_and_others_update() {
        let counter = Arc::new(AtomicUsize::new(0));
        let labels = vec![explodes_after_first_call(), counter_label(&counter)];
        let screen = shared_screen(&labels);

        counter.store(3, Ordering::SeqCst);
        assert!(refresh_once(&labels, &screen));
        counter.store(4, Ordering::SeqCst);
        assert!(refresh_once(&labels, &screen));

        assert_eq!(screen::lock(&screen).labels(), ["steady", "count 4"]);
    }

    #[test]
    fn background_thread_survives_a_panicking_label() {
        let counter = Arc::new(AtomicUsize::new(0));
        let labels = vec![explodes_after_first_call(), counter_label(&counter)];
        let screen = shared_screen(&labels);

        let refresher =
            Refresher::spawn(labels, Arc::clone(&screen), Duration::from_millis(5)).unwrap();
        thread::sleep(Duration::from_millis(20));
        counter.store(9, Ordering::SeqCst);

        let deadline = Instant::now() + Duration::from_secs(5);
        while screen::lock(&screen).labels()[1] != "count 9" && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        refresher.stop();

        assert_eq!(screen::lock(&screen).labels(), ["steady", "count 9"]);
    }

    #[test]
    fn background_thread_picks_up_changes() {
        let counter = Arc::new(AtomicUsize::new(0));
        let labels = vec![counter_label(&counter)];
        let screen = shared_screen(&labels);

        let refresher =
            Refresher::spawn(labels, Arc::clone(&screen), Duration::from_millis(5)).unwrap();
        counter.store(1, Ordering::SeqCst);

        let deadline = Instant::now() + Duration::from_secs(5);
        while redraws(&screen) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        refresher.stop();

        assert_eq!(screen::lock(&screen).labels()[0], "count 1");
        assert!(redraws(&screen) >= 1);
    }

    #[test]
    fn no_redraw_after_stop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let labels = vec![counter_label(&counter)];
        let screen = shared_screen(&labels);

        let refresher =
            Refresher::spawn(labels, Arc::clone(&screen), Duration::from_millis(1)).unwrap();
        refresher.stop();

        let before = redraws(&screen);
        counter.store(42, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(redraws(&screen), before);
        assert_eq!(screen::lock(&screen).labels()[0], "count 0");
    }

    #[test]
    fn stop_interrupts_a_long_sleep() {
        let labels = vec![MenuOption::new("x").label().clone()];
        let screen = shared_screen(&labels);

        let refresher =
            Refresher::spawn(labels, Arc::clone(&screen), Duration::from_secs(60)).unwrap();
        let started = Instant::now();
        refresher.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
