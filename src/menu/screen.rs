//! The shared output surface.
//!
//! Both the input loop and the label refresher draw through one
//! `Mutex<Screen>`. Everything either of them mutates during a run lives
//! here: the selected index, the label cache, the pending notice and the
//! output sink. A redraw (compose + write + flush) happens entirely under
//! that lock, so frames from the two activities never interleave.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::color::ColorMode;
use crate::types::{Layout, Palette};

use super::view::{self, FrameView};

/// Menu state shared between the input loop and the refresher.
#[derive(Debug)]
pub struct Screen<W> {
    out: W,
    labels: Vec<String>,
    selected: usize,
    layout: Layout,
    palette: Palette,
    mode: ColorMode,
    origin_row: u16,
    notice: Option<String>,
    redraws: usize,
}

/// Lock the screen, recovering from a panic in a previous holder.
///
/// The screen holds no invariant a half-finished redraw could break;
/// the next redraw repaints every row.
pub fn lock<W>(screen: &Mutex<Screen<W>>) -> MutexGuard<'_, Screen<W>> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<W: Write> Screen<W> {
    pub fn new(
        out: W,
        labels: Vec<String>,
        layout: Layout,
        palette: Palette,
        mode: ColorMode,
        origin_row: u16,
    ) -> Self {
        Screen {
            out,
            labels,
            selected: 0,
            layout,
            palette,
            mode,
            origin_row,
            notice: None,
            redraws: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }

    pub fn option_count(&self) -> usize {
        self.labels.len()
    }

    /// The label cache: what was last rendered for each option.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// How many frames have been written so far.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Fold freshly evaluated labels into the cache.
    ///
    /// `None` entries (labels that failed this tick) keep their cached
    /// text. Returns whether anything changed.
    pub fn merge_labels(&mut self, fresh: Vec<Option<String>>) -> bool {
        let mut changed = false;
        for (cached, new) in self.labels.iter_mut().zip(fresh) {
            match new {
                Some(new) if *cached != new => {
                    *cached = new;
                    changed = true;
                }
                _ => {}
            }
        }
        changed
    }

    fn view(&self) -> FrameView<'_> {
        FrameView {
            labels: &self.labels,
            selected: self.selected,
            layout: &self.layout,
            palette: &self.palette,
            mode: self.mode,
        }
    }

    fn frame_rows(&self) -> u16 {
        u16::try_from(view::line_count(&self.view())).unwrap_or(u16::MAX)
    }

    /// Row the notice line is drawn on: one blank row below the frame.
    fn notice_row(&self) -> u16 {
        self.origin_row
            .saturating_add(self.frame_rows())
            .saturating_add(1)
    }

    /// Repaint the whole frame at the origin row, plus the notice line.
    pub fn redraw(&mut self) -> io::Result<()> {
        let frame = view::build(&self.view());
        let notice_row = self.notice_row();

        queue!(self.out, Hide)?;
        for (i, line) in frame.split('\n').enumerate() {
            let row = self
                .origin_row
                .saturating_add(u16::try_from(i).unwrap_or(u16::MAX));
            queue!(self.out, MoveTo(0, row), Print(line), Clear(ClearType::UntilNewLine))?;
        }

        queue!(self.out, MoveTo(0, notice_row), Clear(ClearType::CurrentLine))?;
        if let Some(message) = &self.notice {
            queue!(self.out, Print(view::notice(message, self.mode)))?;
        }

        self.out.flush()?;
        self.redraws += 1;
        Ok(())
    }

    /// Park the cursor below the menu, clear what follows and show it again.
    pub fn teardown(&mut self) -> io::Result<()> {
        let row = self.notice_row();
        queue!(self.out, MoveTo(0, row), Clear(ClearType::FromCursorDown), Show)?;
        self.out.flush()
    }
}

// ============================================================================
// TESTS
// ============================================================================
