//! Cursor blink: a two-phase repeating timer driven by host ticks.
//!
//! Each run hands out a [`BlinkHandle`]. Cancelling the handle stops the run
//! at its next phase transition; starting a new run cancels the previous one.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Cancellation token of one blink run
#[derive(Debug, Clone, Default)]
pub struct BlinkHandle(Rc<Cell<bool>>);

impl BlinkHandle {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Visible,
    Hidden,
}

#[derive(Debug)]
pub struct CursorBlink {
    visible_for: Duration,
    hidden_for: Duration,
    phase: BlinkPhase,
    phase_started: Instant,
    handle: Option<BlinkHandle>,
}

impl CursorBlink {
    pub fn new(visible_for: Duration, hidden_for: Duration, now: Instant) -> Self {
        let min = Duration::from_millis(1);
        Self {
            visible_for: visible_for.max(min),
            hidden_for: hidden_for.max(min),
            phase: BlinkPhase::Hidden,
            phase_started: now,
            handle: None,
        }
    }

    /// Start a fresh run in the visible phase, cancelling any previous run
    pub fn start(&mut self, now: Instant) -> BlinkHandle {
        self.cancel();
        let handle = BlinkHandle::default();
        self.handle = Some(handle.clone());
        self.phase = BlinkPhase::Visible;
        self.phase_started = now;
        handle
    }

    /// Stop blinking and hide the cursor
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.phase = BlinkPhase::Hidden;
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_cancelled())
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Advance to `now`. Returns true when the cursor visibility changed.
    ///
    /// Whole visible+hidden cycles missed since the last tick are skipped at
    /// once; they leave the phase where it was.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(handle) = &self.handle else {
            return false;
        };
        if handle.is_cancelled() {
            self.handle = None;
            let was_visible = self.phase == BlinkPhase::Visible;
            self.phase = BlinkPhase::Hidden;
            return was_visible;
        }

        let elapsed = now.saturating_duration_since(self.phase_started);
        let cycle = (self.visible_for + self.hidden_for).as_nanos();
        let skipped = elapsed.as_nanos() / cycle * cycle;
        self.phase_started += Duration::from_nanos(skipped as u64);

        let duration = match self.phase {
            BlinkPhase::Visible => self.visible_for,
            BlinkPhase::Hidden => self.hidden_for,
        };
        if now.saturating_duration_since(self.phase_started) < duration {
            return false;
        }
        self.phase_started += duration;
        self.phase = match self.phase {
            BlinkPhase::Visible => BlinkPhase::Hidden,
            BlinkPhase::Hidden => BlinkPhase::Visible,
        };
        true
    }

    /// Opacity to paint the caret with
    pub fn opacity(&self) -> f32 {
        match self.phase {
            BlinkPhase::Visible if self.is_running() => 1.0,
            _ => 0.0,
        }
    }
}
