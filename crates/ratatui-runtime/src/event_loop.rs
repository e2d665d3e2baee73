use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Default frame interval (60 frames per second).
pub(super) const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Frame clock.
///
/// Yields a tick once per frame interval and a render whenever a tick or an
/// input event has changed state since the last render.
#[derive(Debug)]
pub(super) struct EventLoop {
    frame_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(now: Instant) -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            last_tick: now,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub(super) fn set_frame_interval(&mut self, interval: Duration) {
        assert!(!interval.is_zero(), "frame interval must be non-zero");
        self.frame_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until a frame is due or a crossterm event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }
            if !event::poll(self.timeout(now))? {
                continue;
            }
            let event = event::read()?;
            self.dirty = true;
            return Ok(TuiEvent::Crossterm(event, Instant::now()));
        }
    }

    /// Returns the tick or render due at `now`, if any.
    ///
    /// Ticks take priority so that a frame is updated before it is drawn.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if now.saturating_duration_since(self.last_tick) >= self.frame_interval {
            self.last_tick = now;
            self.dirty = true;
            return Some(TuiEvent::Tick(now));
        }
        if self.dirty {
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn timeout(&self, now: Instant) -> Duration {
        (self.last_tick + self.frame_interval).saturating_duration_since(now)
    }
}
