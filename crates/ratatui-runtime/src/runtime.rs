use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};
use ratatui::DefaultTerminal;

use crate::{App, event::TuiEvent, event_loop::EventLoop};

/// TUI application runtime.
///
/// Manages the frame loop and executes applications that implement the `App` trait.
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
    key_release_events: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a new Runtime running at 60 frames per second.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(Instant::now()),
            key_release_events: false,
        }
    }

    /// Sets the frame rate (Hz, frames per second).
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.set_frame_interval(Duration::from_secs_f64(1.0 / rate));
    }

    pub fn set_frame_interval(&mut self, interval: Duration) {
        self.events.set_frame_interval(interval);
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.events.frame_interval()
    }

    /// Returns whether the terminal reports key releases and repeats.
    ///
    /// Without this, a held key shows up as a stream of presses from the OS
    /// key repeat and its release is never seen.
    #[must_use]
    pub fn key_release_events(&self) -> bool {
        self.key_release_events
    }

    /// Runs the application.
    ///
    /// 1. Sets up the terminal and asks it to report key event types
    /// 2. Calls `app.init()` for initialization
    /// 3. Runs the frame loop until `app.should_exit()` returns true
    ///    - frame tick: calls `app.update()`
    ///    - render: calls `app.draw()`
    ///    - terminal event: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.key_release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
            if self.key_release_events {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }

            app.init(&mut self);
            let result = self.drive(terminal, app);

            if self.key_release_events {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }

    fn drive<A>(&mut self, terminal: &mut DefaultTerminal, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick(now) => {
                    app.update(self, now);
                }
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event, now) => {
                    app.handle_event(self, event, now);
                }
            }
        }
        Ok(())
    }
}
