use std::time::Instant;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called once the terminal is set up, before the first frame. The runtime
    /// already knows at this point whether key releases will be reported.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles a terminal event read at `now`.
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event, now: Instant);

    /// Advances the application to `now` (called once per frame).
    fn update(&mut self, runtime: &mut Runtime, now: Instant);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);
}
