use std::time::Instant;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant)]
pub(super) enum TuiEvent {
    /// A frame is due.
    Tick(Instant),
    /// State changed since the last draw.
    Render,
    /// Key input, mouse or resize, with the time it was read.
    Crossterm(CrosstermEvent, Instant),
}
