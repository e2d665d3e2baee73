use super::playfield::StepReport;

/// Counters for a game session.
///
/// Tracks how many pieces have locked and how many lines they cleared. There
/// is no score or level here; the counts are only shown to the player.
///
/// # Example
///
/// ```
/// use blockfall_engine::{SessionStats, StepReport};
///
/// let mut stats = SessionStats::new();
/// stats.record(StepReport { locked: true, cleared_lines: 2, game_over: false });
///
/// assert_eq!(stats.locked_pieces(), 1);
/// assert_eq!(stats.cleared_lines(), 2);
/// assert_eq!(stats.line_clear_counter()[2], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    locked_pieces: usize,
    cleared_lines: usize,
    line_clear_counter: [usize; 5],
}

impl SessionStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked_pieces: 0,
            cleared_lines: 0,
            line_clear_counter: [0; 5],
        }
    }

    /// Returns the number of pieces locked into the grid.
    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    /// Returns the total number of lines cleared.
    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Returns a histogram of locks by number of lines they cleared.
    ///
    /// Index 0 counts locks that cleared nothing; index 4 counts four-line clears.
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[usize; 5] {
        &self.line_clear_counter
    }

    /// Updates the counters after a gravity step. Steps that did not lock are ignored.
    pub fn record(&mut self, report: StepReport) {
        if !report.locked {
            return;
        }
        self.locked_pieces += 1;
        self.cleared_lines += report.cleared_lines;
        if let Some(count) = self.line_clear_counter.get_mut(report.cleared_lines) {
            *count += 1;
        }
    }
}
