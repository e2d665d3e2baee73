use std::time::{Duration, Instant};

use crate::core::{grid::Grid, piece::PieceCells};

use super::{
    catalog::ShapeCatalog,
    config::GameConfig,
    input::Command,
    playfield::{Playfield, StepReport},
    stats::SessionStats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A playfield driven by wall-clock gravity, with pause and statistics.
///
/// Gravity runs on a fixed cadence measured from the session start. A tick
/// performs at most one step even when several intervals have gone by; after
/// such a stall the cadence restarts from the late tick instead of catching up.
#[derive(Debug, Clone)]
pub struct GameSession {
    field: Playfield,
    stats: SessionStats,
    state: SessionState,
    fall_interval: Duration,
    last_gravity: Instant,
}

impl GameSession {
    #[must_use]
    pub fn new(config: &GameConfig, now: Instant) -> Self {
        Self::with_catalog(config, ShapeCatalog::new(), now)
    }

    /// Like [`Self::new`], but the shape sequence is fixed by `seed`.
    #[must_use]
    pub fn with_seed(config: &GameConfig, seed: u64, now: Instant) -> Self {
        Self::with_catalog(config, ShapeCatalog::with_seed(seed), now)
    }

    fn with_catalog(config: &GameConfig, catalog: ShapeCatalog, now: Instant) -> Self {
        assert!(
            !config.fall_interval.is_zero(),
            "fall interval must be non-zero"
        );
        let field = Playfield::new(config.board_width, config.board_height, catalog);
        let state = if field.phase().is_game_over() {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
        Self {
            field,
            stats: SessionStats::new(),
            state,
            fall_interval: config.fall_interval,
            last_gravity: now,
        }
    }

    #[must_use]
    pub fn field(&self) -> &Playfield {
        &self.field
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.field.grid()
    }

    /// Returns the cells of the falling piece, for drawing.
    #[must_use]
    pub fn occupied_cells(&self) -> PieceCells {
        self.field.occupied_cells()
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    /// Runs a gravity step if one is due at `now`.
    ///
    /// Returns the step's report, or `None` when no step ran.
    pub fn tick(&mut self, now: Instant) -> Option<StepReport> {
        if !self.state.is_playing() {
            return None;
        }
        if now.saturating_duration_since(self.last_gravity) < self.fall_interval {
            return None;
        }
        self.last_gravity += self.fall_interval;
        if now.saturating_duration_since(self.last_gravity) >= self.fall_interval {
            self.last_gravity = now;
        }

        let report = self.field.advance();
        self.stats.record(report);
        if report.game_over {
            self.state = SessionState::GameOver;
        }
        Some(report)
    }

    /// Applies a player command to the falling piece.
    ///
    /// Returns whether the piece moved. Commands are ignored unless the
    /// session is playing.
    pub fn apply(&mut self, command: Command) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        match command {
            Command::MoveLeft => self.field.try_move(-1, 0),
            Command::MoveRight => self.field.try_move(1, 0),
            Command::MoveDown => self.field.try_move(0, 1),
            Command::RotateClockwise => self.field.try_rotate(true),
            Command::RotateCounterClockwise => self.field.try_rotate(false),
        }
    }

    /// Pauses or resumes play. Gravity restarts a full interval after resuming.
    pub fn toggle_pause(&mut self, now: Instant) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => {
                self.last_gravity = now;
                SessionState::Playing
            }
            SessionState::GameOver => SessionState::GameOver,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn session(t0: Instant) -> GameSession {
        GameSession::with_seed(&GameConfig::default(), 11, t0)
    }

    fn anchor(session: &GameSession) -> crate::CellPos {
        session.field().active_piece().unwrap().anchor()
    }

    #[test]
    fn test_no_step_before_interval() {
        let t0 = Instant::now();
        let mut session = session(t0);
        let start = anchor(&session);
        assert_eq!(session.tick(t0 + ms(999)), None);
        assert_eq!(anchor(&session), start);
    }

    #[test]
    fn test_step_each_interval() {
        let t0 = Instant::now();
        let mut session = session(t0);
        let start = anchor(&session);
        assert_eq!(session.tick(t0 + ms(1000)), Some(StepReport::default()));
        assert_eq!(session.tick(t0 + ms(1500)), None);
        assert_eq!(session.tick(t0 + ms(2010)), Some(StepReport::default()));
        assert_eq!(anchor(&session).row, start.row + 2);
    }

    #[test]
    fn test_stall_runs_single_step() {
        let t0 = Instant::now();
        let mut session = session(t0);
        let start = anchor(&session);
        assert!(session.tick(t0 + ms(5500)).is_some());
        assert_eq!(anchor(&session).row, start.row + 1);
        // The cadence restarts from the late tick.
        assert_eq!(session.tick(t0 + ms(6000)), None);
        assert!(session.tick(t0 + ms(6500)).is_some());
    }

    #[test]
    fn test_commands_move_piece() {
        let t0 = Instant::now();
        let mut session = session(t0);
        let start = anchor(&session);
        assert!(session.apply(Command::MoveLeft));
        assert!(session.apply(Command::MoveDown));
        assert_eq!(anchor(&session).col, start.col - 1);
        assert_eq!(anchor(&session).row, start.row + 1);
    }

    #[test]
    fn test_soft_drop_at_floor_does_not_lock() {
        let t0 = Instant::now();
        let mut session = session(t0);
        while session.apply(Command::MoveDown) {}
        assert_eq!(session.grid().occupied_count(), 0);
        assert_eq!(session.stats().locked_pieces(), 0);

        let report = session.tick(t0 + ms(1000)).unwrap();
        assert!(report.locked);
        assert_eq!(session.grid().occupied_count(), 4);
        assert_eq!(session.stats().locked_pieces(), 1);
    }

    #[test]
    fn test_pause_freezes_gravity_and_commands() {
        let t0 = Instant::now();
        let mut session = session(t0);
        let start = anchor(&session);
        session.toggle_pause(t0 + ms(100));
        assert!(session.state().is_paused());
        assert_eq!(session.tick(t0 + ms(3000)), None);
        assert!(!session.apply(Command::MoveRight));
        assert_eq!(anchor(&session), start);

        session.toggle_pause(t0 + ms(3000));
        assert!(session.state().is_playing());
        assert_eq!(session.tick(t0 + ms(3999)), None);
        assert!(session.tick(t0 + ms(4000)).is_some());
    }

    #[test]
    fn test_game_over_after_stacking_up() {
        // Untouched pieces stack in the middle columns and never fill a row.
        let config = GameConfig {
            board_height: 4,
            ..GameConfig::default()
        };
        let t0 = Instant::now();
        let mut session = GameSession::with_seed(&config, 3, t0);
        let mut now = t0;
        for _ in 0..50 {
            if session.state().is_game_over() {
                break;
            }
            now += ms(1000);
            session.tick(now);
        }
        assert!(session.state().is_game_over());
        assert!(session.field().phase().is_game_over());
        assert_eq!(session.tick(now + ms(1000)), None);
        assert!(!session.apply(Command::MoveLeft));

        session.toggle_pause(now);
        assert!(session.state().is_game_over());
    }
}
