use crate::{
    SpawnCollisionError,
    core::{
        grid::Grid,
        piece::{ActivePiece, PieceCells, PieceController},
        shape::Shape,
    },
};

use super::catalog::ShapeCatalog;

/// Where the step/lock cycle currently stands.
///
/// Between calls the field is either [`Phase::Falling`] or [`Phase::GameOver`];
/// the other phases are only visible when the individual steps of the cycle
/// are driven by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Phase {
    /// A piece is falling.
    Falling,
    /// The piece could not move down and is being committed to the grid.
    Locking,
    /// The piece has locked; full lines are waiting to be cleared.
    LineClear,
    /// Lines have been cleared; the next piece is waiting to spawn.
    Spawning,
    /// A new piece could not be placed.
    GameOver,
}

/// Outcome of one gravity step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The piece locked instead of moving down.
    pub locked: bool,
    /// Number of lines removed after the lock.
    pub cleared_lines: usize,
    /// The next piece could not spawn.
    pub game_over: bool,
}

/// The grid, the falling piece and the shape supply, driven through the
/// fall → lock → clear → spawn cycle.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Playfield, ShapeCatalog};
///
/// let mut field = Playfield::new(10, 20, ShapeCatalog::with_seed(0));
///
/// // Drop the first piece all the way down.
/// let mut report = field.advance();
/// while !report.locked {
///     report = field.advance();
/// }
/// assert_eq!(field.grid().occupied_count(), 4);
/// assert!(field.phase().is_falling());
/// ```
#[derive(Debug, Clone)]
pub struct Playfield {
    grid: Grid,
    controller: PieceController,
    catalog: ShapeCatalog,
    phase: Phase,
}

impl Playfield {
    /// Creates an empty field and spawns the first piece.
    #[must_use]
    pub fn new(width: usize, height: usize, catalog: ShapeCatalog) -> Self {
        let mut this = Self {
            grid: Grid::new(width, height),
            controller: PieceController::new(),
            catalog,
            phase: Phase::Spawning,
        };
        let shape = this.random_shape();
        _ = this.spawn(shape);
        this
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.controller.active()
    }

    /// Returns the cells of the falling piece, for drawing.
    #[must_use]
    pub fn occupied_cells(&self) -> PieceCells {
        self.controller.occupied_cells()
    }

    /// Draws the next spawn shape from the catalog.
    pub fn random_shape(&mut self) -> Shape {
        self.catalog.random_shape()
    }

    /// Places `shape` at the spawn position.
    ///
    /// On failure the field enters [`Phase::GameOver`] and stays there.
    pub fn spawn(&mut self, shape: Shape) -> Result<(), SpawnCollisionError> {
        if self.phase.is_game_over() {
            return Err(SpawnCollisionError);
        }
        match self.controller.spawn(shape, &self.grid) {
            Ok(()) => {
                self.phase = Phase::Falling;
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::GameOver;
                Err(e)
            }
        }
    }

    /// Shifts the falling piece; returns whether it moved.
    pub fn try_move(&mut self, dx: isize, dy: isize) -> bool {
        self.phase.is_falling() && self.controller.try_move(dx, dy, &self.grid)
    }

    /// Rotates the falling piece; returns whether it turned.
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        self.phase.is_falling() && self.controller.try_rotate(clockwise, &self.grid)
    }

    /// Moves the falling piece one row down, or locks it where it is.
    ///
    /// Returns `true` when the piece locked (its cells now belong to the grid
    /// and no piece is falling) and `false` when it moved. Without a falling
    /// piece this reports `true` so the caller spawns the next one.
    pub fn perform_step(&mut self) -> bool {
        if self.controller.try_move(0, 1, &self.grid) {
            return false;
        }
        let Some(piece) = self.controller.take() else {
            return true;
        };
        self.phase = Phase::Locking;
        self.grid.lock_cells(piece.cells(), piece.shape().kind());
        self.phase = Phase::LineClear;
        true
    }

    /// Removes full lines from the grid and returns how many were removed.
    pub fn clear_full_lines(&mut self) -> usize {
        let count = self.grid.clear_full_lines();
        if self.phase.is_line_clear() {
            self.phase = Phase::Spawning;
        }
        count
    }

    /// Runs one gravity tick: step, and after a lock clear lines and spawn.
    pub fn advance(&mut self) -> StepReport {
        if self.phase.is_game_over() {
            return StepReport {
                game_over: true,
                ..StepReport::default()
            };
        }
        if !self.perform_step() {
            return StepReport::default();
        }
        let cleared_lines = self.clear_full_lines();
        let shape = self.random_shape();
        let game_over = self.spawn(shape).is_err();
        StepReport {
            locked: true,
            cleared_lines,
            game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellPos, ShapeKind};

    fn field_with(kind: ShapeKind, width: usize, height: usize) -> Playfield {
        let mut field = Playfield {
            grid: Grid::new(width, height),
            controller: PieceController::new(),
            catalog: ShapeCatalog::with_seed(0),
            phase: Phase::Spawning,
        };
        field.spawn(kind.shape()).unwrap();
        field
    }

    fn fill_row_except(field: &mut Playfield, row: usize, skip: &[usize]) {
        let cells: Vec<_> = (0..field.grid.width())
            .filter(|col| !skip.contains(col))
            .map(|col| CellPos::new(row, col))
            .collect();
        field.grid.lock_cells(cells, ShapeKind::J);
    }

    #[test]
    fn test_new_field_has_falling_piece() {
        let field = Playfield::new(10, 20, ShapeCatalog::with_seed(5));
        assert!(field.phase().is_falling());
        assert_eq!(field.occupied_cells().len(), 4);
        assert_eq!(field.grid().occupied_count(), 0);
    }

    #[test]
    fn test_step_moves_piece_down() {
        let mut field = field_with(ShapeKind::O, 10, 20);
        assert!(!field.perform_step());
        assert_eq!(field.active_piece().unwrap().anchor(), CellPos::new(1, 4));
        assert_eq!(field.grid().occupied_count(), 0);
    }

    #[test]
    fn test_step_locks_on_floor() {
        let mut field = field_with(ShapeKind::O, 10, 4);
        assert!(!field.perform_step());
        assert!(!field.perform_step());
        assert!(field.perform_step());

        assert!(field.active_piece().is_none());
        assert!(field.phase().is_line_clear());
        for (row, col) in [(2, 4), (2, 5), (3, 4), (3, 5)] {
            assert_eq!(field.grid().cell(row, col), Some(ShapeKind::O));
        }
    }

    #[test]
    fn test_step_locks_on_block() {
        let mut field = field_with(ShapeKind::I, 10, 20);
        field.grid.lock_cells([CellPos::new(1, 6)], ShapeKind::T);
        assert!(field.perform_step());
        assert_eq!(field.grid().occupied_count(), 5);
    }

    #[test]
    fn test_step_without_piece_reports_locked() {
        let mut field = field_with(ShapeKind::O, 10, 4);
        while !field.perform_step() {}
        let grid = field.grid().clone();
        assert!(field.perform_step());
        assert_eq!(field.grid(), &grid);
    }

    #[test]
    fn test_manual_cycle_phases() {
        let mut field = field_with(ShapeKind::O, 10, 4);
        while !field.perform_step() {}
        assert!(field.phase().is_line_clear());
        assert_eq!(field.clear_full_lines(), 0);
        assert!(field.phase().is_spawning());
        field.spawn(ShapeKind::T.shape()).unwrap();
        assert!(field.phase().is_falling());
    }

    #[test]
    fn test_advance_clears_completed_line() {
        // On a 4-wide grid a flat I-piece fills a whole row by itself.
        let mut field = field_with(ShapeKind::I, 4, 6);
        let mut report = field.advance();
        while !report.locked {
            report = field.advance();
        }
        assert_eq!(report.cleared_lines, 1);
        assert!(!report.game_over);
        assert_eq!(field.grid().occupied_count(), 0);
        assert!(field.phase().is_falling());
    }

    #[test]
    fn test_lock_above_full_row_clears_only_full_row() {
        let mut field = field_with(ShapeKind::O, 10, 6);
        fill_row_except(&mut field, 5, &[]);
        let mut report = field.advance();
        while !report.locked {
            report = field.advance();
        }
        // The O locked in rows 3 and 4; only the pre-filled row 5 was full.
        assert_eq!(report.cleared_lines, 1);
        assert_eq!(field.grid().occupied_count(), 4);
        for (row, col) in [(4, 4), (4, 5), (5, 4), (5, 5)] {
            assert_eq!(field.grid().cell(row, col), Some(ShapeKind::O));
        }
    }

    #[test]
    fn test_lock_completing_two_rows_clears_both() {
        let mut field = field_with(ShapeKind::O, 4, 6);
        fill_row_except(&mut field, 4, &[1, 2]);
        fill_row_except(&mut field, 5, &[1, 2]);
        field.grid.lock_cells([CellPos::new(3, 0)], ShapeKind::S);
        // The O spawns over columns 1..3 and fills the gap in both rows.
        let mut report = field.advance();
        while !report.locked {
            report = field.advance();
        }
        assert_eq!(report.cleared_lines, 2);
        assert_eq!(field.grid().cell(5, 0), Some(ShapeKind::S));
        assert_eq!(field.grid().occupied_count(), 1);
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut field = field_with(ShapeKind::O, 10, 4);
        for row in 0..4 {
            fill_row_except(&mut field, row, &[0]);
        }
        // No piece in flight, so the next advance goes straight to spawning.
        field.controller = PieceController::new();
        let report = field.advance();
        assert!(report.locked);
        assert!(report.game_over);
        assert!(field.phase().is_game_over());

        assert!(!field.try_move(1, 0));
        assert!(!field.try_rotate(true));
        assert!(field.advance().game_over);
        assert!(field.spawn(ShapeKind::I.shape()).is_err());
    }

    #[test]
    fn test_commands_after_game_over_do_not_mutate() {
        let mut field = field_with(ShapeKind::O, 10, 4);
        for row in 0..4 {
            fill_row_except(&mut field, row, &[0]);
        }
        field.controller = PieceController::new();
        field.advance();
        let grid = field.grid().clone();
        field.advance();
        assert_eq!(field.grid(), &grid);
    }
}
