use arrayvec::ArrayVec;

use crate::SpawnCollisionError;

use super::{
    grid::{CellPos, Grid},
    shape::Shape,
};

/// Absolute cells covered by a tetromino.
pub type PieceCells = ArrayVec<CellPos, 4>;

/// A falling tetromino: a shape in its current rotation and the grid position
/// of the shape matrix's top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    shape: Shape,
    anchor: CellPos,
}

impl ActivePiece {
    #[must_use]
    pub fn new(shape: Shape, anchor: CellPos) -> Self {
        Self { shape, anchor }
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn anchor(&self) -> CellPos {
        self.anchor
    }

    /// Returns the absolute cells covered by the piece.
    #[must_use]
    pub fn cells(&self) -> PieceCells {
        cells_at(&self.shape, self.anchor)
    }
}

fn cells_at(shape: &Shape, anchor: CellPos) -> PieceCells {
    shape
        .filled_offsets()
        .map(|(dr, dc)| CellPos::new(anchor.row + dr, anchor.col + dc))
        .collect()
}

/// Either no piece is falling, or exactly one is.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum PieceSlot {
    #[default]
    Empty,
    Active(ActivePiece),
}

/// Moves and rotates the active piece while keeping it inside the grid and
/// clear of locked blocks.
///
/// Every operation either applies completely or leaves the piece untouched.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Grid, PieceController, ShapeKind};
///
/// let grid = Grid::new(10, 20);
/// let mut controller = PieceController::new();
/// controller.spawn(ShapeKind::T.shape(), &grid).unwrap();
///
/// assert!(controller.try_move(-1, 0, &grid));
/// assert!(controller.try_rotate(true, &grid));
/// assert_eq!(controller.occupied_cells().len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceController {
    slot: PieceSlot,
}

impl PieceController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn slot(&self) -> &PieceSlot {
        &self.slot
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActivePiece> {
        match &self.slot {
            PieceSlot::Empty => None,
            PieceSlot::Active(piece) => Some(piece),
        }
    }

    /// Removes the active piece and returns it.
    pub fn take(&mut self) -> Option<ActivePiece> {
        match std::mem::take(&mut self.slot) {
            PieceSlot::Empty => None,
            PieceSlot::Active(piece) => Some(piece),
        }
    }

    /// Places `shape` on the top row, horizontally centered.
    ///
    /// Fails without placing anything if the shape does not fit the grid or
    /// overlaps a locked block.
    pub fn spawn(&mut self, shape: Shape, grid: &Grid) -> Result<(), SpawnCollisionError> {
        let Some(col) = grid.width().checked_sub(shape.cols()) else {
            return Err(SpawnCollisionError);
        };
        let anchor = CellPos::new(0, col / 2);
        if !cells_at(&shape, anchor).iter().all(|pos| grid.is_free(*pos)) {
            return Err(SpawnCollisionError);
        }
        self.slot = PieceSlot::Active(ActivePiece::new(shape, anchor));
        Ok(())
    }

    /// Returns the cells covered by the active piece, or none without one.
    #[must_use]
    pub fn occupied_cells(&self) -> PieceCells {
        self.active().map(ActivePiece::cells).unwrap_or_default()
    }

    /// Shifts the piece by `dx` columns and `dy` rows.
    ///
    /// Returns `false` and changes nothing if any shifted cell leaves the grid
    /// or hits a locked block. The piece's own current cells never count as
    /// collisions.
    pub fn try_move(&mut self, dx: isize, dy: isize, grid: &Grid) -> bool {
        let PieceSlot::Active(piece) = &mut self.slot else {
            return false;
        };
        let current = piece.cells();
        let fits = current.iter().all(|pos| {
            pos.offset(dy, dx).is_some_and(|moved| {
                grid.contains(moved)
                    && (!grid.is_occupied(moved.row, moved.col) || current.contains(&moved))
            })
        });
        if !fits {
            return false;
        }
        let Some(anchor) = piece.anchor.offset(dy, dx) else {
            return false;
        };
        piece.anchor = anchor;
        true
    }

    /// Rotates the piece by 90° about its anchor, without wall kicks.
    ///
    /// Returns `false` and changes nothing if any rotated cell leaves the grid
    /// or hits a locked block.
    pub fn try_rotate(&mut self, clockwise: bool, grid: &Grid) -> bool {
        let PieceSlot::Active(piece) = &mut self.slot else {
            return false;
        };
        let rotated = piece.shape.rotated(clockwise);
        if !cells_at(&rotated, piece.anchor)
            .iter()
            .all(|pos| grid.is_free(*pos))
        {
            return false;
        }
        piece.shape = rotated;
        true
    }
}
