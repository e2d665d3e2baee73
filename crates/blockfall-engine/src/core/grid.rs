use serde::{Deserialize, Serialize};

use super::shape::ShapeKind;

/// Absolute cell coordinate on the grid.
///
/// Row 0 is the top row; columns grow rightward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns this position shifted by `drow` rows and `dcol` columns.
    ///
    /// Returns `None` when the result would be above row 0 or left of column 0.
    #[must_use]
    pub fn offset(self, drow: isize, dcol: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(drow)?,
            col: self.col.checked_add_signed(dcol)?,
        })
    }
}

/// Fixed-size occupancy matrix of locked blocks.
///
/// Cells are stored row-major in a flat buffer. A cell is occupied iff it holds
/// the [`ShapeKind`] of the piece that locked there. The active piece is never
/// written into the grid until it locks.
///
/// # Example
///
/// ```
/// use blockfall_engine::{CellPos, Grid, ShapeKind};
///
/// let mut grid = Grid::new(10, 20);
/// let bottom_row: Vec<_> = (0..10).map(|col| CellPos::new(19, col)).collect();
/// grid.lock_cells(bottom_row, ShapeKind::I);
///
/// assert_eq!(grid.clear_full_lines(), 1);
/// assert!(!grid.is_occupied(19, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<ShapeKind>>,
}

impl Grid {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must not be empty");
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether `pos` lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }

    /// Returns whether the cell holds a locked block.
    ///
    /// Coordinates must be inside the grid.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)].is_some()
    }

    /// Returns the kind of the block locked at the cell, if any.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<ShapeKind> {
        self.cells[self.index(row, col)]
    }

    /// Returns whether `pos` is inside the grid and not occupied.
    #[must_use]
    pub fn is_free(&self, pos: CellPos) -> bool {
        self.contains(pos) && !self.is_occupied(pos.row, pos.col)
    }

    /// Marks every given cell as occupied by `kind`.
    ///
    /// Cells must be inside the grid.
    pub fn lock_cells<I>(&mut self, cells: I, kind: ShapeKind)
    where
        I: IntoIterator<Item = CellPos>,
    {
        for pos in cells {
            let idx = self.index(pos.row, pos.col);
            self.cells[idx] = Some(kind);
        }
    }

    fn row_cells(&self, row: usize) -> &[Option<ShapeKind>] {
        &self.cells[row * self.width..][..self.width]
    }

    /// Returns whether every column of `row` is occupied.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.height && self.row_cells(row).iter().all(Option::is_some)
    }

    /// Returns an iterator over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<ShapeKind>]> {
        self.cells.chunks_exact(self.width)
    }

    /// Returns the number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Removes every full row at once and returns how many were removed.
    ///
    /// Remaining rows keep their relative order and sink to the bottom; the
    /// same number of empty rows is inserted at the top, so the height never
    /// changes.
    pub fn clear_full_lines(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;
        for row in (0..self.height).rev() {
            if self.is_row_full(row) {
                count += 1;
                continue;
            }
            if count > 0 {
                let src = row * width;
                self.cells.copy_within(src..src + width, src + count * width);
            }
        }
        self.cells[..count * width].fill(None);
        count
    }
}
