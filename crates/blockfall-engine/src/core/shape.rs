use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Largest bounding box any tetromino needs (4×1, 1×4, 2×3, 3×2 or 2×2).
const MAX_SHAPE_CELLS: usize = 4 * 4;

/// Enum representing the type of tetromino.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of tetromino kinds (7).
    pub const LEN: usize = 7;

    /// All kinds, in declaration order.
    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::T,
    ];

    /// Returns the spawn-orientation shape matrix of this kind.
    #[must_use]
    pub fn shape(self) -> Shape {
        const C: bool = true;
        const E: bool = false;
        match self {
            ShapeKind::I => Shape::from_rows(self, &[&[C, C, C, C]]),
            ShapeKind::O => Shape::from_rows(self, &[&[C, C], &[C, C]]),
            ShapeKind::S => Shape::from_rows(self, &[&[E, C, C], &[C, C, E]]),
            ShapeKind::Z => Shape::from_rows(self, &[&[C, C, E], &[E, C, C]]),
            ShapeKind::J => Shape::from_rows(self, &[&[C, E, E], &[C, C, C]]),
            ShapeKind::L => Shape::from_rows(self, &[&[E, E, C], &[C, C, C]]),
            ShapeKind::T => Shape::from_rows(self, &[&[E, C, E], &[C, C, C]]),
        }
    }

    /// Returns the single character representation of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
            ShapeKind::T => 'T',
        }
    }

    /// Parses a kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_char('O'), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            'J' => Some(ShapeKind::J),
            'L' => Some(ShapeKind::L),
            'T' => Some(ShapeKind::T),
            _ => None,
        }
    }
}

/// A tetromino's filled cells inside its tight rectangular bounding box.
///
/// The matrix is stored row-major in an owned buffer, so rotating never aliases
/// the source shape.
///
/// # Example
///
/// ```
/// use blockfall_engine::ShapeKind;
///
/// let shape = ShapeKind::I.shape();
/// assert_eq!((shape.rows(), shape.cols()), (1, 4));
///
/// let vertical = shape.rotated_clockwise();
/// assert_eq!((vertical.rows(), vertical.cols()), (4, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    kind: ShapeKind,
    rows: usize,
    cols: usize,
    cells: ArrayVec<bool, MAX_SHAPE_CELLS>,
}

impl Shape {
    fn from_rows(kind: ShapeKind, rows: &[&[bool]]) -> Self {
        let cols = rows[0].len();
        assert!(rows.iter().all(|row| row.len() == cols));
        assert!(rows.len() * cols <= MAX_SHAPE_CELLS);
        Self {
            kind,
            rows: rows.len(),
            cols,
            cells: rows.iter().flat_map(|row| row.iter().copied()).collect(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns whether the matrix cell at (`row`, `col`) is filled.
    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Returns an iterator of `(row, col)` offsets of the filled cells, row-major.
    pub fn filled_offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(|(i, _)| (i / self.cols, i % self.cols))
    }

    /// Returns the shape rotated by 90° clockwise.
    ///
    /// The rows are reversed, then the matrix is transposed.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let (rows, cols) = (self.cols, self.rows);
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| self.cells[(self.rows - 1 - c) * self.cols + r])
            .collect();
        Self {
            kind: self.kind,
            rows,
            cols,
            cells,
        }
    }

    /// Returns the shape rotated by 90° counter-clockwise.
    ///
    /// The matrix is transposed, then the rows are reversed.
    #[must_use]
    pub fn rotated_counter_clockwise(&self) -> Self {
        let (rows, cols) = (self.cols, self.rows);
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| self.cells[c * self.cols + (self.cols - 1 - r)])
            .collect();
        Self {
            kind: self.kind,
            rows,
            cols,
            cells,
        }
    }

    /// Returns the shape rotated in the requested direction.
    #[must_use]
    pub fn rotated(&self, clockwise: bool) -> Self {
        if clockwise {
            self.rotated_clockwise()
        } else {
            self.rotated_counter_clockwise()
        }
    }
}
