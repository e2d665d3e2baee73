use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{Shape, ShapeKind};

/// Supplies spawn shapes drawn uniformly at random.
///
/// Every draw is independent of the previous ones: there is no bag and no
/// repeat protection, so the same kind may come up several times in a row.
///
/// # Example
///
/// ```
/// use blockfall_engine::ShapeCatalog;
///
/// // Two catalogs with the same seed produce the same sequence.
/// let mut a = ShapeCatalog::with_seed(42);
/// let mut b = ShapeCatalog::with_seed(42);
/// for _ in 0..10 {
///     assert_eq!(a.random_shape(), b.random_shape());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ShapeCatalog {
    rng: Pcg32,
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeCatalog {
    /// Creates a catalog seeded from the thread-local random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible sequence.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draws a kind uniformly at random.
    pub fn random_kind(&mut self) -> ShapeKind {
        self.rng.random()
    }

    /// Draws the spawn-orientation shape of a uniformly random kind.
    pub fn random_shape(&mut self) -> Shape {
        self.random_kind().shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_are_drawn() {
        let mut catalog = ShapeCatalog::with_seed(1);
        let mut counts = [0_usize; ShapeKind::LEN];
        for _ in 0..7000 {
            counts[catalog.random_kind() as usize] += 1;
        }
        // Uniform draws: each kind lands near 1000.
        for (kind, count) in ShapeKind::ALL.iter().zip(counts) {
            assert!((800..1200).contains(&count), "{kind:?} drawn {count} times");
        }
    }

    #[test]
    fn test_random_shape_is_spawn_orientation() {
        let mut catalog = ShapeCatalog::with_seed(3);
        for _ in 0..50 {
            let shape = catalog.random_shape();
            assert_eq!(shape, shape.kind().shape());
        }
    }
}
