//! Height selection for new nodes.
//!
//! Every node is on level 0; each further level is reached with probability
//! `p` of reaching the one below, truncated at the list's `MAX_HEIGHT`. With
//! `p = 0.5` about half the nodes on one level appear on the next, which
//! keeps expected search cost logarithmic.

/// Chooses how many levels a freshly inserted node spans.
pub trait LevelGenerator {
    /// Returns a height in `1..=max_height`.
    fn random_height(&mut self, max_height: usize) -> usize;

    /// An independent generator for a copied list.
    fn reseeded(&self) -> Self
    where
        Self: Sized;
}

/// Geometric heights drawn from a per-list `fastrand` generator.
#[derive(Debug, Clone)]
pub struct Geometric {
    rng: fastrand::Rng,
    p: f64,
}

impl Geometric {
    pub const DEFAULT_PROBABILITY: f64 = 0.5;

    /// Seeded from the OS, promotion probability 0.5.
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new(), Self::DEFAULT_PROBABILITY)
    }

    /// Deterministic heights for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed), Self::DEFAULT_PROBABILITY)
    }

    /// # Panics
    ///
    /// Panics unless `0 < p < 1`.
    pub fn with_probability(p: f64) -> Self {
        assert!(p > 0.0 && p < 1.0, "promotion probability must be in (0, 1), got {p}");
        Self::from_rng(fastrand::Rng::new(), p)
    }

    fn from_rng(rng: fastrand::Rng, p: f64) -> Self {
        Self { rng, p }
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl Default for Geometric {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelGenerator for Geometric {
    #[inline(always)]
    fn random_height(&mut self, max_height: usize) -> usize {
        let mut height = 1;
        while height < max_height && self.rng.f64() < self.p {
            height += 1;
        }
        height
    }

    fn reseeded(&self) -> Self {
        Self::from_rng(fastrand::Rng::new(), self.p)
    }
}

/// Every node gets the same height. `Constant(1)` turns the list into a
/// plain sorted linked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub usize);

impl LevelGenerator for Constant {
    fn random_height(&mut self, max_height: usize) -> usize {
        self.0.clamp(1, max_height.max(1))
    }

    fn reseeded(&self) -> Self {
        *self
    }
}

/// Replays a fixed list of heights, wrapping around at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    heights: Vec<usize>,
    next: usize,
}

impl Sequence {
    /// An empty `heights` behaves like `Constant(1)`.
    pub fn new(heights: impl Into<Vec<usize>>) -> Self {
        Self {
            heights: heights.into(),
            next: 0,
        }
    }
}

impl LevelGenerator for Sequence {
    fn random_height(&mut self, max_height: usize) -> usize {
        if self.heights.is_empty() {
            return 1;
        }
        let height = self.heights[self.next % self.heights.len()];
        self.next = (self.next + 1) % self.heights.len();
        height.clamp(1, max_height.max(1))
    }

    /// Restarts from the first height, unlike [`Geometric::reseeded`],
    /// which draws an unrelated stream.
    fn reseeded(&self) -> Self {
        Self::new(self.heights.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometric_stays_in_range() {
        let mut levels = Geometric::with_seed(7);
        for _ in 0..10_000 {
            let h = levels.random_height(6);
            assert!((1..=6).contains(&h));
        }
    }

    #[test]
    fn test_geometric_distribution() {
        let mut levels = Geometric::with_seed(42);
        let mut counts = [0usize; 7];
        let draws = 100_000;
        for _ in 0..draws {
            counts[levels.random_height(6)] += 1;
        }
        // Roughly half of all nodes stop at height 1, a quarter at height 2.
        let ones = counts[1] as f64 / draws as f64;
        let twos = counts[2] as f64 / draws as f64;
        assert!((ones - 0.5).abs() < 0.02, "height 1 share {ones}");
        assert!((twos - 0.25).abs() < 0.02, "height 2 share {twos}");
        // The cap absorbs the tail: P(6) = P(5) = 1/32.
        assert!(counts[6] > 0);
    }

    #[test]
    fn test_geometric_same_seed_same_heights() {
        let mut a = Geometric::with_seed(99);
        let mut b = Geometric::with_seed(99);
        for _ in 0..100 {
            assert_eq!(a.random_height(16), b.random_height(16));
        }
    }

    #[test]
    fn test_reseeded_keeps_probability() {
        let levels = Geometric::with_probability(0.25);
        assert_eq!(levels.reseeded().probability(), 0.25);
    }

    #[test]
    #[should_panic(expected = "promotion probability")]
    fn test_invalid_probability() {
        let _ = Geometric::with_probability(1.0);
    }

    #[test]
    fn test_height_one_cap() {
        let mut levels = Geometric::with_seed(1);
        assert!((0..100).all(|_| levels.random_height(1) == 1));
    }

    #[test]
    fn test_constant_clamps() {
        assert_eq!(Constant(0).random_height(6), 1);
        assert_eq!(Constant(3).random_height(6), 3);
        assert_eq!(Constant(9).random_height(6), 6);
    }

    #[test]
    fn test_sequence_wraps() {
        let mut levels = Sequence::new([1, 3, 8]);
        let drawn: Vec<_> = (0..5).map(|_| levels.random_height(6)).collect();
        assert_eq!(drawn, vec![1, 3, 6, 1, 3]);

        let mut fresh = levels.reseeded();
        assert_eq!(fresh.random_height(6), 1);
    }
}
