//! Geometric level generator.

use rand::prelude::*;
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// The default number of levels a generator allows.
///
/// With the default branching factor this is enough for roughly `4^16`
/// elements before searches degrade towards linear scans.
pub const DEFAULT_TOTAL: usize = 16;

/// The default branching factor.
///
/// A node present on some level has a 1-in-4 chance of also being present on
/// the level above it.
pub const DEFAULT_BRANCHING: u32 = 4;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The branching factor must be at least 2.
    #[error("branching factor must be at least 2.")]
    InvalidBranching,
}

/// A level generator using a (truncated) geometric distribution.
///
/// A new node always occupies level 0. While a uniform draw in
/// `[0, branching)` comes up zero, the node climbs one further level, so the
/// probability of reaching level `n` is `branching⁻ⁿ`. The climb stops at
/// `total - 1` regardless of the draws, which bounds the memory a streak of
/// zeroes can claim; below that cap the distribution is exactly geometric.
#[derive(Debug)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The reciprocal probability of climbing one level.
    branching: u32,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels
    /// and the given branching factor.
    ///
    /// # Errors
    ///
    /// `total` must be greater or equal to 1, and `branching` greater or
    /// equal to 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::Geometric;
    ///
    /// let generator = Geometric::new(16, 4).unwrap();
    /// ```
    #[inline]
    pub fn new(total: usize, branching: u32) -> Result<Self, GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if branching < 2 {
            return Err(GeometricError::InvalidBranching);
        }
        Ok(Geometric {
            total,
            branching,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }

    /// Create a new geometric level generator seeded with `seed`.
    ///
    /// Two generators built with the same parameters and seed produce the
    /// same sequence of levels, which makes list layouts reproducible in
    /// tests.
    ///
    /// # Errors
    ///
    /// `total` must be greater or equal to 1, and `branching` greater or
    /// equal to 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::{Geometric, SkipList};
    ///
    /// let generator = Geometric::with_seed(16, 4, 92).unwrap();
    /// let mut list = SkipList::with_level_generator(generator);
    /// list.insert(1);
    /// ```
    #[inline]
    pub fn with_seed(total: usize, branching: u32, seed: u64) -> Result<Self, GeometricError> {
        let mut generator = Self::new(total, branching)?;
        generator.rng = SmallRng::seed_from_u64(seed);
        Ok(generator)
    }
}

/// The default generator: 16 levels with a branching factor of 4, seeded
/// from the thread-local generator.
impl Default for Geometric {
    #[inline]
    fn default() -> Self {
        Geometric {
            total: DEFAULT_TOTAL,
            branching: DEFAULT_BRANCHING,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < self.total && self.rng.random_range(0..self.branching) == 0 {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, GeometricError};
    use crate::level_generator::LevelGenerator;

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0, 4).err(), Some(GeometricError::ZeroMax));
    }

    #[test]
    fn invalid_branching() {
        assert_eq!(
            Geometric::new(16, 0).err(),
            Some(GeometricError::InvalidBranching)
        );
        assert_eq!(
            Geometric::new(16, 1).err(),
            Some(GeometricError::InvalidBranching)
        );
    }

    #[rstest]
    fn new(#[values(1, 2, 16, 1024)] n: usize, #[values(2, 4, 16)] branching: u32) -> Result<()> {
        let mut generator = Geometric::new(n, branching)?;
        assert_eq!(generator.total(), n);
        for _ in 0..100_000 {
            let level = generator.level();
            assert!((0..n).contains(&level));
        }
        // Make sure that we can produce at least one level-0 node.
        let mut found = false;
        for _ in 0..1_000_000 {
            if generator.level() == 0 {
                found = true;
                break;
            }
        }
        if !found {
            bail!("Failed to generate a level-0 node.");
        }
        Ok(())
    }

    #[test]
    fn single_level_never_climbs() -> Result<()> {
        let mut generator = Geometric::new(1, 4)?;
        for _ in 0..1_000 {
            assert_eq!(generator.level(), 0);
        }
        Ok(())
    }

    #[test]
    fn seeded_generators_agree() -> Result<()> {
        let mut a = Geometric::with_seed(16, 4, 7)?;
        let mut b = Geometric::with_seed(16, 4, 7)?;
        for _ in 0..10_000 {
            assert_eq!(a.level(), b.level());
        }
        Ok(())
    }

    #[test]
    fn climb_frequency_matches_branching() -> Result<()> {
        let mut generator = Geometric::with_seed(16, 4, 92)?;
        let draws = 100_000;
        let climbed = (0..draws).filter(|_| generator.level() > 0).count();
        // P(level > 0) is exactly 1/4; the sample mean has a standard
        // deviation of ~0.0014 over 100k draws.
        #[expect(clippy::float_arithmetic, reason = "Comparing sample frequency")]
        let fraction = climbed as f64 / f64::from(draws);
        assert!(
            (0.23..0.27).contains(&fraction),
            "fraction of climbs was {fraction}"
        );
        Ok(())
    }
}
