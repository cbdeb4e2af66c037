//! Parallel processing profile shared by the cipher modes.
//!
//! A profile tracks the fork-join degree and the input length at which a
//! transform switches from the serial to the parallel path. Degrees follow
//! the mode contract: even, at least 2, and no greater than the processor
//! count; 1 disables parallel processing and 0 selects automatically.

use crate::error::{Error, Result};

/// Per-lane working set target, sized to a typical L1 data cache.
const LANE_TARGET: usize = 32 * 1024;

/// Parallel configuration for a mode instance.
#[derive(Clone, Debug)]
pub struct ParallelProfile {
    origin: &'static str,
    unit_size: usize,
    degree: usize,
    block_size: usize,
    is_parallel: bool,
}

impl ParallelProfile {
    /// Create a profile for a component whose parallel work splits into
    /// `unit_size`-byte units (the cipher block width).
    pub fn new(origin: &'static str, unit_size: usize) -> Self {
        let degree = Self::auto_degree();
        let mut profile = ParallelProfile {
            origin,
            unit_size,
            degree,
            block_size: 0,
            is_parallel: degree >= 2,
        };
        profile.block_size = profile.default_block_size();
        profile
    }

    /// The number of processors available to the fork-join pool.
    pub fn processor_count() -> usize {
        rayon::current_num_threads()
    }

    fn auto_degree() -> usize {
        let count = Self::processor_count();
        if count < 2 {
            1
        } else {
            count - (count % 2)
        }
    }

    fn default_block_size(&self) -> usize {
        if self.degree < 2 {
            return 0;
        }
        let min = self.parallel_min_size();
        let target = (self.degree * LANE_TARGET).max(min);
        target - (target % min)
    }

    /// True when transforms of at least [`ParallelProfile::parallel_block_size`]
    /// bytes will run on the fork-join pool.
    pub fn is_parallel(&self) -> bool {
        self.is_parallel && self.degree >= 2
    }

    /// Enable or disable the parallel path without changing the degree.
    pub fn set_parallel(&mut self, enabled: bool) {
        self.is_parallel = enabled && self.degree >= 2;
    }

    /// The fork-join degree used by parallel transforms.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The smallest input that can be split across the current degree:
    /// `degree * unit_size` bytes.
    pub fn parallel_min_size(&self) -> usize {
        self.degree.max(1) * self.unit_size
    }

    /// The input length that triggers parallel processing. Always a multiple
    /// of [`ParallelProfile::parallel_min_size`].
    pub fn parallel_block_size(&self) -> usize {
        self.block_size
    }

    /// Set the parallel trigger length. The value is rounded down to a
    /// multiple of the parallel minimum size, with the minimum as the floor.
    pub fn set_parallel_block_size(&mut self, size: usize) {
        let min = self.parallel_min_size();
        self.block_size = (size.max(min) / min) * min;
    }

    /// Set the maximum number of fork-join lanes.
    ///
    /// 0 selects the degree automatically from the processor count; 1 turns
    /// the parallel path off. Any other degree must be an even number no
    /// greater than the processor count, otherwise
    /// [`Error::InvalidDegree`] is returned.
    pub fn set_max_degree(&mut self, degree: usize) -> Result<()> {
        match degree {
            0 => {
                self.degree = Self::auto_degree();
                self.is_parallel = self.degree >= 2;
            }
            1 => {
                self.degree = 1;
                self.is_parallel = false;
            }
            d if d % 2 != 0 || d > Self::processor_count() => {
                return Err(Error::InvalidDegree {
                    origin: self.origin,
                    degree: d,
                });
            }
            d => {
                self.degree = d;
                self.is_parallel = true;
            }
        }
        self.block_size = self.default_block_size();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_validation() {
        let mut profile = ParallelProfile::new("CFB", 16);

        assert!(matches!(
            profile.set_max_degree(3),
            Err(Error::InvalidDegree { origin: "CFB", degree: 3 })
        ));
        assert!(matches!(
            profile.set_max_degree(ParallelProfile::processor_count() + 2),
            Err(Error::InvalidDegree { .. })
        ));

        profile.set_max_degree(1).unwrap();
        assert!(!profile.is_parallel());

        profile.set_max_degree(0).unwrap();
        if ParallelProfile::processor_count() >= 2 {
            assert!(profile.is_parallel());
            assert_eq!(profile.degree() % 2, 0);
        }
    }

    #[test]
    fn block_size_is_a_multiple_of_the_minimum() {
        let mut profile = ParallelProfile::new("CBC", 16);
        if profile.set_max_degree(2).is_err() {
            return;
        }

        assert_eq!(profile.parallel_min_size(), 32);
        assert_eq!(profile.parallel_block_size() % 32, 0);

        profile.set_parallel_block_size(2048);
        assert_eq!(profile.parallel_block_size(), 2048);

        profile.set_parallel_block_size(2049);
        assert_eq!(profile.parallel_block_size(), 2048);

        profile.set_parallel_block_size(1);
        assert_eq!(profile.parallel_block_size(), 32);
    }
}
