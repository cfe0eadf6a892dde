//! Range Sum Service Module
//!
//! Memoized inclusive range-sum queries over a mutable array, backed by the
//! bounded LRU cache. Updates invalidate every cached range that spans the
//! mutated index, so a hit can never observe stale data.

use tracing::debug;

use crate::cache::{BoundedCache, CacheStats};
use crate::error::{Error, Result};

/// Cache key for an inclusive `(start, end)` range.
type RangeKey = (usize, usize);

// == Range Sum Service ==
/// Answers range-sum queries against an owned array, memoizing results.
///
/// Reads consult the cache first and fall back to recomputation on a miss.
/// Writes go through [`update`](Self::update), which mutates the array and
/// sweeps every cached range overlapping the written index.
pub struct RangeSumService {
    /// Authoritative data
    values: Vec<i64>,
    /// Memoized sums keyed by inclusive range bounds
    cache: BoundedCache<RangeKey, i64>,
}

impl RangeSumService {
    // == Constructor ==
    /// Creates a service over `values` with the given cache capacity.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCapacity`] when `cache_capacity` is zero.
    pub fn new(values: Vec<i64>, cache_capacity: usize) -> Result<Self> {
        Ok(Self {
            cache: BoundedCache::new(cache_capacity)?,
            values,
        })
    }

    // == Sum ==
    /// Returns the sum of `values[start..=end]`, memoized.
    ///
    /// # Errors
    /// [`Error::InvalidRange`] when `start > end`;
    /// [`Error::IndexOutOfBounds`] when `end` is past the array.
    pub fn sum(&mut self, start: usize, end: usize) -> Result<i64> {
        self.check_range(start, end)?;

        let key = (start, end);
        if let Some(&cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let sum = self.values[start..=end].iter().sum();
        self.cache.put(key, sum);
        Ok(sum)
    }

    // == Sum Direct ==
    /// Returns the sum of `values[start..=end]` without touching the cache.
    ///
    /// Baseline used to check that the cached path computes identical
    /// results.
    pub fn sum_direct(&self, start: usize, end: usize) -> Result<i64> {
        self.check_range(start, end)?;
        Ok(self.values[start..=end].iter().sum())
    }

    // == Update ==
    /// Writes `value` at `index` and invalidates affected cached sums.
    ///
    /// A cached range `(l, r)` is affected when `l <= index <= r`.
    pub fn update(&mut self, index: usize, value: i64) -> Result<()> {
        if index >= self.values.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.values.len(),
            });
        }

        self.values[index] = value;
        let removed = self
            .cache
            .invalidate(|&(l, r)| l <= index && index <= r);

        debug!(index, removed, "array update invalidated cached sums");
        Ok(())
    }

    // == Get ==
    /// Returns the element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }

    // == Length ==
    /// Returns the array length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the array is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // == Internal ==
    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        if end >= self.values.len() {
            return Err(Error::IndexOutOfBounds {
                index: end,
                len: self.values.len(),
            });
        }
        Ok(())
    }
}
