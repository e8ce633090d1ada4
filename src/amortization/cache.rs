//! Memoisation of schedule construction
//!
//! Schedules are pure functions of (principal, rate, term, method), so a
//! built schedule can be handed out again for the same tuple. The key holds
//! every input; two rates that differ in the last bit are distinct entries.

use std::collections::HashMap;
use std::sync::Arc;

use super::engine::{AmortizationMethod, DEFAULT_ROUNDING_DECIMALS};
use super::schedule::AmortizationSchedule;

/// Full input tuple identifying a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleKey {
    principal_bits: u64,
    rate_bits: u64,
    term: u32,
    method: AmortizationMethod,
    rounding_decimals: u32,
}

impl ScheduleKey {
    pub fn new(
        principal: f64,
        periodic_rate: f64,
        term: u32,
        method: AmortizationMethod,
        rounding_decimals: u32,
    ) -> Self {
        Self {
            principal_bits: principal.to_bits(),
            rate_bits: periodic_rate.to_bits(),
            term,
            method,
            rounding_decimals,
        }
    }
}

/// Cache of built schedules
#[derive(Debug)]
pub struct ScheduleCache {
    entries: HashMap<ScheduleKey, Arc<AmortizationSchedule>>,

    /// Balance rounding used for every schedule this cache builds
    rounding_decimals: u32,

    /// Statistics
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::with_rounding(DEFAULT_ROUNDING_DECIMALS)
    }
}

impl ScheduleCache {
    /// Create a new cache with cent rounding
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rounding(rounding_decimals: u32) -> Self {
        Self {
            entries: HashMap::new(),
            rounding_decimals,
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    /// Return the schedule for the tuple, building it on first request
    pub fn get_or_build(
        &mut self,
        principal: f64,
        periodic_rate: f64,
        term: u32,
        method: AmortizationMethod,
    ) -> Arc<AmortizationSchedule> {
        let key = ScheduleKey::new(principal, periodic_rate, term, method, self.rounding_decimals);

        if let Some(schedule) = self.entries.get(&key) {
            self.cache_hits += 1;
            return Arc::clone(schedule);
        }

        self.cache_misses += 1;
        let schedule = Arc::new(
            method
                .builder(self.rounding_decimals)
                .build(principal, periodic_rate, term),
        );
        self.entries.insert(key, Arc::clone(&schedule));
        schedule
    }

    /// Clear all cached data
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::build_schedule;

    #[test]
    fn test_repeat_request_hits() {
        let mut cache = ScheduleCache::new();

        let first = cache.get_or_build(100_000.0, 0.02, 12, AmortizationMethod::French);
        let second = cache.get_or_build(100_000.0, 0.02, 12, AmortizationMethod::French);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.cache_hits, 1);
        assert_eq!(cache.cache_misses, 1);
        assert_eq!(cache.hit_rate(), 0.5);
        assert_eq!(*first, build_schedule(100_000.0, 0.02, 12, AmortizationMethod::French));
    }

    #[test]
    fn test_every_input_is_part_of_the_key() {
        let mut cache = ScheduleCache::new();

        cache.get_or_build(100_000.0, 0.02, 12, AmortizationMethod::French);
        cache.get_or_build(100_000.0, 0.02, 12, AmortizationMethod::German);
        cache.get_or_build(100_000.0, 0.02, 24, AmortizationMethod::French);
        cache.get_or_build(100_000.0, 0.021, 12, AmortizationMethod::French);
        cache.get_or_build(90_000.0, 0.02, 12, AmortizationMethod::French);

        assert_eq!(cache.len(), 5);
        assert_eq!(cache.cache_hits, 0);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hit_rate(), 0.0);
    }
}
