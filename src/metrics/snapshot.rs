/// Point-in-time copy of a manager's counters plus size gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManagerMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evicted_entries: u64,
    pub observer_calls: u64, // total observer invocations across all evictions

    pub delete_calls: u64,
    pub delete_hits: u64,
    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl ManagerMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first `get`.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_handles_zero_calls() {
        let snap = ManagerMetricsSnapshot::default();
        assert_eq!(snap.hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_ratio() {
        let snap = ManagerMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            ..Default::default()
        };
        assert!((snap.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
