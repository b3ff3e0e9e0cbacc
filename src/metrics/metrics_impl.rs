use crate::metrics::traits::{CoreMetricsRecorder, ManagerMetricsRecorder};

#[derive(Debug, Default)]
pub struct ManagerMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evicted_entries: u64,
    pub observer_calls: u64,
    pub delete_calls: u64,
    pub delete_hits: u64,
    pub clear_calls: u64,
}

impl CoreMetricsRecorder for ManagerMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl ManagerMetricsRecorder for ManagerMetrics {
    fn record_delete_hit(&mut self) {
        self.delete_calls += 1;
        self.delete_hits += 1;
    }

    fn record_delete_miss(&mut self) {
        self.delete_calls += 1;
    }

    fn record_observer_calls(&mut self, count: usize) {
        self.observer_calls += count as u64;
    }
}
