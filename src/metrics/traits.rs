//! Recorder and provider traits for cache metrics.

/// Counters shared by every cache front end.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Manager-specific counters (explicit deletes and observer fan-out).
pub trait ManagerMetricsRecorder: CoreMetricsRecorder {
    fn record_delete_hit(&mut self);
    fn record_delete_miss(&mut self);
    fn record_observer_calls(&mut self, count: usize);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
