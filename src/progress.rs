//! Run progress reporting
//!
//! The matcher never prints. Callers that want feedback inject a
//! [`ProgressObserver`]; every method has an empty default so implementations
//! only override the events they care about. Observers are called from worker
//! threads and must be `Send + Sync`.
//!
//! - [`NoOpObserver`]: discards everything (the default)
//! - [`TracingObserver`]: forwards events to the `tracing` crate

use crate::matcher::{MatchStats, Partition, Strategy};
use std::time::Duration;

/// Receives events during a matcher run
pub trait ProgressObserver: Send + Sync {
    /// The run is about to start with the given effective strategy
    fn run_started(&self, _strategy: &Strategy, _partitions: usize) {}

    /// One partition finished scanning; `stats` covers that partition only
    fn partition_finished(&self, _partition: &Partition, _stats: &MatchStats) {}

    /// All partitions were merged
    fn run_finished(&self, _stats: &MatchStats, _elapsed: Duration) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl ProgressObserver for NoOpObserver {}

/// Observer that logs events through `tracing`
///
/// Start/finish are logged at info, per-partition progress at debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn run_started(&self, strategy: &Strategy, partitions: usize) {
        tracing::info!(%strategy, partitions, "gathering coordinates");
    }

    fn partition_finished(&self, partition: &Partition, stats: &MatchStats) {
        tracing::debug!(
            partition = partition.index,
            records = ?partition.records,
            addresses = ?partition.addresses,
            pairs = stats.pairs_tested,
            matches = stats.matching_pairs,
            "partition finished"
        );
    }

    fn run_finished(&self, stats: &MatchStats, elapsed: Duration) {
        tracing::info!(
            coordinates = stats.distinct_coordinates,
            matches = stats.matching_pairs,
            invalid = stats.invalid_addresses,
            elapsed_ms = elapsed.as_millis() as u64,
            "coordinates gathered"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_observers_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoOpObserver>();
        assert_send_sync::<TracingObserver>();
    }

    #[test]
    fn test_observer_as_trait_object() {
        let observer: Arc<dyn ProgressObserver> = Arc::new(TracingObserver);
        let partition = Partition {
            index: 0,
            records: 0..10,
            addresses: 0..5,
        };
        observer.run_started(&Strategy::Sequential, 1);
        observer.partition_finished(&partition, &MatchStats::default());
        observer.run_finished(&MatchStats::default(), Duration::from_millis(3));
    }
}
