//! Concurrency backends for the partition/scan/merge algorithm
//!
//! A backend receives the partition list and the scan function and returns
//! one [`PartialResult`] per partition. It only decides where each scan runs;
//! merging happens in the matcher after the backend has returned, so no
//! backend ever shares a mutable result container between threads.

use super::{PartialResult, Partition};
use crate::error::{GeoIpMapError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::thread;

pub(crate) trait Backend {
    /// Run `scan` once per partition and return every result
    ///
    /// Blocks until all partitions are done.
    fn execute<F>(&self, partitions: &[Partition], scan: F) -> Result<Vec<PartialResult>>
    where
        F: Fn(&Partition) -> PartialResult + Sync;
}

/// Runs every partition on the calling thread, in order
pub(crate) struct SequentialBackend;

impl Backend for SequentialBackend {
    fn execute<F>(&self, partitions: &[Partition], scan: F) -> Result<Vec<PartialResult>>
    where
        F: Fn(&Partition) -> PartialResult + Sync,
    {
        Ok(partitions.iter().map(scan).collect())
    }
}

/// One scoped thread per partition, joined before returning
///
/// Each thread hands its private result back through its join handle.
pub(crate) struct ScopedThreadBackend;

impl Backend for ScopedThreadBackend {
    fn execute<F>(&self, partitions: &[Partition], scan: F) -> Result<Vec<PartialResult>>
    where
        F: Fn(&Partition) -> PartialResult + Sync,
    {
        let scan = &scan;
        thread::scope(|s| {
            let mut handles = Vec::with_capacity(partitions.len());
            let mut spawn_error = None;
            for partition in partitions {
                let spawned = thread::Builder::new()
                    .name(format!("geoipmap-split-{}", partition.index))
                    .spawn_scoped(s, move || scan(partition));
                match spawned {
                    Ok(handle) => handles.push((partition.index, handle)),
                    Err(e) => {
                        spawn_error = Some(GeoIpMapError::Worker(format!(
                            "failed to spawn thread for partition {}: {}",
                            partition.index, e
                        )));
                        break;
                    }
                }
            }

            join_all(handles, spawn_error)
        })
    }
}

/// Join every handle before looking at any result
///
/// Neither a panic nor a failed spawn leaves a thread unjoined, so the
/// enclosing scope never re-panics. A spawn error wins over panics.
fn join_all<'scope, T>(
    handles: Vec<(usize, thread::ScopedJoinHandle<'scope, T>)>,
    spawn_error: Option<GeoIpMapError>,
) -> Result<Vec<T>> {
    let joined: Vec<_> = handles
        .into_iter()
        .map(|(index, handle)| {
            handle
                .join()
                .map_err(|_| GeoIpMapError::Worker(format!("partition {} panicked", index)))
        })
        .collect();
    if let Some(err) = spawn_error {
        return Err(err);
    }
    joined.into_iter().collect()
}

/// A dedicated pool of `workers` threads
///
/// Workers share nothing mutable with the coordinator. Each job owns its
/// result and sends it back over a channel; the coordinator collects exactly
/// one message per partition after the pool scope has drained.
pub(crate) struct PoolBackend {
    pub(crate) workers: usize,
}

impl Backend for PoolBackend {
    fn execute<F>(&self, partitions: &[Partition], scan: F) -> Result<Vec<PartialResult>>
    where
        F: Fn(&Partition) -> PartialResult + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("geoipmap-pool-{}", i))
            .build()
            .map_err(|e| GeoIpMapError::Worker(format!("failed to build worker pool: {}", e)))?;

        let (sender, receiver) = crossbeam_channel::unbounded::<(usize, PartialResult)>();
        let scan = &scan;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.scope(|s| {
                for partition in partitions {
                    let sender = sender.clone();
                    s.spawn(move |_| {
                        let result = scan(partition);
                        // The receiver outlives the scope, so this cannot fail
                        let _ = sender.send((partition.index, result));
                    });
                }
            })
        }));
        drop(sender);

        if outcome.is_err() {
            return Err(GeoIpMapError::Worker("a pool worker panicked".to_string()));
        }

        let mut results: Vec<(usize, PartialResult)> = receiver.iter().collect();
        if results.len() != partitions.len() {
            return Err(GeoIpMapError::Worker(format!(
                "expected {} partition results, received {}",
                partitions.len(),
                results.len()
            )));
        }
        results.sort_by_key(|(index, _)| *index);

        Ok(results.into_iter().map(|(_, result)| result).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CoordinateSet, PixelCoordinate};
    use crate::matcher::MatchStats;

    fn partitions(count: usize) -> Vec<Partition> {
        (0..count)
            .map(|index| Partition {
                index,
                records: index..index + 1,
                addresses: 0..1,
            })
            .collect()
    }

    fn scan_index(partition: &Partition) -> PartialResult {
        let mut coordinates = CoordinateSet::new();
        coordinates.insert(PixelCoordinate::new(partition.index as f64, 0.0));
        PartialResult {
            coordinates,
            stats: MatchStats {
                partitions: 1,
                ..Default::default()
            },
        }
    }

    fn indices(results: &[PartialResult]) -> Vec<f64> {
        results
            .iter()
            .flat_map(|r| r.coordinates.iter().map(|c| c.x))
            .collect()
    }

    #[test]
    fn test_every_backend_returns_one_result_per_partition() {
        let parts = partitions(6);
        let expected: Vec<f64> = (0..6).map(|i| i as f64).collect();

        let seq = SequentialBackend.execute(&parts, scan_index).unwrap();
        let threads = ScopedThreadBackend.execute(&parts, scan_index).unwrap();
        let pool = PoolBackend { workers: 3 }
            .execute(&parts, scan_index)
            .unwrap();

        assert_eq!(indices(&seq), expected);
        assert_eq!(indices(&threads), expected);
        assert_eq!(indices(&pool), expected);
    }

    #[test]
    fn test_thread_panic_becomes_error() {
        let parts = partitions(3);
        let result = ScopedThreadBackend.execute(&parts, |p: &Partition| {
            if p.index == 1 {
                panic!("boom");
            }
            scan_index(p)
        });
        assert!(matches!(result, Err(GeoIpMapError::Worker(_))));
    }

    #[test]
    fn test_spawn_error_joins_started_threads() {
        let result: Result<Vec<u32>> = thread::scope(|s| {
            let handles = vec![
                (0, s.spawn(|| 7)),
                (1, s.spawn(|| -> u32 { panic!("boom") })),
            ];
            let spawn_error = GeoIpMapError::Worker("failed to spawn thread for partition 2".into());
            join_all(handles, Some(spawn_error))
        });

        match result {
            Err(GeoIpMapError::Worker(msg)) => assert!(msg.contains("partition 2")),
            other => panic!("expected spawn error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_pool_panic_becomes_error() {
        let parts = partitions(4);
        let result = PoolBackend { workers: 2 }.execute(&parts, |p: &Partition| {
            if p.index == 2 {
                panic!("boom");
            }
            scan_index(p)
        });
        assert!(matches!(result, Err(GeoIpMapError::Worker(_))));
    }
}
