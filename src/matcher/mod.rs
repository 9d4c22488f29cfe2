//! Address-to-coordinate matching engine
//!
//! A run tests every (record, address) pair of the cross product, projects the
//! location of each record that contains a valid address, and collects the
//! projected points into a [`CoordinateSet`].
//!
//! All three strategies go through the same steps:
//!
//! ```text
//! partition ──► backend runs scan() per partition ──► merge after join
//!   │              sequential │ scoped threads │ pool + channel
//!   └─ records split (partitioned) or addresses split (pool)
//! ```
//!
//! Only the backend differs, so every strategy produces the same set.
//!
//! # Example
//!
//! ```
//! use geoipmap::{AddressList, GeoStore, MapGeometry, Matcher, Strategy};
//!
//! let store = GeoStore::from_reader("10.0.0.0/8,40.0,-3.0\n".as_bytes())?;
//! let addresses: AddressList = ["10.1.2.3", "garbage", "192.0.2.1"].into_iter().collect();
//! let geometry = MapGeometry::new(2058, 1746)?;
//!
//! let coordinates = Matcher::new(&store, &addresses, geometry)
//!     .strategy(Strategy::Pool { workers: 2 })
//!     .run()?;
//! assert_eq!(coordinates.len(), 1);
//! # Ok::<(), geoipmap::GeoIpMapError>(())
//! ```

mod backend;
mod stats;
mod strategy;

pub use stats::MatchStats;
pub use strategy::{partition_ranges, Strategy, MAX_CONCURRENCY};

use crate::coords::{CoordinateSet, PixelCoordinate};
use crate::error::Result;
use crate::geometry::MapGeometry;
use crate::network::parse_address;
use crate::progress::{NoOpObserver, ProgressObserver};
use crate::projection::project;
use crate::store::{AddressList, GeoStore};
use backend::{Backend, PoolBackend, ScopedThreadBackend, SequentialBackend};
use std::net::Ipv4Addr;
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One slice of the record × address cross product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Partition index, 0-based
    pub index: usize,
    /// Record index range scanned
    pub records: Range<usize>,
    /// Address index range scanned
    pub addresses: Range<usize>,
}

/// A partition's private result, merged by the coordinator
pub(crate) struct PartialResult {
    pub(crate) coordinates: CoordinateSet,
    pub(crate) stats: MatchStats,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// Deduplicated projected coordinates
    pub coordinates: CoordinateSet,
    /// Aggregated counters
    pub stats: MatchStats,
    /// Strategy that actually ran after degrading degenerate counts
    pub strategy: Strategy,
    /// Wall time of the run, loading excluded
    pub elapsed: Duration,
}

/// Matches an address list against a network database
///
/// The database and address list are borrowed for the matcher's lifetime and
/// never modified. Each call to [`Matcher::run`] is a fresh, stateless pass.
pub struct Matcher<'a> {
    store: &'a GeoStore,
    addresses: &'a AddressList,
    geometry: MapGeometry,
    strategy: Strategy,
    observer: Arc<dyn ProgressObserver>,
}

impl<'a> Matcher<'a> {
    /// Create a sequential matcher with no progress reporting
    pub fn new(store: &'a GeoStore, addresses: &'a AddressList, geometry: MapGeometry) -> Self {
        Self {
            store,
            addresses,
            geometry,
            strategy: Strategy::Sequential,
            observer: Arc::new(NoOpObserver),
        }
    }

    /// Select the execution strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Attach a progress observer
    pub fn observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run and return only the coordinate set
    pub fn run(&self) -> Result<CoordinateSet> {
        self.run_with_stats().map(|report| report.coordinates)
    }

    /// Run and return the coordinate set with statistics
    ///
    /// # Errors
    ///
    /// Returns [`crate::GeoIpMapError::Config`] if the split/worker count is
    /// above [`MAX_CONCURRENCY`], and [`crate::GeoIpMapError::Worker`] if a
    /// worker thread can't be started or panics. No partial result is
    /// returned in either case.
    pub fn run_with_stats(&self) -> Result<MatchReport> {
        let start = Instant::now();
        let strategy = self.strategy.validate()?.effective();
        let partitions = self.partitions(strategy);
        self.observer.run_started(&strategy, partitions.len());

        let scan = |partition: &Partition| {
            let result = self.scan_partition(partition);
            self.observer.partition_finished(partition, &result.stats);
            result
        };

        let results = match strategy {
            Strategy::Sequential => SequentialBackend.execute(&partitions, scan)?,
            Strategy::Partitioned { .. } => ScopedThreadBackend.execute(&partitions, scan)?,
            Strategy::Pool { workers } => PoolBackend { workers }.execute(&partitions, scan)?,
        };

        let mut coordinates = CoordinateSet::new();
        let mut stats = MatchStats::default();
        for result in results {
            stats.add(&result.stats);
            coordinates.merge(result.coordinates);
        }
        stats.records_scanned = self.store.len();
        stats.addresses_scanned = self.addresses.len();
        stats.invalid_addresses = self
            .addresses
            .entries()
            .iter()
            .filter(|entry| parse_address(entry).is_none())
            .count();
        stats.distinct_coordinates = coordinates.len();

        let elapsed = start.elapsed();
        self.observer.run_finished(&stats, elapsed);

        Ok(MatchReport {
            coordinates,
            stats,
            strategy,
            elapsed,
        })
    }

    /// Partition layout for an already-effective strategy
    fn partitions(&self, strategy: Strategy) -> Vec<Partition> {
        let all_records = 0..self.store.len();
        let all_addresses = 0..self.addresses.len();

        match strategy {
            Strategy::Sequential => vec![Partition {
                index: 0,
                records: all_records,
                addresses: all_addresses,
            }],
            Strategy::Partitioned { splits } => partition_ranges(self.store.len(), splits)
                .into_iter()
                .enumerate()
                .map(|(index, records)| Partition {
                    index,
                    records,
                    addresses: all_addresses.clone(),
                })
                .collect(),
            Strategy::Pool { workers } => partition_ranges(self.addresses.len(), workers)
                .into_iter()
                .enumerate()
                .map(|(index, addresses)| Partition {
                    index,
                    records: all_records.clone(),
                    addresses,
                })
                .collect(),
        }
    }

    /// Scan one partition into a private coordinate set
    fn scan_partition(&self, partition: &Partition) -> PartialResult {
        let records = self.store.slice(partition.records.clone());
        let entries = self.addresses.slice(partition.addresses.clone());

        // Invalid entries drop out here and are never tested
        let addresses: Vec<Ipv4Addr> = entries
            .iter()
            .filter_map(|entry| parse_address(entry))
            .collect();

        let mut coordinates = CoordinateSet::new();
        let mut matching_pairs = 0;

        for record in records {
            // Projected at most once per record
            let mut projected: Option<PixelCoordinate> = None;
            for &addr in &addresses {
                if record.network.contains(addr) {
                    matching_pairs += 1;
                    let point = *projected
                        .get_or_insert_with(|| project(record.lat, record.lon, &self.geometry));
                    coordinates.insert(point);
                }
            }
        }

        PartialResult {
            stats: MatchStats {
                records_scanned: records.len(),
                addresses_scanned: entries.len(),
                invalid_addresses: entries.len() - addresses.len(),
                pairs_tested: records.len() * addresses.len(),
                matching_pairs,
                distinct_coordinates: coordinates.len(),
                partitions: 1,
            },
            coordinates,
        }
    }
}
