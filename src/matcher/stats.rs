use serde::Serialize;

/// Counters for a matcher run or a single partition of one
///
/// Per-partition values are summed into the run total after every
/// partition has finished. All counters except `partitions` come out the
/// same whichever strategy ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// Database records in the scanned ranges
    pub records_scanned: usize,
    /// Address entries in the scanned ranges, invalid ones included
    pub addresses_scanned: usize,
    /// Address entries that failed to parse and were skipped
    pub invalid_addresses: usize,
    /// (record, valid address) pairs tested for containment
    pub pairs_tested: usize,
    /// Pairs where the address fell inside the record's prefix
    pub matching_pairs: usize,
    /// Size of the deduplicated coordinate set
    pub distinct_coordinates: usize,
    /// Partitions the run was split into
    pub partitions: usize,
}

impl MatchStats {
    /// Add another partition's counters to this one
    ///
    /// `records_scanned`, `addresses_scanned` and `invalid_addresses` are not
    /// summed: partitions overlap on one axis of the cross product, so the
    /// run total is set by the coordinator instead.
    pub fn add(&mut self, other: &MatchStats) {
        self.pairs_tested += other.pairs_tested;
        self.matching_pairs += other.matching_pairs;
        self.partitions += other.partitions;
    }

    /// Fraction of tested pairs that matched, as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.pairs_tested > 0 {
            (self.matching_pairs as f64 / self.pairs_tested as f64) * 100.0
        } else {
            0.0
        }
    }
}
