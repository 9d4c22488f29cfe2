use crate::error::{GeoIpMapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Largest split or worker count a run accepts
pub const MAX_CONCURRENCY: usize = 1024;

/// How a matcher run fans out its work
///
/// Every strategy computes the same coordinate set; they differ only in how
/// the record × address cross product is split across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Strategy {
    /// Single pass on the calling thread
    #[default]
    Sequential,
    /// One scoped thread per contiguous slice of the network database
    Partitioned {
        /// Number of database slices
        splits: usize,
    },
    /// A dedicated pool of worker threads, each scanning a slice of the
    /// address list and sending its result back over a channel
    Pool {
        /// Number of pool workers
        workers: usize,
    },
}

impl Strategy {
    /// Partitioned strategy; negative counts clamp to 0
    pub fn partitioned(splits: i64) -> Self {
        Strategy::Partitioned {
            splits: clamp_count(splits),
        }
    }

    /// Pool strategy; negative counts clamp to 0
    pub fn pool(workers: i64) -> Self {
        Strategy::Pool {
            workers: clamp_count(workers),
        }
    }

    /// Build a strategy from independent selection flags
    ///
    /// At most one of `sequential`, `splits` and `workers` may be given;
    /// none selects [`Strategy::Sequential`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoIpMapError::Config`] when more than one is selected.
    pub fn from_selection(
        sequential: bool,
        splits: Option<i64>,
        workers: Option<i64>,
    ) -> Result<Self> {
        let mut selected = Vec::new();
        if sequential {
            selected.push("sequential");
        }
        if splits.is_some() {
            selected.push("partitioned");
        }
        if workers.is_some() {
            selected.push("pool");
        }
        if selected.len() > 1 {
            return Err(GeoIpMapError::config(format!(
                "conflicting strategies selected: {}",
                selected.join(", ")
            )));
        }

        match (splits, workers) {
            (Some(splits), _) => Strategy::partitioned(splits),
            (_, Some(workers)) => Strategy::pool(workers),
            _ => Strategy::Sequential,
        }
        .validate()
    }

    /// Check the split/worker count against [`MAX_CONCURRENCY`]
    ///
    /// # Errors
    ///
    /// Returns [`GeoIpMapError::Config`] when the count is larger.
    pub fn validate(self) -> Result<Self> {
        let (name, count) = match self {
            Strategy::Sequential => return Ok(self),
            Strategy::Partitioned { splits } => ("splits", splits),
            Strategy::Pool { workers } => ("workers", workers),
        };
        if count > MAX_CONCURRENCY {
            return Err(GeoIpMapError::config(format!(
                "{} must be at most {}, got {}",
                name, MAX_CONCURRENCY, count
            )));
        }
        Ok(self)
    }

    /// The strategy that will actually run
    ///
    /// A concurrent strategy with one or fewer splits/workers degrades to
    /// [`Strategy::Sequential`].
    pub fn effective(self) -> Self {
        match self {
            Strategy::Partitioned { splits } if splits <= 1 => Strategy::Sequential,
            Strategy::Pool { workers } if workers <= 1 => Strategy::Sequential,
            other => other,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::Partitioned { splits } => write!(f, "partitioned ({} splits)", splits),
            Strategy::Pool { workers } => write!(f, "pool ({} workers)", workers),
        }
    }
}

fn clamp_count(count: i64) -> usize {
    usize::try_from(count.max(0)).unwrap_or(usize::MAX)
}

/// Split `0..len` into `parts` contiguous ranges
///
/// Range `i` covers `[i * (len / parts), (i + 1) * (len / parts))`, except the
/// last, which runs to `len` and absorbs the remainder. The boundaries depend
/// only on `len` and `parts`. `parts == 0` is treated as 1.
///
/// ```
/// use geoipmap::matcher::partition_ranges;
///
/// assert_eq!(partition_ranges(10, 3), vec![0..3, 3..6, 6..10]);
/// ```
pub fn partition_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let size = len / parts;
    (0..parts)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == parts { len } else { (i + 1) * size };
            start..end
        })
        .collect()
}
