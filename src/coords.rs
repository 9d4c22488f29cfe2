//! Pixel coordinates and the deduplicated coordinate set
//!
//! Coordinates compare by exact floating value, so two matches that project to
//! numerically identical points collapse into a single entry. `0.0` and `-0.0`
//! are the same value; every NaN is the same value.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A projected point in raster image coordinates (y grows downward)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PixelCoordinate {
    /// Horizontal offset in pixels from the left edge
    pub x: f64,
    /// Vertical offset in pixels from the top edge
    pub y: f64,
}

impl PixelCoordinate {
    /// Create a coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn key(&self) -> (u64, u64) {
        (canonical_bits(self.x), canonical_bits(self.y))
    }
}

/// Bit pattern used for equality and hashing
#[inline]
fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for PixelCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PixelCoordinate {}

impl Hash for PixelCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for PixelCoordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PixelCoordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ax, ay) = self.key();
        let (bx, by) = other.key();
        f64::from_bits(ax)
            .total_cmp(&f64::from_bits(bx))
            .then_with(|| f64::from_bits(ay).total_cmp(&f64::from_bits(by)))
    }
}

impl From<(f64, f64)> for PixelCoordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<PixelCoordinate> for (f64, f64) {
    fn from(c: PixelCoordinate) -> Self {
        (c.x, c.y)
    }
}

/// Deduplicated set of projected coordinates
///
/// Produced fresh by every matcher run and handed to the caller once the run
/// has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateSet {
    points: FxHashSet<PixelCoordinate>,
}

impl CoordinateSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a coordinate, returning false if it was already present
    pub fn insert(&mut self, coordinate: PixelCoordinate) -> bool {
        self.points.insert(coordinate)
    }

    /// Absorb every coordinate of `other`
    pub fn merge(&mut self, other: CoordinateSet) {
        // Extend the larger set with the smaller one
        if other.points.len() > self.points.len() {
            let smaller = std::mem::replace(&mut self.points, other.points);
            self.points.extend(smaller);
        } else {
            self.points.extend(other.points);
        }
    }

    /// Union of two sets
    pub fn union(mut self, other: CoordinateSet) -> CoordinateSet {
        self.merge(other);
        self
    }

    /// True if the coordinate is present
    pub fn contains(&self, coordinate: &PixelCoordinate) -> bool {
        self.points.contains(coordinate)
    }

    /// Number of distinct coordinates
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no coordinates were produced
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &PixelCoordinate> {
        self.points.iter()
    }

    /// Coordinates ordered by x then y, for deterministic output
    pub fn into_sorted_vec(self) -> Vec<PixelCoordinate> {
        let mut points: Vec<_> = self.points.into_iter().collect();
        points.sort_unstable();
        points
    }
}

impl IntoIterator for CoordinateSet {
    type Item = PixelCoordinate;
    type IntoIter = std::collections::hash_set::IntoIter<PixelCoordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a CoordinateSet {
    type Item = &'a PixelCoordinate;
    type IntoIter = std::collections::hash_set::Iter<'a, PixelCoordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<PixelCoordinate> for CoordinateSet {
    fn from_iter<I: IntoIterator<Item = PixelCoordinate>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Extend<PixelCoordinate> for CoordinateSet {
    fn extend<I: IntoIterator<Item = PixelCoordinate>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}
