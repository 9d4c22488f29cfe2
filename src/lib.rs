//! geoipmap - Plot IPv4 addresses on a map
//!
//! geoipmap resolves a list of IPv4 addresses to pixel coordinates on a flat
//! map. Each address is matched against a database of network prefixes
//! annotated with latitude and longitude, and every matched location is
//! projected onto the map with a Mercator projection bounded by the map's own
//! geographic window.
//!
//! # Quick Start
//!
//! ```rust
//! use geoipmap::{AddressList, GeoStore, MapGeometry, Matcher, Strategy};
//!
//! // network,lat,lon rows, no header
//! let db = "1.0.0.0/24,-33.4940,143.2104\n8.8.8.0/24,37.7510,-97.8220\n";
//! let store = GeoStore::from_reader(db.as_bytes())?;
//!
//! // Raw entries; anything that isn't an IPv4 address simply never matches
//! let addresses: AddressList = ["8.8.8.8", "1.0.0.1", "not an address"]
//!     .into_iter()
//!     .collect();
//!
//! let geometry = MapGeometry::builder(2058, 1746).south_deg(-82.0).build()?;
//!
//! let coordinates = Matcher::new(&store, &addresses, geometry)
//!     .strategy(Strategy::Partitioned { splits: 4 })
//!     .run()?;
//!
//! for point in &coordinates {
//!     println!("({:.1}, {:.1})", point.x, point.y);
//! }
//! assert_eq!(coordinates.len(), 2);
//! # Ok::<(), geoipmap::GeoIpMapError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │  GeoStore    │   │ AddressList  │   loaded once, read-only
//! └──────┬───────┘   └──────┬───────┘
//!        └────────┬─────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │     Matcher     │  partition → scan (per backend) → merge
//!        │  + project()    │
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │  CoordinateSet  │  deduplicated (x, y) pixels for a renderer
//!        └─────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Pixel coordinates and the deduplicated coordinate set
pub mod coords;
/// Error types for geoipmap operations
pub mod error;
pub mod file_reader;
pub mod geometry;
pub mod matcher;
pub mod network;
pub mod progress;
pub mod projection;
pub mod store;

// Re-exports for Rust consumers

pub use crate::coords::{CoordinateSet, PixelCoordinate};
pub use crate::error::{GeoIpMapError, Result};
pub use crate::geometry::{GeometryBuilder, MapGeometry};
pub use crate::matcher::{MatchReport, MatchStats, Matcher, Strategy};
pub use crate::network::Ipv4Network;
pub use crate::progress::{NoOpObserver, ProgressObserver, TracingObserver};
pub use crate::projection::project;
pub use crate::store::{AddressList, GeoRecord, GeoStore};
