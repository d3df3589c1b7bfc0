//! # geocluster-types
//!
//! Core value types for the geocluster map clustering pipeline.
//!
//! - **Point types**: `Coordinate`, `ScreenPoint`, and the `Clusterable` capability
//! - **Cluster types**: `Cluster`, `ClusterSignature`
//!
//! Coordinates are serializable with Serde and convert to and from the `geo`
//! crate's `Point<f64>` (x = longitude, y = latitude).
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::point::{Clusterable, Coordinate};
//!
//! let detroit = Coordinate::new(42.3314, -83.0458);
//! assert_eq!(detroit.coordinate().lat, 42.3314);
//!
//! let as_geo: geo::Point<f64> = detroit.into();
//! assert_eq!(as_geo.x(), -83.0458);
//! ```

pub mod cluster;
pub mod point;
