//! Spatial grouping primitive.
//!
//! The pipeline treats the engine as a black box: points in, groups of points
//! out. Anything that satisfies the partition contract on [`ClusterEngine`]
//! can be swapped in (grid bucketing, k-d trees, a GPU implementation) without
//! touching quantization, resolution or aggregation.

mod dbscan;

pub use dbscan::DbscanEngine;

use crate::error::EngineError;
use geo::Distance;
use geocluster_types::point::Coordinate;

/// Distance between two coordinates, in the same unit as epsilon.
///
/// Must be in degrees and never smaller than the larger of the latitude and
/// longitude differences (Euclidean, Manhattan and Chebyshev in degree space
/// all qualify). Index-backed engines such as [`DbscanEngine`] prune with a
/// square envelope of half-width epsilon, so a metric in other units (meters,
/// kilometers) or one that shrinks per-axis differences misses neighbors.
pub type DistanceFn = fn(&Coordinate, &Coordinate) -> f64;

/// Straight-line distance in degree space over the `(lat, lon)` pair.
///
/// A local proximity metric, not a geodesic one.
pub fn euclidean_degrees(a: &Coordinate, b: &Coordinate) -> f64 {
    geo::Euclidean.distance(geo::Point::from(*a), geo::Point::from(*b))
}

/// Partitions points into proximity groups.
///
/// Contract for implementors:
///
/// - every returned group is non-empty and groups are disjoint
/// - points in one group are connected by a chain of steps of length at most
///   `epsilon` (per `distance`) through points that each have at least
///   `min_points` neighbors within `epsilon`, counting themselves
/// - with `min_points == 1` every input point lands in exactly one group;
///   isolated points come back as singletons
/// - returned coordinates are the input values, though they may have passed
///   through a numeric transform
/// - the same input yields the same output
pub trait ClusterEngine: Send + Sync {
    fn partition(
        &self,
        points: &[Coordinate],
        epsilon: f64,
        min_points: usize,
        distance: DistanceFn,
    ) -> Result<Vec<Vec<Coordinate>>, EngineError>;

    /// Short name for logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}
