//! Clustering pipeline: quantization, engine, resolution and aggregation.
//!
//! The stages are independent of the manager and of any runtime. The
//! [`ClusterManager`](crate::ClusterManager) runs [`cluster_positions`] on a
//! worker thread; [`cluster_items`] runs the whole pipeline synchronously.

pub mod aggregate;
pub mod engine;
pub mod epsilon;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod quantize;
pub mod resolve;

use crate::config::ClusterConfig;
use crate::error::{EngineError, Result};
use engine::{ClusterEngine, euclidean_degrees};
use geocluster_types::cluster::Cluster;
use geocluster_types::point::Clusterable;
use quantize::QuantizedPoints;

/// Output of one engine + resolve + aggregate pass, in index space.
#[derive(Debug, Clone)]
pub struct ClusterPass {
    pub clusters: Vec<Cluster<usize>>,
    /// Engine output points that matched no quantization key.
    pub missed: usize,
}

/// Run the engine over quantized points and turn its groups into clusters of
/// input positions.
///
/// Reads only the point list, epsilon and the reverse map, so it can run on
/// any thread.
pub fn cluster_positions(
    engine: &dyn ClusterEngine,
    quantized: &QuantizedPoints,
    epsilon: f64,
    min_points: usize,
) -> std::result::Result<ClusterPass, EngineError> {
    if quantized.is_empty() {
        return Ok(ClusterPass {
            clusters: Vec::new(),
            missed: 0,
        });
    }

    let groups = engine.partition(quantized.points(), epsilon, min_points, euclidean_degrees)?;
    let resolution = resolve::resolve_groups(&groups, quantized);
    let clusters = aggregate::aggregate(resolution.groups, quantized.points());

    log::debug!(
        "{} engine: {} points -> {} groups -> {} clusters ({} missed)",
        engine.name(),
        quantized.len(),
        groups.len(),
        clusters.len(),
        resolution.missed
    );

    Ok(ClusterPass {
        clusters,
        missed: resolution.missed,
    })
}

/// Cluster `items` on the current thread with a known epsilon.
///
/// # Examples
///
/// ```
/// use geocluster::compute::cluster_items;
/// use geocluster::compute::engine::DbscanEngine;
/// use geocluster::{ClusterConfig, Coordinate};
///
/// let items = vec![
///     Coordinate::new(42.0, -83.0),
///     Coordinate::new(42.0001, -83.0001),
///     Coordinate::new(50.0, -90.0),
/// ];
/// let clusters = cluster_items(&items, 0.01, &ClusterConfig::default(), &DbscanEngine)?;
/// assert_eq!(clusters.len(), 2);
/// # Ok::<(), geocluster::ClusterError>(())
/// ```
pub fn cluster_items<T: Clusterable + Clone>(
    items: &[T],
    epsilon: f64,
    config: &ClusterConfig,
    engine: &dyn ClusterEngine,
) -> Result<Vec<Cluster<T>>> {
    let quantized = QuantizedPoints::build(items, config.precision_factor);
    let pass = cluster_positions(engine, &quantized, epsilon, config.min_points)?;

    Ok(pass
        .clusters
        .into_iter()
        .map(|cluster| cluster.map_members(|i| items[i].clone()))
        .collect())
}
