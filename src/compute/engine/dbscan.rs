//! DBSCAN over an R*-tree.

use super::{ClusterEngine, DistanceFn};
use crate::error::EngineError;
use geocluster_types::point::Coordinate;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use std::collections::VecDeque;

/// Point stored in the tree: `[lat, lon]` tagged with its input position.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Density-based grouping backed by `rstar` envelope queries.
///
/// Neighbor candidates come from the square envelope `[p - eps, p + eps]` and
/// are then filtered by the supplied distance function. This is exact for any
/// metric that is never smaller than the largest per-axis difference, which
/// holds for Euclidean distance in degree space.
///
/// Points that are neither core points nor reachable from one (only possible
/// with `min_points > 1`) are returned as singleton groups rather than
/// discarded, so the output always covers every input point. Groups are
/// ordered by their lowest input position and members within a group follow
/// input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DbscanEngine;

impl DbscanEngine {
    pub fn new() -> Self {
        Self
    }
}

struct Neighborhood<'a> {
    tree: RTree<IndexedPoint>,
    points: &'a [Coordinate],
    epsilon: f64,
    reach: f64,
    distance: DistanceFn,
}

impl<'a> Neighborhood<'a> {
    fn new(points: &'a [Coordinate], epsilon: f64, distance: DistanceFn) -> Self {
        let tree = RTree::bulk_load(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| IndexedPoint::new(p.to_array(), i))
                .collect(),
        );
        // The envelope is only a prefilter; widen it so rounding never
        // excludes a neighbor sitting exactly on the boundary.
        let reach = epsilon * (1.0 + 1e-9) + 1e-12;

        Self {
            tree,
            points,
            epsilon,
            reach,
            distance,
        }
    }

    /// Positions within epsilon of `i`, including `i` itself.
    fn of(&self, i: usize) -> Vec<usize> {
        let p = &self.points[i];
        let envelope = AABB::from_corners(
            [p.lat - self.reach, p.lon - self.reach],
            [p.lat + self.reach, p.lon + self.reach],
        );

        self.tree
            .locate_in_envelope(&envelope)
            .filter(|candidate| (self.distance)(p, &self.points[candidate.data]) <= self.epsilon)
            .map(|candidate| candidate.data)
            .collect()
    }
}

impl ClusterEngine for DbscanEngine {
    fn partition(
        &self,
        points: &[Coordinate],
        epsilon: f64,
        min_points: usize,
        distance: DistanceFn,
    ) -> Result<Vec<Vec<Coordinate>>, EngineError> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "epsilon must be a non-negative finite number, got {}",
                epsilon
            )));
        }
        if min_points == 0 {
            return Err(EngineError::InvalidInput(
                "min_points must be greater than zero".to_string(),
            ));
        }
        if let Some(position) = points.iter().position(|p| !p.is_finite()) {
            return Err(EngineError::InvalidInput(format!(
                "point {} has a non-finite coordinate: {:?}",
                position, points[position]
            )));
        }
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let neighborhood = Neighborhood::new(points, epsilon, distance);
        let mut labels: Vec<Option<usize>> = vec![None; points.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut queue = VecDeque::new();

        for seed in 0..points.len() {
            if labels[seed].is_some() {
                continue;
            }
            let seed_neighbors = neighborhood.of(seed);
            if seed_neighbors.len() < min_points {
                // Border or noise, decided once every core point has expanded.
                continue;
            }

            let group_id = groups.len();
            labels[seed] = Some(group_id);
            let mut members = vec![seed];
            queue.extend(seed_neighbors);

            while let Some(next) = queue.pop_front() {
                if labels[next].is_some() {
                    continue;
                }
                labels[next] = Some(group_id);
                members.push(next);

                let reachable = neighborhood.of(next);
                if reachable.len() >= min_points {
                    queue.extend(reachable.into_iter().filter(|&k| labels[k].is_none()));
                }
            }

            groups.push(members);
        }

        let mut noise = 0usize;
        for (position, label) in labels.iter().enumerate() {
            if label.is_none() {
                groups.push(vec![position]);
                noise += 1;
            }
        }

        for members in &mut groups {
            members.sort_unstable();
        }
        groups.sort_unstable_by_key(|members| members[0]);

        log::debug!(
            "dbscan: {} points -> {} groups ({} unreachable singletons, eps={}, min_points={})",
            points.len(),
            groups.len(),
            noise,
            epsilon,
            min_points
        );

        Ok(groups
            .into_iter()
            .map(|members| members.into_iter().map(|i| points[i]).collect())
            .collect())
    }

    fn name(&self) -> &'static str {
        "dbscan"
    }
}
