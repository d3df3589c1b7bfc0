//! Maps engine output back to input positions.
//!
//! Each returned point is re-keyed with the quantization precision and looked
//! up in the reverse map. There is no nearest-match fallback: a point whose key
//! is missing is dropped, and the item it stood for is left out of this
//! update. The engine is expected to preserve the rounding class of each
//! coordinate; one that nudges a value across a rounding boundary loses items.
//! Misses are counted and logged so the surrounding system can notice.
//!
//! Each returned point claims one position from its key's bucket. Coordinates
//! closer than the quantization step share a key, so they cannot be told apart
//! here: the first point seen takes the lowest unclaimed position.

use super::quantize::{PointKey, QuantizedPoints};
use geocluster_types::point::Coordinate;
use rustc_hash::FxHashMap;

/// Resolved position groups plus the number of points that found no key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// One list per engine group, in engine order. May contain empty lists
    /// when every point of a group missed.
    pub groups: Vec<Vec<usize>>,
    pub missed: usize,
}

impl Resolution {
    /// Total positions across all groups.
    pub fn resolved(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

/// Resolve every engine group against the quantization map.
///
/// Every point takes the next unclaimed position behind its key, so groups
/// never share a position and a group keeps one item per point the engine put
/// in it. A point whose key is unknown, or whose bucket is already used up,
/// counts as a miss.
pub fn resolve_groups(groups: &[Vec<Coordinate>], quantized: &QuantizedPoints) -> Resolution {
    let mut cursors: FxHashMap<PointKey, usize> = FxHashMap::default();
    let mut missed = 0usize;

    let groups = groups
        .iter()
        .map(|group| {
            let mut positions = Vec::with_capacity(group.len());
            for point in group {
                let key = quantized.key_for(point);
                let Some(bucket) = quantized.get(&key) else {
                    missed += 1;
                    continue;
                };
                let cursor = cursors.entry(key).or_insert(0);
                match bucket.get(*cursor) {
                    Some(&position) => {
                        positions.push(position);
                        *cursor += 1;
                    }
                    None => missed += 1,
                }
            }
            positions
        })
        .collect();

    if missed > 0 {
        log::warn!(
            "{} clustered point(s) did not match a quantization key at precision {}; \
             their items are omitted from this update",
            missed,
            quantized.precision()
        );
    }

    Resolution { groups, missed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantize(points: &[Coordinate]) -> QuantizedPoints {
        QuantizedPoints::build(points, 1e6)
    }

    #[test]
    fn test_resolves_exact_points() {
        let points = vec![
            Coordinate::new(1.0, 1.0),
            Coordinate::new(2.0, 2.0),
            Coordinate::new(3.0, 3.0),
        ];
        let quantized = quantize(&points);
        let groups = vec![vec![points[2], points[0]], vec![points[1]]];

        let resolution = resolve_groups(&groups, &quantized);
        assert_eq!(resolution.groups, vec![vec![2, 0], vec![1]]);
        assert_eq!(resolution.missed, 0);
        assert_eq!(resolution.resolved(), 3);
    }

    #[test]
    fn test_tolerates_sub_precision_drift() {
        let points = vec![Coordinate::new(42.123456, -83.654321)];
        let quantized = quantize(&points);
        let drifted = vec![vec![Coordinate::new(42.123456 + 3e-10, -83.654321 - 3e-10)]];

        let resolution = resolve_groups(&drifted, &quantized);
        assert_eq!(resolution.groups, vec![vec![0]]);
        assert_eq!(resolution.missed, 0);
    }

    #[test]
    fn test_drift_across_rounding_boundary_drops_item() {
        // 20.0000006 rounds up to 20000001 at 1e6; the engine hands back a value that rounds down.
        let points = vec![Coordinate::new(10.0, 20.0000006), Coordinate::new(10.0, 21.0)];
        let quantized = quantize(&points);
        let perturbed = vec![vec![Coordinate::new(10.0, 20.0000004), points[1]]];

        let resolution = resolve_groups(&perturbed, &quantized);
        assert_eq!(resolution.groups, vec![vec![1]]);
        assert_eq!(resolution.missed, 1);
    }

    #[test]
    fn test_duplicate_points_emit_positions_once() {
        let points = vec![Coordinate::new(5.0, 5.0); 3];
        let quantized = quantize(&points);
        let groups = vec![points.clone()];

        let resolution = resolve_groups(&groups, &quantized);
        assert_eq!(resolution.groups, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_shared_key_split_across_groups() {
        // Both round to (1000000, 1000000) but the engine kept them apart.
        let points = vec![Coordinate::new(1.0, 1.0), Coordinate::new(1.0, 1.0000001)];
        let quantized = quantize(&points);
        assert_eq!(quantized.key_count(), 1);
        let groups = vec![vec![points[0]], vec![points[1]]];

        let resolution = resolve_groups(&groups, &quantized);
        assert_eq!(resolution.groups, vec![vec![0], vec![1]]);
        assert_eq!(resolution.missed, 0);
    }

    #[test]
    fn test_extra_point_beyond_bucket_is_missed() {
        let points = vec![Coordinate::new(5.0, 5.0); 2];
        let quantized = quantize(&points);
        let groups = vec![vec![points[0], points[0], points[0]]];

        let resolution = resolve_groups(&groups, &quantized);
        assert_eq!(resolution.groups, vec![vec![0, 1]]);
        assert_eq!(resolution.missed, 1);
    }

    #[test]
    fn test_fully_missed_group_is_empty() {
        let quantized = quantize(&[Coordinate::new(0.0, 0.0)]);
        let groups = vec![vec![Coordinate::new(9.0, 9.0)], vec![Coordinate::new(0.0, 0.0)]];

        let resolution = resolve_groups(&groups, &quantized);
        assert_eq!(resolution.groups, vec![vec![], vec![0]]);
        assert_eq!(resolution.missed, 1);
    }
}
