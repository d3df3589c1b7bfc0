//! Builds cluster entities from resolved position groups.

use geocluster_types::cluster::Cluster;
use geocluster_types::point::Coordinate;

/// Arithmetic mean of latitudes and of longitudes.
///
/// Planar averaging is fine here because a group never spans more than a few
/// epsilons; it is not meant for extents crossing the antimeridian.
pub fn centroid<I>(coords: I) -> Option<Coordinate>
where
    I: IntoIterator<Item = Coordinate>,
{
    let mut count = 0usize;
    let (mut lat, mut lon) = (0.0, 0.0);
    for coord in coords {
        lat += coord.lat;
        lon += coord.lon;
        count += 1;
    }

    (count > 0).then(|| Coordinate::new(lat / count as f64, lon / count as f64))
}

/// One cluster per non-empty group, members being input positions.
///
/// `points[i]` must be the coordinate of item `i`. Empty groups (every point
/// missed during resolution) produce nothing. Use [`Cluster::map_members`] to
/// swap positions for the items themselves.
pub fn aggregate(groups: Vec<Vec<usize>>, points: &[Coordinate]) -> Vec<Cluster<usize>> {
    groups
        .into_iter()
        .filter_map(|positions| {
            let center = centroid(positions.iter().map(|&i| points[i]))?;
            Some(Cluster::new(positions.clone(), positions, center))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_is_arithmetic_mean() {
        let center = centroid([Coordinate::new(42.0, -83.0), Coordinate::new(42.0001, -83.0001)])
            .unwrap();
        assert!((center.lat - 42.00005).abs() < 1e-9);
        assert!((center.lon + 83.00005).abs() < 1e-9);
    }

    #[test]
    fn test_centroid_of_nothing() {
        assert!(centroid(std::iter::empty::<Coordinate>()).is_none());
    }

    #[test]
    fn test_aggregate_skips_empty_groups() {
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 2.0),
            Coordinate::new(8.0, 8.0),
        ];
        let clusters = aggregate(vec![vec![1, 0], vec![], vec![2]], &points);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![1, 0]);
        assert_eq!(clusters[0].center, Coordinate::new(0.0, 1.0));
        assert_eq!(clusters[1].size(), 1);
        assert_eq!(clusters[1].center, points[2]);
        assert_ne!(clusters[0].id, clusters[1].id);
    }
}
