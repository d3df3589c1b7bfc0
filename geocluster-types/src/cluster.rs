use crate::point::Coordinate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// A group of nearby items collapsed into one map annotation.
///
/// Every cluster carries a fresh random id so UI lists can diff rows, but two
/// clusters describe the same grouping when their [`ClusterSignature`]s match.
///
/// # Examples
///
/// ```
/// use geocluster_types::cluster::Cluster;
/// use geocluster_types::point::Coordinate;
///
/// let members = vec![Coordinate::new(42.0, -83.0), Coordinate::new(42.0002, -83.0002)];
/// let cluster = Cluster::new(members, vec![0, 1], Coordinate::new(42.0001, -83.0001));
/// assert_eq!(cluster.size(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster<T> {
    pub id: Uuid,
    /// Members in first-encountered order.
    pub members: Vec<T>,
    /// Position of each member in the item slice the cluster was built from.
    pub member_indices: Vec<usize>,
    /// Arithmetic mean of member latitudes and longitudes.
    pub center: Coordinate,
}

impl<T> Cluster<T> {
    /// Create a cluster with a newly generated id.
    pub fn new(members: Vec<T>, member_indices: Vec<usize>, center: Coordinate) -> Self {
        Self {
            id: Uuid::new_v4(),
            members,
            member_indices,
            center,
        }
    }

    /// Number of members.
    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// The `(center, size)` pair used for value comparison.
    pub fn signature(&self) -> ClusterSignature {
        ClusterSignature {
            center: self.center,
            size: self.size(),
        }
    }

    /// Convert members while keeping id, positions and center.
    pub fn map_members<U, F>(self, f: F) -> Cluster<U>
    where
        F: FnMut(T) -> U,
    {
        Cluster {
            id: self.id,
            members: self.members.into_iter().map(f).collect(),
            member_indices: self.member_indices,
            center: self.center,
        }
    }
}

/// Value identity of a cluster: its centroid and member count.
///
/// Ordered by size, then latitude, then longitude using IEEE total ordering,
/// so signatures can be sorted and compared as multisets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClusterSignature {
    pub center: Coordinate,
    pub size: usize,
}

impl ClusterSignature {
    /// True when sizes match and both center components are within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.size == other.size
            && (self.center.lat - other.center.lat).abs() <= tolerance
            && (self.center.lon - other.center.lon).abs() <= tolerance
    }
}

impl PartialEq for ClusterSignature {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ClusterSignature {}

impl PartialOrd for ClusterSignature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClusterSignature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then_with(|| self.center.lat.total_cmp(&other.center.lat))
            .then_with(|| self.center.lon.total_cmp(&other.center.lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cluster_gets_unique_id() {
        let a = Cluster::new(vec!["a"], vec![0], Coordinate::new(1.0, 1.0));
        let b = Cluster::new(vec!["a"], vec![0], Coordinate::new(1.0, 1.0));
        assert_ne!(a.id, b.id);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_map_members_keeps_identity() {
        let names = ["north", "south"];
        let positions = Cluster::new(vec![1, 0], vec![1, 0], Coordinate::new(0.5, 0.5));
        let id = positions.id;

        let named = positions.map_members(|i| names[i]);
        assert_eq!(named.id, id);
        assert_eq!(named.members, vec!["south", "north"]);
        assert_eq!(named.member_indices, vec![1, 0]);
    }

    #[test]
    fn test_signature_ordering() {
        let small = ClusterSignature {
            center: Coordinate::new(50.0, -90.0),
            size: 1,
        };
        let large = ClusterSignature {
            center: Coordinate::new(42.0, -83.0),
            size: 2,
        };
        let mut sigs = vec![large, small];
        sigs.sort();
        assert_eq!(sigs, vec![small, large]);
    }

    #[test]
    fn test_signature_approx_eq() {
        let a = ClusterSignature {
            center: Coordinate::new(42.00005, -83.00005),
            size: 2,
        };
        let b = ClusterSignature {
            center: Coordinate::new(42.000050000001, -83.00005),
            size: 2,
        };
        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&ClusterSignature { size: 3, ..b }, 1e-9));
    }
}
