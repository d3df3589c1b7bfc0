//! GeoJSON rendering of clusters for web map layers.

use crate::error::{ClusterError, Result};
use geocluster_types::cluster::Cluster;
use geojson::{Feature, FeatureCollection, Geometry, Value, feature::Id};
use serde_json::{Map, json};

/// A Point feature at the cluster center with `size` and `member_indices`
/// properties. The feature id is the cluster id.
pub fn cluster_to_feature<T>(cluster: &Cluster<T>) -> Feature {
    let mut properties = Map::new();
    properties.insert("size".to_string(), json!(cluster.size()));
    properties.insert("member_indices".to_string(), json!(cluster.member_indices));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            cluster.center.lon,
            cluster.center.lat,
        ]))),
        id: Some(Id::String(cluster.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn clusters_to_feature_collection<T>(clusters: &[Cluster<T>]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: clusters.iter().map(cluster_to_feature).collect(),
        foreign_members: None,
    }
}

/// Serializes clusters as a GeoJSON FeatureCollection string.
pub fn clusters_to_geojson<T>(clusters: &[Cluster<T>]) -> Result<String> {
    serde_json::to_string(&clusters_to_feature_collection(clusters)).map_err(|e| {
        ClusterError::Serialization(format!("Failed to serialize clusters: {}", e))
    })
}
