//! Builder for cluster managers with a custom configuration or engine.

use crate::compute::engine::{ClusterEngine, DbscanEngine};
use crate::config::{ClusterConfig, PublishOrder};
use crate::error::{ClusterError, Result};
use crate::manager::ClusterManager;
use geocluster_types::point::Clusterable;
use std::sync::Arc;

/// Builder for [`ClusterManager`].
pub struct ClusterManagerBuilder {
    config: ClusterConfig,
    engine: Option<Arc<dyn ClusterEngine>>,
}

impl ClusterManagerBuilder {
    /// Default configuration with the R*-tree DBSCAN engine.
    pub fn new() -> Self {
        Self {
            config: ClusterConfig::default(),
            engine: None,
        }
    }

    pub fn config(mut self, config: ClusterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn precision_factor(mut self, factor: f64) -> Self {
        self.config.precision_factor = factor;
        self
    }

    pub fn min_points(mut self, min_points: usize) -> Self {
        self.config.min_points = min_points;
        self
    }

    pub fn publish_order(mut self, order: PublishOrder) -> Self {
        self.config.publish_order = order;
        self
    }

    /// Replace the grouping primitive.
    pub fn engine<E: ClusterEngine + 'static>(mut self, engine: E) -> Self {
        self.engine = Some(Arc::new(engine));
        self
    }

    /// Replace the grouping primitive with a shared instance.
    pub fn shared_engine(mut self, engine: Arc<dyn ClusterEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Validate the configuration and build the manager.
    pub fn build<T: Clusterable + Clone>(self) -> Result<ClusterManager<T>> {
        self.config.validate().map_err(ClusterError::Config)?;
        let engine = self.engine.unwrap_or_else(|| Arc::new(DbscanEngine));
        Ok(ClusterManager::from_parts(self.config, engine))
    }
}

impl Default for ClusterManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClusterManagerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterManagerBuilder")
            .field("config", &self.config)
            .field("engine", &self.engine.as_ref().map(|e| e.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocluster_types::point::Coordinate;

    #[test]
    fn test_builder_applies_settings() {
        let manager: ClusterManager<Coordinate> = ClusterManagerBuilder::new()
            .precision_factor(1e4)
            .min_points(2)
            .publish_order(PublishOrder::LatestIssued)
            .build()
            .unwrap();

        let config = manager.config();
        assert_eq!(config.precision_factor, 1e4);
        assert_eq!(config.min_points, 2);
        assert_eq!(config.publish_order, PublishOrder::LatestIssued);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = ClusterManagerBuilder::new()
            .min_points(0)
            .build::<Coordinate>();
        assert!(matches!(result, Err(ClusterError::Config(_))));

        let result = ClusterManagerBuilder::new()
            .precision_factor(f64::NAN)
            .build::<Coordinate>();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_engine_name() {
        let builder = ClusterManagerBuilder::new().engine(DbscanEngine);
        assert!(format!("{:?}", builder).contains("dbscan"));
    }
}
