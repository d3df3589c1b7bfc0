//! Configuration for the clustering pipeline.

use serde::de::Error;
use serde::{Deserialize, Serialize};

/// How overlapping `update` calls publish their results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishOrder {
    /// Every finished update publishes, so the slowest call wins.
    #[default]
    CompletionOrder,
    /// A finished update publishes only if no later-issued call has published yet.
    LatestIssued,
}

/// Clustering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Scale applied to latitude and longitude before rounding to a `PointKey`.
    #[serde(default = "ClusterConfig::default_precision_factor")]
    pub precision_factor: f64,

    /// Minimum neighbors (the point itself included) for a point to seed a cluster.
    #[serde(default = "ClusterConfig::default_min_points")]
    pub min_points: usize,

    #[serde(default)]
    pub publish_order: PublishOrder,
}

impl ClusterConfig {
    const fn default_precision_factor() -> f64 {
        1_000_000.0
    }

    const fn default_min_points() -> usize {
        1
    }

    pub fn with_precision_factor(mut self, factor: f64) -> Self {
        assert!(
            factor.is_finite() && factor > 0.0,
            "Precision factor must be a positive finite number"
        );
        if factor > 1e9 {
            log::warn!(
                "Precision factor {} exceeds nanodegree resolution; keys may not survive \
                a numeric round-trip through the cluster engine",
                factor
            );
        }
        self.precision_factor = factor;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        assert!(min_points > 0, "Minimum points must be greater than zero");
        self.min_points = min_points;
        self
    }

    pub fn with_publish_order(mut self, order: PublishOrder) -> Self {
        self.publish_order = order;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.precision_factor.is_finite() || self.precision_factor <= 0.0 {
            return Err(format!(
                "Precision factor must be a positive finite number, got {}",
                self.precision_factor
            ));
        }

        if self.min_points == 0 {
            return Err("Minimum points must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: ClusterConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: ClusterConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            precision_factor: Self::default_precision_factor(),
            min_points: Self::default_min_points(),
            publish_order: PublishOrder::default(),
        }
    }
}
