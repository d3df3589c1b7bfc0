//! Zoom-adaptive clustering of geographic items for map display.
//!
//! Nearby markers collapse into one annotation whenever they sit closer than a
//! chosen on-screen spacing. Each update derives a radius in degrees from the
//! viewport, groups the items with a pluggable spatial engine on a worker
//! thread, and publishes a fresh list of clusters.
//!
//! ## Pipeline
//! - **Epsilon**: pixel spacing converted to degrees through the viewport
//! - **Quantization**: coordinates keyed at a fixed precision so engine output
//!   can be matched back to items
//! - **Engine**: R*-tree DBSCAN by default, replaceable via [`ClusterEngine`]
//! - **Resolution and aggregation**: engine groups mapped to items, with
//!   centroid and size per cluster
//!
//! ```rust
//! use geocluster::{ClusterManager, Coordinate, UpdateOutcome};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let manager = ClusterManager::<Coordinate>::new();
//! let items = vec![
//!     Coordinate::new(42.0000, -83.0000),
//!     Coordinate::new(42.0001, -83.0001),
//!     Coordinate::new(50.0000, -90.0000),
//! ];
//!
//! let outcome = manager.update_with_epsilon(&items, 0.01).await;
//! assert!(matches!(outcome, UpdateOutcome::Published(_)));
//! assert_eq!(manager.clusters().len(), 2);
//! # });
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod manager;

pub use builder::ClusterManagerBuilder;
pub use config::{ClusterConfig, PublishOrder};
pub use error::{ClusterError, EngineError, Result};
pub use manager::{ClusterList, ClusterManager, PublishReport, UpdateOutcome};

pub use compute::engine::{ClusterEngine, DbscanEngine, DistanceFn, euclidean_degrees};
pub use compute::epsilon::{Viewport, derive_epsilon};
pub use compute::quantize::{PointKey, QuantizedPoints};

pub use geocluster_types::cluster::{Cluster, ClusterSignature};
pub use geocluster_types::point::{Clusterable, Coordinate, ScreenPoint};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterConfig, ClusterError, ClusterManager, PublishOrder, Result};

    pub use crate::{Cluster, ClusterSignature, Clusterable, Coordinate, ScreenPoint};

    pub use crate::{ClusterEngine, DbscanEngine, Viewport};

    pub use crate::UpdateOutcome;
}
