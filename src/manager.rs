//! Cluster manager: runs the pipeline per update and owns the published list.
//!
//! Quantization happens on the calling task. The engine, resolution and
//! aggregation run on Tokio's blocking pool, and the caller's task resumes to
//! publish the result. The published list lives in a `watch` channel and is
//! always replaced as a whole.
//!
//! Overlapping updates are not serialized. With
//! [`PublishOrder::CompletionOrder`] (the default) whichever update finishes
//! last wins, even if it was issued first. [`PublishOrder::LatestIssued`]
//! drops results that are older than what is already published.

use crate::builder::ClusterManagerBuilder;
use crate::compute::engine::{ClusterEngine, DbscanEngine};
use crate::compute::epsilon::{Viewport, derive_epsilon};
use crate::compute::quantize::QuantizedPoints;
use crate::compute::{ClusterPass, cluster_positions};
use crate::config::{ClusterConfig, PublishOrder};
use crate::error::{ClusterError, Result};
use geocluster_types::cluster::Cluster;
use geocluster_types::point::Clusterable;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// A published snapshot of clusters.
pub type ClusterList<T> = Arc<[Cluster<T>]>;

/// Summary of an update that replaced the published list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PublishReport {
    /// Token taken when the update was issued. Increases with every call.
    pub sequence: u64,
    pub epsilon: f64,
    pub items: usize,
    pub clusters: usize,
    /// Engine output points that matched no quantization key.
    pub missed: usize,
}

/// What an `update` call did. Failures never escape as errors; they leave the
/// published list untouched and are reported here.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The item set was empty and the published list was cleared.
    Cleared { sequence: u64 },
    /// No epsilon could be derived (or the given one was invalid). Nothing changed.
    Skipped(ClusterError),
    Published(PublishReport),
    /// A later-issued update had already published; this result was dropped.
    Superseded { sequence: u64, latest: u64 },
    /// The engine or the worker failed. Nothing changed.
    Failed(ClusterError),
}

impl UpdateOutcome {
    /// True if this call replaced the published list.
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Cleared { .. } | Self::Published(_))
    }
}

/// Keeps a list of clusters in sync with an item set and the map's zoom.
///
/// `update` must be polled inside a Tokio runtime. The manager itself never
/// blocks the calling task; it suspends while a worker thread clusters.
///
/// ```no_run
/// use geocluster::{ClusterManager, Coordinate, ScreenPoint};
///
/// # async fn redraw(items: Vec<Coordinate>) {
/// let manager = ClusterManager::<Coordinate>::new();
/// let mut changes = manager.subscribe();
///
/// let viewport = |p: ScreenPoint| Some(Coordinate::new(42.0 - p.y * 1e-4, -83.0 + p.x * 1e-4));
/// manager.update(&items, &viewport, 44.0).await;
///
/// changes.changed().await.ok();
/// let clusters = changes.borrow().clone();
/// # }
/// ```
pub struct ClusterManager<T> {
    config: ClusterConfig,
    engine: Arc<dyn ClusterEngine>,
    published: watch::Sender<ClusterList<T>>,
    issued: AtomicU64,
    last_published: AtomicU64,
}

impl<T: Clusterable + Clone> ClusterManager<T> {
    /// Manager with default configuration and the R*-tree DBSCAN engine.
    pub fn new() -> Self {
        Self::from_parts(ClusterConfig::default(), Arc::new(DbscanEngine))
    }

    pub fn with_config(config: ClusterConfig) -> Result<Self> {
        ClusterManagerBuilder::new().config(config).build()
    }

    pub fn builder() -> ClusterManagerBuilder {
        ClusterManagerBuilder::new()
    }

    pub(crate) fn from_parts(config: ClusterConfig, engine: Arc<dyn ClusterEngine>) -> Self {
        let empty: ClusterList<T> = Arc::from(Vec::new());
        let (published, _) = watch::channel(empty);
        Self {
            config,
            engine,
            published,
            issued: AtomicU64::new(0),
            last_published: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Snapshot of the currently published clusters.
    pub fn clusters(&self) -> ClusterList<T> {
        self.published.borrow().clone()
    }

    /// Receiver notified every time the published list is replaced.
    pub fn subscribe(&self) -> watch::Receiver<ClusterList<T>> {
        self.published.subscribe()
    }

    /// Sequence token of the most recently issued update.
    pub fn last_issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Recluster `items` for the current viewport.
    ///
    /// `pixel_spacing` is the on-screen distance below which markers merge.
    /// An empty item set always clears the published list. If the viewport
    /// cannot yield an epsilon the call does nothing at all.
    pub async fn update<V>(&self, items: &[T], viewport: &V, pixel_spacing: f64) -> UpdateOutcome
    where
        V: Viewport + ?Sized,
    {
        if items.is_empty() {
            return self.clear();
        }

        let epsilon = match derive_epsilon(viewport, pixel_spacing) {
            Ok(epsilon) => epsilon,
            Err(e) => {
                log::trace!("skipping cluster update: {}", e);
                return UpdateOutcome::Skipped(e);
            }
        };

        self.run(items, epsilon).await
    }

    /// Recluster `items` with an explicit radius in degrees.
    pub async fn update_with_epsilon(&self, items: &[T], epsilon: f64) -> UpdateOutcome {
        if items.is_empty() {
            return self.clear();
        }

        if !epsilon.is_finite() || epsilon < 0.0 {
            return UpdateOutcome::Skipped(ClusterError::InvalidInput(format!(
                "epsilon must be a non-negative finite number, got {}",
                epsilon
            )));
        }

        self.run(items, epsilon).await
    }

    fn clear(&self) -> UpdateOutcome {
        let sequence = self.next_sequence();
        self.publish(sequence, Arc::from(Vec::new()));
        log::debug!("cluster update #{}: no items, cleared", sequence);
        UpdateOutcome::Cleared { sequence }
    }

    async fn run(&self, items: &[T], epsilon: f64) -> UpdateOutcome {
        let sequence = self.next_sequence();
        let quantized = QuantizedPoints::build(items, self.config.precision_factor);
        let engine = Arc::clone(&self.engine);
        let min_points = self.config.min_points;

        log::debug!(
            "cluster update #{}: {} items, {} keys, eps={}",
            sequence,
            quantized.len(),
            quantized.key_count(),
            epsilon
        );

        let handle = tokio::task::spawn_blocking(move || {
            cluster_positions(engine.as_ref(), &quantized, epsilon, min_points)
        });

        let ClusterPass { clusters, missed } = match handle.await {
            Ok(Ok(pass)) => pass,
            Ok(Err(e)) => {
                log::warn!("cluster update #{} failed in engine: {}", sequence, e);
                return UpdateOutcome::Failed(ClusterError::Engine(e));
            }
            Err(e) => {
                log::warn!("cluster update #{} worker did not complete: {}", sequence, e);
                return UpdateOutcome::Failed(ClusterError::Worker(e.to_string()));
            }
        };

        if self.config.publish_order == PublishOrder::LatestIssued {
            let latest = self.last_published.load(Ordering::Acquire);
            if latest > sequence {
                log::debug!(
                    "cluster update #{} superseded by #{}, dropping result",
                    sequence,
                    latest
                );
                return UpdateOutcome::Superseded { sequence, latest };
            }
        }

        let list: ClusterList<T> = clusters
            .into_iter()
            .map(|cluster| cluster.map_members(|i| items[i].clone()))
            .collect();
        let report = PublishReport {
            sequence,
            epsilon,
            items: items.len(),
            clusters: list.len(),
            missed,
        };

        self.publish(sequence, list);
        log::debug!(
            "cluster update #{}: published {} clusters",
            sequence,
            report.clusters
        );
        UpdateOutcome::Published(report)
    }

    fn next_sequence(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn publish(&self, sequence: u64, list: ClusterList<T>) {
        self.last_published.fetch_max(sequence, Ordering::AcqRel);
        self.published.send_replace(list);
    }
}

impl<T: Clusterable + Clone> Default for ClusterManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ClusterManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterManager")
            .field("config", &self.config)
            .field("engine", &self.engine.name())
            .field("published", &self.published.borrow().len())
            .field("issued", &self.issued.load(Ordering::Relaxed))
            .finish()
    }
}
