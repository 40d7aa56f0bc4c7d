use crate::analysis::analyze_infrastructure;
use crate::graph::{MalformedInputError, build_graph};
use crate::report::{InventoryReport, sections};
use indicatif::{ProgressBar, ProgressStyle};
use skymap_discovery::{DiscoveryDataset, DiscoveryError, ProgressCallback, ResourceSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),
}

/// Spinner shown while a source enumerates resources.
///
/// Hidden when progress output is disabled; all methods are then no-ops.
pub struct DiscoveryProgress {
    bar: Option<ProgressBar>,
    calls: Arc<AtomicUsize>,
}

impl DiscoveryProgress {
    pub fn new(show_progress_bars: bool) -> Self {
        let bar = show_progress_bars.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        });
        Self {
            bar,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Callback for sources that report each listing call.
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        let calls = self.calls.clone();
        Arc::new(move |call: &str| {
            let count = calls.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = bar {
                pb.set_message(format!("[{}] {}", count, call));
                pb.tick();
            }
        })
    }

    /// Number of listing calls reported so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn start(&self, description: &str) {
        if let Some(ref pb) = self.bar {
            pb.set_message(format!("Discovering resources via {}...", description));
            pb.enable_steady_tick(Duration::from_millis(100));
        }
    }

    fn finish(&self, message: String) {
        if let Some(ref pb) = self.bar {
            pb.finish_with_message(message);
        }
    }

    fn abandon(&self, message: String) {
        if let Some(ref pb) = self.bar {
            pb.abandon_with_message(message);
        }
    }
}

/// Run a source once and log what it found.
pub async fn execute_discovery<S: ResourceSource>(
    source: &S,
    progress: &DiscoveryProgress,
) -> Result<DiscoveryDataset, DiscoveryError> {
    let description = source.describe();
    progress.start(&description);

    let dataset = match source.discover().await {
        Ok(dataset) => dataset,
        Err(e) => {
            progress.abandon(format!("Discovery via {} failed", description));
            return Err(e);
        }
    };

    for section in sections(&dataset) {
        info!("{}: {}", section.title(), section.resource_count());
    }
    if !dataset.extra.is_empty() {
        info!(
            "Passing through {} unrecognised categories: {}",
            dataset.extra.len(),
            dataset.extra.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    progress.finish(format!(
        "Discovery complete! {} resources found",
        dataset.resource_count()
    ));
    Ok(dataset)
}

/// Graph and adjacency analysis over a dataset. The dataset is moved into
/// the report unchanged.
pub fn build_report(dataset: DiscoveryDataset) -> Result<InventoryReport, MalformedInputError> {
    let graph_structure = build_graph(&dataset)?;
    let analysis_report = analyze_infrastructure(&graph_structure.edges);

    info!(
        "Graph: {} nodes, {} edges, {} referencing resources",
        graph_structure.node_count(),
        graph_structure.edge_count(),
        analysis_report.len()
    );

    Ok(InventoryReport {
        discovery_summary: dataset,
        graph_structure,
        analysis_report,
    })
}

/// Discovery followed by analysis; any failure fails the whole run.
pub async fn run_inventory<S: ResourceSource>(
    source: &S,
    progress: &DiscoveryProgress,
) -> Result<InventoryReport, InventoryError> {
    let dataset = execute_discovery(source, progress).await?;
    Ok(build_report(dataset)?)
}
