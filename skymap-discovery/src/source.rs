use crate::dataset::DiscoveryDataset;
use crate::error::{DiscoveryError, Result};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info};

/// Anything that can produce a discovery dataset.
///
/// Sources are built by the caller and handed to the pipeline; nothing here
/// keeps process-wide client state.
pub trait ResourceSource {
    /// Short human-readable description, used in progress output.
    fn describe(&self) -> String;

    fn discover(&self) -> impl Future<Output = Result<DiscoveryDataset>> + Send;
}

/// Loads a dataset previously saved as JSON.
///
/// Both a bare dataset and a full inventory report (whose
/// `DiscoverySummary` holds the dataset) are accepted.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ResourceSource for SnapshotSource {
    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }

    async fn discover(&self) -> Result<DiscoveryDataset> {
        info!("Loading discovery snapshot from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_snapshot(&content)
    }
}

/// Parse snapshot text into a dataset.
pub fn parse_snapshot(content: &str) -> Result<DiscoveryDataset> {
    let mut value: Value = serde_json::from_str(content)?;

    let Some(object) = value.as_object_mut() else {
        return Err(DiscoveryError::InvalidSnapshot(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let embedded = ["DiscoverySummary", "discoverySummary", "discovery_summary"]
        .iter()
        .find_map(|key| object.remove(*key));

    let dataset = match embedded {
        Some(summary) => {
            debug!("Snapshot is a full report, using its discovery summary");
            serde_json::from_value(summary)?
        }
        None => serde_json::from_value(value)?,
    };

    Ok(dataset)
}

/// A dataset already held in memory.
pub struct StaticSource {
    dataset: DiscoveryDataset,
}

impl StaticSource {
    pub fn new(dataset: DiscoveryDataset) -> Self {
        Self { dataset }
    }
}

impl ResourceSource for StaticSource {
    fn describe(&self) -> String {
        "in-memory dataset".to_string()
    }

    async fn discover(&self) -> Result<DiscoveryDataset> {
        Ok(self.dataset.clone())
    }
}
