//! Snapshot file loading

use crate::error::CliResult;
use rollout_types::{AsgSnapshot, UpgradeStrategy};
use serde::Deserialize;
use std::path::Path;

/// Contents of a snapshot file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    /// Strategy to use when none is given on the command line
    #[serde(default)]
    pub strategy: Option<UpgradeStrategy>,

    /// ASG memberships to plan for
    #[serde(default)]
    pub groups: Vec<AsgSnapshot>,
}

impl SnapshotFile {
    /// Load from JSON, or YAML when the extension says so
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents, is_yaml(path))
    }

    pub fn parse(contents: &str, yaml: bool) -> CliResult<Self> {
        if yaml {
            Ok(serde_yaml::from_str(contents)?)
        } else {
            Ok(serde_json::from_str(contents)?)
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}
