//! Cloud instance and ASG membership types
//!
//! A snapshot is fetched once per reconciliation cycle and treated as
//! read-only for the rest of that cycle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A cloud instance backing one node of an ASG
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudInstance {
    /// Instance identifier, unique within an ASG
    pub instance_id: String,

    /// Availability zone the instance runs in
    pub availability_zone: String,
}

impl CloudInstance {
    pub fn new(instance_id: impl Into<String>, availability_zone: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            availability_zone: availability_zone.into(),
        }
    }

    /// Provider identity the node registers with, e.g. `aws:///us-east-1a/i-0abc`
    pub fn provider_id(&self) -> String {
        format!("aws:///{}/{}", self.availability_zone, self.instance_id)
    }
}

/// Membership of one Auto Scaling Group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsgSnapshot {
    /// ASG name
    pub name: String,

    /// Current instances
    #[serde(default)]
    pub instances: Vec<CloudInstance>,
}

impl AsgSnapshot {
    pub fn new(name: impl Into<String>, instances: Vec<CloudInstance>) -> Self {
        Self {
            name: name.into(),
            instances,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Look up an instance by ID
    pub fn find(&self, instance_id: &str) -> Option<&CloudInstance> {
        self.instances.iter().find(|i| i.instance_id == instance_id)
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.find(instance_id).is_some()
    }

    /// Distinct availability zones among current members, sorted
    pub fn zones(&self) -> BTreeSet<&str> {
        self.instances
            .iter()
            .map(|i| i.availability_zone.as_str())
            .collect()
    }
}

/// Per-AZ aggregation derived from a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzGroup {
    /// Availability zone name
    pub availability_zone: String,

    /// Number of ASG instances in this AZ
    pub total_nodes: u32,

    /// How many of them may be unavailable at once
    pub max_unavailable: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AsgSnapshot {
        AsgSnapshot::new(
            "workers",
            vec![
                CloudInstance::new("i-1", "us-east-1a"),
                CloudInstance::new("i-2", "us-east-1b"),
                CloudInstance::new("i-3", "us-east-1a"),
            ],
        )
    }

    #[test]
    fn test_provider_id() {
        let instance = CloudInstance::new("i-0abc", "us-west-2c");
        assert_eq!(instance.provider_id(), "aws:///us-west-2c/i-0abc");
    }

    #[test]
    fn test_snapshot_lookup() {
        let asg = snapshot();
        assert_eq!(asg.len(), 3);
        assert!(asg.contains("i-2"));
        assert!(!asg.contains("i-9"));
        assert_eq!(asg.find("i-3").unwrap().availability_zone, "us-east-1a");
    }

    #[test]
    fn test_zones_are_distinct() {
        let asg = snapshot();
        let zones: Vec<_> = asg.zones().into_iter().collect();
        assert_eq!(zones, vec!["us-east-1a", "us-east-1b"]);
    }

    #[test]
    fn test_snapshot_deserializes() {
        let asg: AsgSnapshot = serde_json::from_str(
            r#"{"name":"workers","instances":[{"instanceId":"i-1","availabilityZone":"us-east-1a"}]}"#,
        )
        .unwrap();
        assert_eq!(asg.instances, vec![CloudInstance::new("i-1", "us-east-1a")]);
    }
}
