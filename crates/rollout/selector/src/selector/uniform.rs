//! Uniform-across-AZ selection
//!
//! Spreads upgrade concurrency evenly over availability zones so no single
//! zone is drained disproportionately.

use super::{fetch_in_progress, next_instances_in_group, NodeSelector};
use crate::helpers::order_in_progress_first;
use crate::max_unavailable;
use crate::metadata::NodeMetadataSource;
use crate::oracle::ProgressOracle;
use async_trait::async_trait;
use rollout_types::{AsgSnapshot, AzGroup, CloudInstance, MaxUnavailable};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Selector with one max-unavailable budget per availability zone
pub struct UniformAcrossAzSelector {
    asg: AsgSnapshot,
    /// Keyed by AZ name; only zones that currently have instances
    groups: BTreeMap<String, AzGroup>,
    metadata: Arc<dyn NodeMetadataSource>,
}

impl UniformAcrossAzSelector {
    pub fn new(
        asg: AsgSnapshot,
        policy: MaxUnavailable,
        metadata: Arc<dyn NodeMetadataSource>,
    ) -> Self {
        let mut totals: BTreeMap<String, u32> = BTreeMap::new();
        for instance in &asg.instances {
            *totals.entry(instance.availability_zone.clone()).or_default() += 1;
        }

        let groups = totals
            .into_iter()
            .map(|(az, total_nodes)| {
                let limit = max_unavailable::compute(&policy, total_nodes);
                info!(
                    asg = %asg.name,
                    az = %az,
                    total_nodes = total_nodes,
                    max_unavailable = limit,
                    "Max unavailable calculated"
                );
                let group = AzGroup {
                    availability_zone: az.clone(),
                    total_nodes,
                    max_unavailable: limit,
                };
                (az, group)
            })
            .collect();

        Self {
            asg,
            groups,
            metadata,
        }
    }

    /// Per-AZ groups computed at construction
    pub fn groups(&self) -> impl Iterator<Item = &AzGroup> {
        self.groups.values()
    }

    /// Upper bound on the size of one batch
    pub fn batch_limit(&self) -> u32 {
        self.groups.values().map(|g| g.max_unavailable).sum()
    }
}

#[async_trait]
impl NodeSelector for UniformAcrossAzSelector {
    async fn select_nodes_for_restack(&self, oracle: &dyn ProgressOracle) -> Vec<CloudInstance> {
        let in_progress = fetch_in_progress(self.metadata.as_ref(), &self.asg.name).await;

        let mut candidates = Vec::new();
        for (az, group) in &self.groups {
            let limit = group.max_unavailable;
            match next_instances_in_group(&self.asg, Some(az.as_str()), limit, oracle).await {
                Ok(batch) if batch.is_empty() => {
                    info!(asg = %self.asg.name, az = %az, "No instances available for update in AZ");
                }
                Ok(batch) => {
                    debug!(asg = %self.asg.name, az = %az, selected = batch.len(), "AZ candidates");
                    candidates.extend(batch);
                }
                Err(e) => {
                    warn!(
                        asg = %self.asg.name,
                        az = %az,
                        error = %e,
                        "Progress oracle unavailable, skipping AZ this cycle"
                    );
                }
            }
        }

        order_in_progress_first(candidates, &in_progress)
    }

    fn name(&self) -> &str {
        "uniform-across-az"
    }
}
