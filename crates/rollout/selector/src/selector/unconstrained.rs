//! Unconstrained selection: the whole ASG is one pool

use super::{fetch_in_progress, next_instances_in_group, NodeSelector};
use crate::helpers::order_in_progress_first;
use crate::max_unavailable;
use crate::metadata::NodeMetadataSource;
use crate::oracle::ProgressOracle;
use async_trait::async_trait;
use rollout_types::{AsgSnapshot, CloudInstance, MaxUnavailable};
use std::sync::Arc;
use tracing::{info, warn};

/// Selector with a single max-unavailable budget for the whole ASG
pub struct UnconstrainedSelector {
    asg: AsgSnapshot,
    max_unavailable: u32,
    metadata: Arc<dyn NodeMetadataSource>,
}

impl UnconstrainedSelector {
    pub fn new(
        asg: AsgSnapshot,
        policy: MaxUnavailable,
        metadata: Arc<dyn NodeMetadataSource>,
    ) -> Self {
        let total_nodes = asg.len() as u32;
        let max_unavailable = max_unavailable::compute(&policy, total_nodes);
        info!(
            asg = %asg.name,
            total_nodes = total_nodes,
            max_unavailable = max_unavailable,
            "Max unavailable calculated"
        );
        Self {
            asg,
            max_unavailable,
            metadata,
        }
    }

    pub fn max_unavailable(&self) -> u32 {
        self.max_unavailable
    }
}

#[async_trait]
impl NodeSelector for UnconstrainedSelector {
    async fn select_nodes_for_restack(&self, oracle: &dyn ProgressOracle) -> Vec<CloudInstance> {
        let in_progress = fetch_in_progress(self.metadata.as_ref(), &self.asg.name).await;

        let candidates =
            match next_instances_in_group(&self.asg, None, self.max_unavailable, oracle).await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(asg = %self.asg.name, error = %e, "Progress oracle unavailable");
                    Vec::new()
                }
            };

        if candidates.is_empty() {
            info!(asg = %self.asg.name, "No instances available for update");
        }

        order_in_progress_first(candidates, &in_progress)
    }

    fn name(&self) -> &str {
        "unconstrained"
    }
}
