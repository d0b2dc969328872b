//! Restack planning across several ASGs
//!
//! Each ASG gets its own selector; selectors share nothing but the read-only
//! collaborators, so they run concurrently up to `max_parallel`.

use crate::metadata::NodeMetadataSource;
use crate::oracle::ProgressOracle;
use crate::selector::create_selector;
use futures::stream::{self, StreamExt};
use rollout_types::{AsgSnapshot, CloudInstance, UpgradeStrategy};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Next batch for one ASG
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestackPlan {
    pub asg_name: String,
    pub selector: String,
    pub instances: Vec<CloudInstance>,
}

/// Select the next restack batch for every ASG in `groups`.
///
/// Plans come back sorted by ASG name.
pub async fn plan_restack(
    groups: Vec<AsgSnapshot>,
    strategy: &UpgradeStrategy,
    metadata: Arc<dyn NodeMetadataSource>,
    oracle: Arc<dyn ProgressOracle>,
    max_parallel: usize,
) -> Vec<RestackPlan> {
    let mut plans: Vec<RestackPlan> = stream::iter(groups)
        .map(|asg| {
            let asg_name = asg.name.clone();
            let zones = asg.zones().len();
            let selector = create_selector(asg, strategy, metadata.clone());
            let oracle = oracle.clone();
            async move {
                let instances = selector.select_nodes_for_restack(oracle.as_ref()).await;
                info!(
                    asg = %asg_name,
                    selector = selector.name(),
                    zones = zones,
                    selected = instances.len(),
                    "Restack batch selected"
                );
                RestackPlan {
                    asg_name,
                    selector: selector.name().to_string(),
                    instances,
                }
            }
        })
        .buffer_unordered(max_parallel.max(1))
        .collect()
        .await;

    plans.sort_by(|a, b| a.asg_name.cmp(&b.asg_name));
    plans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StaticNodeMetadata;
    use crate::oracle::InMemoryClusterState;
    use rollout_types::MaxUnavailable;

    fn groups() -> Vec<AsgSnapshot> {
        vec![
            AsgSnapshot::new(
                "workers-b",
                vec![
                    CloudInstance::new("b-1", "us-east-1a"),
                    CloudInstance::new("b-2", "us-east-1b"),
                ],
            ),
            AsgSnapshot::new(
                "workers-a",
                vec![
                    CloudInstance::new("a-1", "us-east-1a"),
                    CloudInstance::new("a-2", "us-east-1a"),
                    CloudInstance::new("a-3", "us-east-1b"),
                    CloudInstance::new("a-4", "us-east-1b"),
                ],
            ),
        ]
    }

    #[tokio::test]
    async fn test_plans_each_asg_independently() {
        let state = Arc::new(InMemoryClusterState::new());
        for asg in groups() {
            state.init_from_snapshot(&asg).await;
        }

        let plans = plan_restack(
            groups(),
            &UpgradeStrategy::uniform_across_az(MaxUnavailable::Count(1)),
            Arc::new(StaticNodeMetadata::new(["a-3"])),
            state,
            2,
        )
        .await;

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].asg_name, "workers-a");
        assert_eq!(plans[0].selector, "uniform-across-az");
        let a: Vec<_> = plans[0].instances.iter().map(|i| i.instance_id.as_str()).collect();
        assert_eq!(a, vec!["a-3", "a-1"]);
        let b: Vec<_> = plans[1].instances.iter().map(|i| i.instance_id.as_str()).collect();
        assert_eq!(b, vec!["b-1", "b-2"]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let plans = plan_restack(
            vec![],
            &UpgradeStrategy::default(),
            Arc::new(StaticNodeMetadata::empty()),
            Arc::new(InMemoryClusterState::new()),
            4,
        )
        .await;
        assert!(plans.is_empty());
    }
}
