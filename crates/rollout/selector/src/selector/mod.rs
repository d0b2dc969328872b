//! Node selection strategies
//!
//! A selector is built fresh for every reconciliation cycle from the ASG
//! snapshot of that cycle, asked once for the next restack batch, and
//! dropped. It holds no state across cycles.

pub mod unconstrained;
pub mod uniform;

pub use unconstrained::UnconstrainedSelector;
pub use uniform::UniformAcrossAzSelector;

use crate::error::OracleError;
use crate::helpers::contains_id;
use crate::metadata::NodeMetadataSource;
use crate::oracle::ProgressOracle;
use async_trait::async_trait;
use rollout_types::{AsgSnapshot, CloudInstance, StrategyKind, UpgradeStrategy};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Picks the instances to act on next
#[async_trait]
pub trait NodeSelector: Send + Sync {
    /// Ordered batch for this cycle: instances already mid-upgrade first,
    /// then new ones. Never fails; upstream trouble shrinks the batch.
    async fn select_nodes_for_restack(&self, oracle: &dyn ProgressOracle) -> Vec<CloudInstance>;

    /// Selector name for logging
    fn name(&self) -> &str;
}

/// Factory for node selectors
///
/// Unknown strategy kinds fall back to the unconstrained selector.
pub fn create_selector(
    asg: AsgSnapshot,
    strategy: &UpgradeStrategy,
    metadata: Arc<dyn NodeMetadataSource>,
) -> Box<dyn NodeSelector> {
    match strategy.kind {
        StrategyKind::UniformAcrossAz => Box::new(UniformAcrossAzSelector::new(
            asg,
            strategy.max_unavailable.clone(),
            metadata,
        )),
        StrategyKind::Unconstrained | StrategyKind::Unknown => Box::new(
            UnconstrainedSelector::new(asg, strategy.max_unavailable.clone(), metadata),
        ),
    }
}

/// Current in-progress set; an unreachable source counts as empty
pub(crate) async fn fetch_in_progress(
    metadata: &dyn NodeMetadataSource,
    asg_name: &str,
) -> HashSet<String> {
    match metadata.in_progress_instance_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            warn!(asg = %asg_name, error = %e, "Could not get upgrading instances");
            HashSet::new()
        }
    }
}

/// Ask the oracle for up to `limit` instances of `asg` in `az`.
///
/// Oracle answers that are not current members of the group are skipped and
/// do not use up a slot. A repeated answer ends the scan.
pub(crate) async fn next_instances_in_group(
    asg: &AsgSnapshot,
    az: Option<&str>,
    limit: u32,
    oracle: &dyn ProgressOracle,
) -> Result<Vec<CloudInstance>, OracleError> {
    let mut selected = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    while (selected.len() as u32) < limit {
        let instance_id = match oracle.next_eligible_instance(&asg.name, az).await? {
            Some(id) if !id.is_empty() => id,
            _ => break,
        };

        if contains_id(&seen, &instance_id) {
            warn!(
                asg = %asg.name,
                az = az.unwrap_or("*"),
                instance_id = %instance_id,
                "Oracle repeated an instance, ending scan"
            );
            break;
        }
        seen.push(instance_id.clone());

        match asg.find(&instance_id) {
            Some(instance) if az.map_or(true, |az| instance.availability_zone == az) => {
                selected.push(instance.clone());
            }
            Some(instance) => {
                debug!(
                    asg = %asg.name,
                    instance_id = %instance_id,
                    expected_az = az.unwrap_or("*"),
                    actual_az = %instance.availability_zone,
                    "Dropping instance from another AZ"
                );
            }
            None => {
                debug!(
                    asg = %asg.name,
                    instance_id = %instance_id,
                    "Dropping instance no longer in ASG"
                );
            }
        }
    }

    Ok(selected)
}
