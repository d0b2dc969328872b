//! Upgrade progress oracle
//!
//! The selectors ask the oracle which instance, if any, is next in line for
//! an ASG (optionally restricted to one AZ). The oracle owns the cursor: each
//! call hands out a different instance until none remain.

use crate::error::OracleError;
use async_trait::async_trait;
use rollout_types::AsgSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Read interface over persisted per-instance upgrade progress
#[async_trait]
pub trait ProgressOracle: Send + Sync {
    /// Next instance of `asg_name` eligible for upgrade, or `None` once the
    /// pool is exhausted. `az = None` treats the whole ASG as one pool.
    async fn next_eligible_instance(
        &self,
        asg_name: &str,
        az: Option<&str>,
    ) -> Result<Option<String>, OracleError>;
}

/// Upgrade state of one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceUpgradeState {
    /// Waiting to be picked
    ToBeUpdated,
    /// Handed out by the oracle, not yet acted on
    UpdateInitiated,
    /// Drain/terminate under way
    UpdateInProgress,
    /// Done
    UpdateCompleted,
}

#[derive(Debug, Clone)]
struct TrackedInstance {
    asg_name: String,
    availability_zone: String,
    state: InstanceUpgradeState,
}

/// In-memory cluster state used as a progress oracle
///
/// Instances are handed out in instance-ID order. Handing one out moves it
/// to `UpdateInitiated` so it is not picked again.
#[derive(Debug, Default)]
pub struct InMemoryClusterState {
    instances: RwLock<BTreeMap<String, TrackedInstance>>,
}

impl InMemoryClusterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track every member of `asg` not already known
    pub async fn init_from_snapshot(&self, asg: &AsgSnapshot) {
        let mut instances = self.instances.write().await;
        for instance in &asg.instances {
            instances
                .entry(instance.instance_id.clone())
                .or_insert_with(|| TrackedInstance {
                    asg_name: asg.name.clone(),
                    availability_zone: instance.availability_zone.clone(),
                    state: InstanceUpgradeState::ToBeUpdated,
                });
        }
        debug!(asg = %asg.name, tracked = instances.len(), "Cluster state initialized");
    }

    pub async fn state_of(&self, instance_id: &str) -> Option<InstanceUpgradeState> {
        self.instances
            .read()
            .await
            .get(instance_id)
            .map(|tracked| tracked.state)
    }

    pub async fn mark_update_in_progress(&self, instance_id: &str) -> Result<(), OracleError> {
        self.set_state(instance_id, InstanceUpgradeState::UpdateInProgress)
            .await
    }

    pub async fn mark_update_completed(&self, instance_id: &str) -> Result<(), OracleError> {
        self.set_state(instance_id, InstanceUpgradeState::UpdateCompleted)
            .await
    }

    /// True once every tracked instance of `asg_name` has completed
    pub async fn is_asg_complete(&self, asg_name: &str) -> bool {
        self.instances
            .read()
            .await
            .values()
            .filter(|tracked| tracked.asg_name == asg_name)
            .all(|tracked| tracked.state == InstanceUpgradeState::UpdateCompleted)
    }

    /// Forget everything tracked for `asg_name`
    pub async fn delete_asg(&self, asg_name: &str) {
        self.instances
            .write()
            .await
            .retain(|_, tracked| tracked.asg_name != asg_name);
    }

    async fn set_state(
        &self,
        instance_id: &str,
        state: InstanceUpgradeState,
    ) -> Result<(), OracleError> {
        let mut instances = self.instances.write().await;
        let tracked = instances
            .get_mut(instance_id)
            .ok_or_else(|| OracleError::UnknownInstance(instance_id.to_string()))?;
        tracked.state = state;
        Ok(())
    }
}

#[async_trait]
impl ProgressOracle for InMemoryClusterState {
    async fn next_eligible_instance(
        &self,
        asg_name: &str,
        az: Option<&str>,
    ) -> Result<Option<String>, OracleError> {
        let mut instances = self.instances.write().await;
        let next = instances.iter_mut().find(|(_, tracked)| {
            tracked.asg_name == asg_name
                && tracked.state == InstanceUpgradeState::ToBeUpdated
                && az.map_or(true, |az| tracked.availability_zone == az)
        });

        Ok(next.map(|(instance_id, tracked)| {
            tracked.state = InstanceUpgradeState::UpdateInitiated;
            instance_id.clone()
        }))
    }
}
