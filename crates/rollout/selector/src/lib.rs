//! Rollout Selector - Node selection for ASG rolling upgrades
//!
//! Given an ASG snapshot, an upgrade strategy, and the live progress of an
//! in-flight upgrade, decides which instances to act on next without
//! exceeding the max-unavailable bound.
//!
//! ## Architectural Boundaries
//!
//! - `rollout-selector` owns: max-unavailable math, per-AZ budgeting, batch ordering
//! - the progress store owns: which instance is next, and upgrade state
//! - the execution stage owns: draining and terminating the selected instances
//!
//! The selector only reads from its collaborators. All mutation of upgrade
//! progress happens after the batch has been handed back.
//!
//! ## Usage
//!
//! ```no_run
//! use rollout_selector::{create_selector, InMemoryClusterState, NodeSelector, StaticNodeMetadata};
//! use rollout_types::{AsgSnapshot, CloudInstance, MaxUnavailable, UpgradeStrategy};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let asg = AsgSnapshot::new(
//!     "workers",
//!     vec![
//!         CloudInstance::new("i-1", "us-east-1a"),
//!         CloudInstance::new("i-2", "us-east-1b"),
//!     ],
//! );
//! let state = InMemoryClusterState::new();
//! state.init_from_snapshot(&asg).await;
//!
//! let strategy = UpgradeStrategy::uniform_across_az(MaxUnavailable::percent(50));
//! let selector = create_selector(asg, &strategy, Arc::new(StaticNodeMetadata::empty()));
//! let batch = selector.select_nodes_for_restack(&state).await;
//! # let _ = batch;
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod helpers;
pub mod max_unavailable;
pub mod metadata;
pub mod oracle;
pub mod planner;
pub mod selector;

// Re-exports
pub use config::{LoggingConfig, RolloutConfig, SelectorConfig};
pub use error::{ConfigError, MetadataError, OracleError};
pub use metadata::{KubeNodeMetadata, NodeMetadataSource, StaticNodeMetadata};
pub use oracle::{InMemoryClusterState, InstanceUpgradeState, ProgressOracle};
pub use planner::{plan_restack, RestackPlan};
pub use selector::{create_selector, NodeSelector, UnconstrainedSelector, UniformAcrossAzSelector};
