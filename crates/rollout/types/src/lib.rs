//! Rollout Types - Core types for ASG rolling upgrades
//!
//! These types describe one upgrade run of an Auto Scaling Group: the
//! concurrency policy, the strategy used to pick nodes, and the read-only
//! snapshot of cloud instances the node selectors work against.
//!
//! ## Key Concepts
//!
//! - **MaxUnavailable**: absolute count or percentage of nodes that may be out
//!   of service at the same time
//! - **UpgradeStrategy**: the policy plus the selection strategy kind
//! - **AsgSnapshot**: the ASG membership fetched once per reconciliation cycle
//! - **AzGroup**: per-availability-zone aggregation built from a snapshot

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod instance;
pub mod strategy;

pub use instance::{AsgSnapshot, AzGroup, CloudInstance};
pub use strategy::{MaxUnavailable, StrategyKind, StrategyParseError, UpgradeStrategy};
