//! `plan` command: select the next restack batch for each ASG in a snapshot

use crate::error::CliResult;
use crate::snapshot::SnapshotFile;
use clap::Args;
use rollout_selector::{
    plan_restack, InMemoryClusterState, KubeNodeMetadata, NodeMetadataSource, RestackPlan,
    RolloutConfig, StaticNodeMetadata,
};
use rollout_types::{MaxUnavailable, StrategyKind, UpgradeStrategy};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// ASG snapshot file (JSON, or YAML by extension)
    #[arg(short, long)]
    pub snapshot: PathBuf,

    /// Selection strategy (uniform-across-az, unconstrained)
    #[arg(long)]
    pub strategy: Option<StrategyKind>,

    /// Max unavailable nodes: a count or a percentage like 25%
    #[arg(long)]
    pub max_unavailable: Option<MaxUnavailable>,

    /// Instance IDs already mid-upgrade
    #[arg(long, value_delimiter = ',')]
    pub in_progress: Vec<String>,

    /// Read the in-progress set from cluster node annotations
    #[arg(long, conflicts_with = "in_progress")]
    pub from_cluster: bool,

    /// Print plans as JSON
    #[arg(long)]
    pub json: bool,
}

/// Effective strategy: command line first, then the snapshot file, then defaults
pub fn resolve_strategy(args: &PlanArgs, file: &SnapshotFile) -> UpgradeStrategy {
    let mut strategy = file.strategy.clone().unwrap_or_default();
    if let Some(kind) = args.strategy {
        strategy.kind = kind;
    }
    if let Some(max_unavailable) = &args.max_unavailable {
        strategy.max_unavailable = max_unavailable.clone();
    }
    strategy
}

pub async fn run(args: PlanArgs, config: &RolloutConfig) -> CliResult<()> {
    let file = SnapshotFile::load(&args.snapshot)?;
    let strategy = resolve_strategy(&args, &file);

    let metadata: Arc<dyn NodeMetadataSource> = if args.from_cluster {
        Arc::new(
            KubeNodeMetadata::try_default()
                .await?
                .with_annotation_key(config.selector.in_progress_annotation.clone()),
        )
    } else {
        Arc::new(StaticNodeMetadata::new(args.in_progress.iter().cloned()))
    };

    let state = Arc::new(InMemoryClusterState::new());
    for asg in &file.groups {
        state.init_from_snapshot(asg).await;
    }

    info!(
        groups = file.groups.len(),
        strategy = %strategy.kind,
        max_unavailable = %strategy.max_unavailable,
        "Planning restack"
    );

    let plans = plan_restack(
        file.groups,
        &strategy,
        metadata,
        state,
        config.selector.max_parallel,
    )
    .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        print!("{}", render(&plans));
    }
    Ok(())
}

fn render(plans: &[RestackPlan]) -> String {
    let mut out = String::new();
    for plan in plans {
        out.push_str(&format!(
            "{} ({}): {} instance(s)\n",
            plan.asg_name,
            plan.selector,
            plan.instances.len()
        ));
        for instance in &plan.instances {
            out.push_str(&format!(
                "  {}\t{}\n",
                instance.instance_id, instance.availability_zone
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollout_types::CloudInstance;

    fn args() -> PlanArgs {
        PlanArgs {
            snapshot: PathBuf::from("asg.json"),
            strategy: None,
            max_unavailable: None,
            in_progress: vec![],
            from_cluster: false,
            json: false,
        }
    }

    #[test]
    fn test_resolve_strategy_precedence() {
        let file = SnapshotFile {
            strategy: Some(UpgradeStrategy::uniform_across_az(MaxUnavailable::percent(20))),
            groups: vec![],
        };

        let strategy = resolve_strategy(&args(), &file);
        assert_eq!(strategy.kind, StrategyKind::UniformAcrossAz);
        assert_eq!(strategy.max_unavailable, MaxUnavailable::percent(20));

        let mut overridden = args();
        overridden.max_unavailable = Some(MaxUnavailable::Count(3));
        let strategy = resolve_strategy(&overridden, &file);
        assert_eq!(strategy.kind, StrategyKind::UniformAcrossAz);
        assert_eq!(strategy.max_unavailable, MaxUnavailable::Count(3));

        let strategy = resolve_strategy(&args(), &SnapshotFile::default());
        assert_eq!(strategy, UpgradeStrategy::default());
    }

    #[test]
    fn test_render() {
        let plans = vec![RestackPlan {
            asg_name: "workers".into(),
            selector: "unconstrained".into(),
            instances: vec![CloudInstance::new("i-1", "us-east-1a")],
        }];
        assert_eq!(
            render(&plans),
            "workers (unconstrained): 1 instance(s)\n  i-1\tus-east-1a\n"
        );
    }
}
