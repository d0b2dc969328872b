//! Small helpers shared by the selectors and metadata sources

use k8s_openapi::api::core::v1::Node;
use rollout_types::CloudInstance;
use std::collections::HashSet;

/// Annotation the execution stage puts on nodes whose instance is mid-upgrade
pub const IN_PROGRESS_ANNOTATION_KEY: &str = "upgrademgr.keikoproj.io/in-progress";

/// Extract the instance ID from a provider identity such as
/// `aws:///us-east-1a/i-0abc`. Identities without a slash come back whole.
pub fn instance_id_from_provider_id(provider_id: &str) -> &str {
    provider_id.rsplit('/').next().unwrap_or(provider_id)
}

/// Linear membership test
pub fn contains_id<S: AsRef<str>>(list: &[S], id: &str) -> bool {
    list.iter().any(|candidate| candidate.as_ref() == id)
}

/// Stable partition: instances already mid-upgrade go first, everything else
/// follows. Relative scan order is kept within both halves.
pub fn order_in_progress_first(
    candidates: Vec<CloudInstance>,
    in_progress: &HashSet<String>,
) -> Vec<CloudInstance> {
    let (mut ordered, rest): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|instance| in_progress.contains(&instance.instance_id));
    ordered.extend(rest);
    ordered
}

/// Instance IDs of nodes carrying `annotation_key: "true"`
pub fn upgrading_instance_ids<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    annotation_key: &str,
) -> HashSet<String> {
    nodes
        .into_iter()
        .filter(|node| {
            node.metadata
                .annotations
                .as_ref()
                .and_then(|annotations| annotations.get(annotation_key))
                .is_some_and(|value| value == "true")
        })
        .filter_map(|node| node.spec.as_ref()?.provider_id.as_deref())
        .map(|provider_id| instance_id_from_provider_id(provider_id).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::NodeSpec;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn node(provider_id: Option<&str>, in_progress: Option<&str>) -> Node {
        let annotations = in_progress.map(|value| {
            BTreeMap::from([(IN_PROGRESS_ANNOTATION_KEY.to_string(), value.to_string())])
        });
        Node {
            metadata: ObjectMeta {
                annotations,
                ..Default::default()
            },
            spec: Some(NodeSpec {
                provider_id: provider_id.map(str::to_string),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_instance_id_from_provider_id() {
        assert_eq!(
            instance_id_from_provider_id("aws:///us-east-1a/i-0abc123"),
            "i-0abc123"
        );
        assert_eq!(instance_id_from_provider_id("i-0abc123"), "i-0abc123");
        assert_eq!(instance_id_from_provider_id("aws:///us-east-1a/"), "");
    }

    #[test]
    fn test_contains_id() {
        let list = vec!["i-1".to_string(), "i-2".to_string()];
        assert!(contains_id(&list, "i-2"));
        assert!(!contains_id(&list, "i-3"));
        assert!(!contains_id::<&str>(&[], "i-1"));
    }

    #[test]
    fn test_order_in_progress_first() {
        let candidates = ["A", "B", "C", "D"]
            .iter()
            .map(|id| CloudInstance::new(*id, "us-east-1a"))
            .collect();
        let in_progress: HashSet<String> = ["A", "C"].iter().map(|s| s.to_string()).collect();

        let ordered: Vec<_> = order_in_progress_first(candidates, &in_progress)
            .into_iter()
            .map(|i| i.instance_id)
            .collect();
        assert_eq!(ordered, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_provider_id_maps_back_to_instance() {
        let instance = CloudInstance::new("i-0abc123", "eu-west-1b");
        assert_eq!(
            instance_id_from_provider_id(&instance.provider_id()),
            instance.instance_id
        );
    }

    #[test]
    fn test_upgrading_instance_ids() {
        let a = CloudInstance::new("i-1", "us-east-1a").provider_id();
        let b = CloudInstance::new("i-2", "us-east-1b").provider_id();
        let c = CloudInstance::new("i-3", "us-east-1c").provider_id();
        let nodes = vec![
            node(Some(&a), Some("true")),
            node(Some(&b), Some("false")),
            node(Some(&c), None),
            node(None, Some("true")),
        ];

        let ids = upgrading_instance_ids(&nodes, IN_PROGRESS_ANNOTATION_KEY);
        assert_eq!(ids, HashSet::from(["i-1".to_string()]));
    }
}
