//! Live node metadata: which instances are currently mid-upgrade

use crate::error::MetadataError;
use crate::helpers::{upgrading_instance_ids, IN_PROGRESS_ANNOTATION_KEY};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::{api::ListParams, Api, Client};
use std::collections::HashSet;
use tracing::debug;

/// Source of the in-progress instance set
///
/// Queried once per selection cycle; results are never cached.
#[async_trait]
pub trait NodeMetadataSource: Send + Sync {
    async fn in_progress_instance_ids(&self) -> Result<HashSet<String>, MetadataError>;
}

/// Fixed in-progress set
#[derive(Debug, Clone, Default)]
pub struct StaticNodeMetadata {
    in_progress: HashSet<String>,
}

impl StaticNodeMetadata {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            in_progress: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NodeMetadataSource for StaticNodeMetadata {
    async fn in_progress_instance_ids(&self) -> Result<HashSet<String>, MetadataError> {
        Ok(self.in_progress.clone())
    }
}

/// Scans cluster nodes for the in-progress annotation
#[derive(Clone)]
pub struct KubeNodeMetadata {
    client: Client,
    annotation_key: String,
}

impl KubeNodeMetadata {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            annotation_key: IN_PROGRESS_ANNOTATION_KEY.to_string(),
        }
    }

    /// Use a non-default annotation key
    pub fn with_annotation_key(mut self, key: impl Into<String>) -> Self {
        self.annotation_key = key.into();
        self
    }

    /// Connect using the ambient kubeconfig or in-cluster service account
    pub async fn try_default() -> Result<Self, MetadataError> {
        Ok(Self::new(Client::try_default().await?))
    }
}

#[async_trait]
impl NodeMetadataSource for KubeNodeMetadata {
    async fn in_progress_instance_ids(&self) -> Result<HashSet<String>, MetadataError> {
        let api: Api<Node> = Api::all(self.client.clone());
        let nodes = api.list(&ListParams::default()).await?;

        let ids = upgrading_instance_ids(&nodes.items, &self.annotation_key);
        debug!(
            nodes = nodes.items.len(),
            in_progress = ids.len(),
            "Scanned nodes for in-progress annotation"
        );
        Ok(ids)
    }
}
