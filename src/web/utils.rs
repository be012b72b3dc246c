//! Web utility functions for response formatting

use crate::core::artifact_store::Artifact;
use crate::core::concrete::GeneratedNode;
use crate::core::node_kind::NodeKind;
use crate::web::types::{ArtifactSummary, KindInfo};

/// The full node kind catalog in declaration order
pub fn kind_catalog() -> Vec<KindInfo> {
    NodeKind::ALL
        .iter()
        .map(|kind| KindInfo {
            constant: kind.constant_name(),
            value: kind.as_str(),
        })
        .collect()
}

/// Top-level selection count; a request counts its normalization selections
pub fn selection_count(node: &GeneratedNode) -> usize {
    match node {
        GeneratedNode::Request(request) => request.operation.selections.len(),
        GeneratedNode::Fragment(fragment) => fragment.selections.len(),
        GeneratedNode::InlineDataFragment(_) => 0,
        GeneratedNode::SplitOperation(operation) => operation.selections.len(),
        GeneratedNode::UpdatableQuery(query) => query.fragment.selections.len(),
    }
}

pub fn summarize(artifact: &Artifact) -> ArtifactSummary {
    let node = &artifact.node;
    let params = node.as_request().map(|request| &request.params);

    ArtifactSummary {
        name: node.name().to_string(),
        kind: node.kind(),
        operation_kind: params.map(|params| params.operation_kind),
        cache_id: params.map(|params| params.cache_id().to_string()),
        selection_count: selection_count(node),
        source: artifact
            .source
            .as_ref()
            .map(|path| path.display().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::concrete::tests::profile_request_json;
    use crate::core::request_parameters::{OperationKind, compute_cache_id};
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_kind_catalog() {
        let catalog = kind_catalog();
        assert_eq!(catalog.len(), NodeKind::ALL.len());
        assert!(catalog.contains(&KindInfo {
            constant: "CLIENT_EDGE_TO_SERVER_OBJECT",
            value: "ClientEdgeToServerObject",
        }));
    }

    #[test]
    fn test_summarize_request() {
        let artifact = Artifact {
            node: GeneratedNode::from_value(profile_request_json()).unwrap(),
            source: Some(PathBuf::from("__generated__/ProfileQuery.graphql.json")),
        };

        let summary = summarize(&artifact);
        assert_eq!(summary.name, "ProfileQuery");
        assert_eq!(summary.kind, NodeKind::Request);
        assert_eq!(summary.operation_kind, Some(OperationKind::Query));
        assert_eq!(
            summary.cache_id.as_deref(),
            Some(compute_cache_id(crate::core::concrete::tests::PROFILE_TEXT).as_str())
        );
        assert_eq!(summary.selection_count, 1);
        assert_eq!(
            summary.source.as_deref(),
            Some("__generated__/ProfileQuery.graphql.json")
        );
    }

    #[test]
    fn test_summarize_inline_data_fragment() {
        let artifact = Artifact {
            node: GeneratedNode::from_value(json!({
                "kind": "InlineDataFragment",
                "name": "Story_data"
            }))
            .unwrap(),
            source: None,
        };

        let summary = summarize(&artifact);
        assert_eq!(summary.kind, NodeKind::InlineDataFragment);
        assert_eq!(summary.operation_kind, None);
        assert_eq!(summary.cache_id, None);
        assert_eq!(summary.selection_count, 0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            json!({"name": "Story_data", "kind": "InlineDataFragment", "selectionCount": 0})
        );
    }
}
