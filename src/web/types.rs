//! Shared type definitions for the web module

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::node_kind::NodeKind;
use crate::core::request_parameters::OperationKind;

/// One entry of the node kind catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindInfo {
    pub constant: &'static str,
    pub value: &'static str,
}

/// Listing entry for a loaded artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSummary {
    pub name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_kind: Option<OperationKind>,
    #[serde(rename = "cacheID", skip_serializing_if = "Option::is_none")]
    pub cache_id: Option<String>,
    pub selection_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CensusResponse {
    pub name: String,
    pub total: usize,
    pub counts: BTreeMap<NodeKind, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub artifacts: usize,
    pub load_errors: usize,
}
