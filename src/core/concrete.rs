//! Top-level compiled artifacts and the closed union of everything a compiler emits

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use crate::core::error::ArtifactError;
use crate::core::node_kind::{NodeKind, kind_tag};
use crate::core::normalization::{NormalizationOperation, NormalizationSplitOperation};
use crate::core::reader::{ReaderFragment, ReaderInlineDataFragment};
use crate::core::request_parameters::RequestParameters;

kind_tag!(RequestTag, "Request");
kind_tag!(UpdatableQueryTag, "UpdatableQuery");
kind_tag!(PreloadableTag, "PreloadableConcreteRequest");

/// An executable request: `operation` normalizes the response, `fragment` reads it
/// back while masking data owned by child fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteRequest {
    pub kind: RequestTag,
    pub fragment: ReaderFragment,
    pub operation: NormalizationOperation,
    pub params: RequestParameters,
}

impl ConcreteRequest {
    pub fn new(
        fragment: ReaderFragment,
        operation: NormalizationOperation,
        params: RequestParameters,
    ) -> Self {
        Self {
            kind: RequestTag,
            fragment,
            operation,
            params,
        }
    }

    /// Handle carrying only the parameters, typed for the operation `Q`
    pub fn preloadable<Q: OperationType>(&self) -> PreloadableConcreteRequest<Q> {
        PreloadableConcreteRequest::new(self.params.clone())
    }
}

/// Variables and response shapes of one operation, known at compile time
pub trait OperationType {
    type Variables: Serialize;
    type Response: DeserializeOwned;
}

/// The minimal information needed to identify and execute a request.
///
/// `Q` only ties a preload call site to the operation it expects; no value of it is
/// ever stored.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PreloadableConcreteRequest<Q> {
    pub kind: PreloadableTag,
    pub params: RequestParameters,
    #[serde(skip)]
    operation: PhantomData<fn() -> Q>,
}

impl<Q> PreloadableConcreteRequest<Q> {
    pub fn new(params: RequestParameters) -> Self {
        Self {
            kind: PreloadableTag,
            params,
            operation: PhantomData,
        }
    }
}

impl<Q> Clone for PreloadableConcreteRequest<Q> {
    fn clone(&self) -> Self {
        Self::new(self.params.clone())
    }
}

impl<Q> fmt::Debug for PreloadableConcreteRequest<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreloadableConcreteRequest")
            .field("params", &self.params)
            .finish()
    }
}

impl<Q> PartialEq for PreloadableConcreteRequest<Q> {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
    }
}

/// Read model for client-side updates of query data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteUpdatableQuery {
    pub kind: UpdatableQueryTag,
    pub fragment: ReaderFragment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedNode {
    Request(ConcreteRequest),
    Fragment(ReaderFragment),
    InlineDataFragment(ReaderInlineDataFragment),
    SplitOperation(NormalizationSplitOperation),
    UpdatableQuery(ConcreteUpdatableQuery),
}

impl GeneratedNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            GeneratedNode::Request(_) => NodeKind::Request,
            GeneratedNode::Fragment(_) => NodeKind::Fragment,
            GeneratedNode::InlineDataFragment(_) => NodeKind::InlineDataFragment,
            GeneratedNode::SplitOperation(_) => NodeKind::SplitOperation,
            GeneratedNode::UpdatableQuery(_) => NodeKind::UpdatableQuery,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            GeneratedNode::Request(request) => &request.params.name,
            GeneratedNode::Fragment(fragment) => &fragment.name,
            GeneratedNode::InlineDataFragment(fragment) => &fragment.name,
            GeneratedNode::SplitOperation(operation) => &operation.name,
            GeneratedNode::UpdatableQuery(query) => &query.fragment.name,
        }
    }

    pub fn as_request(&self) -> Option<&ConcreteRequest> {
        match self {
            GeneratedNode::Request(request) => Some(request),
            _ => None,
        }
    }

    /// Decode an artifact, checking the `kind` discriminant before the shape
    pub fn from_value(value: Value) -> Result<Self, ArtifactError> {
        let kind: NodeKind = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(ArtifactError::MissingKind)?
            .parse()?;

        let shape_error = |source| ArtifactError::Shape { kind, source };
        match kind {
            NodeKind::Request => serde_json::from_value(value)
                .map(GeneratedNode::Request)
                .map_err(shape_error),
            NodeKind::Fragment => serde_json::from_value(value)
                .map(GeneratedNode::Fragment)
                .map_err(shape_error),
            NodeKind::InlineDataFragment => serde_json::from_value(value)
                .map(GeneratedNode::InlineDataFragment)
                .map_err(shape_error),
            NodeKind::SplitOperation => serde_json::from_value(value)
                .map(GeneratedNode::SplitOperation)
                .map_err(shape_error),
            NodeKind::UpdatableQuery => serde_json::from_value(value)
                .map(GeneratedNode::UpdatableQuery)
                .map_err(shape_error),
            other => Err(ArtifactError::NotAGeneratedNode(other)),
        }
    }

    pub fn from_json(content: &str, path: &Path) -> Result<Self, ArtifactError> {
        let value = serde_json::from_str(content).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value)
    }
}

impl<'de> Deserialize<'de> for GeneratedNode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        GeneratedNode::from_value(value).map_err(serde::de::Error::custom)
    }
}
