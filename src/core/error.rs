//! Errors raised while decoding and indexing compiled artifacts

use std::path::PathBuf;
use thiserror::Error;

use crate::core::node_kind::{NodeKind, UnknownNodeKind};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Artifact is missing a string `kind` field")]
    MissingKind,

    #[error(transparent)]
    UnknownKind(#[from] UnknownNodeKind),

    #[error("Kind `{0}` cannot appear at the root of an artifact")]
    NotAGeneratedNode(NodeKind),

    #[error("Malformed `{kind}` artifact: {source}")]
    Shape {
        kind: NodeKind,
        source: serde_json::Error,
    },

    #[error("Duplicate artifact name: {0}")]
    DuplicateArtifact(String),

    #[error("Failed to serialize operation variables: {0}")]
    Variables(#[source] serde_json::Error),

    #[error("Operation variables must serialize to a JSON object")]
    VariablesNotAnObject,

    #[error("No provider registered for module '{module}' (variable '{variable}')")]
    MissingProvidedVariable { variable: String, module: String },
}
