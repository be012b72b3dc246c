//! Index of compiled artifacts loaded from disk or a remote endpoint

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::concrete::GeneratedNode;
use crate::core::error::ArtifactError;
use crate::core::node_kind::NodeKind;
use crate::core::visitor;

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub node: GeneratedNode,
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub artifact: String,
    pub severity: Severity,
    pub message: String,
}

/// A file or payload entry that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadError {
    pub source: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    artifacts: BTreeMap<String, Artifact>,
    load_errors: Vec<LoadError>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` file under `dir`, recursively.
    ///
    /// Files that fail to decode are kept as load errors rather than failing the load.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let mut files = collect_json_files(dir)?;
        files.sort();

        let mut store = Self::new();
        for path in files {
            let loaded = fs::read_to_string(&path)
                .map_err(|source| ArtifactError::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|content| GeneratedNode::from_json(&content, &path));

            match loaded.and_then(|node| store.insert(node, Some(path.clone()))) {
                Ok(()) => debug!(path = %path.display(), "loaded artifact"),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping artifact");
                    store.load_errors.push(LoadError {
                        source: path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(store)
    }

    pub fn from_nodes(
        nodes: impl IntoIterator<Item = GeneratedNode>,
    ) -> Result<Self, ArtifactError> {
        let mut store = Self::new();
        for node in nodes {
            store.insert(node, None)?;
        }
        Ok(store)
    }

    pub fn insert(
        &mut self,
        node: GeneratedNode,
        source: Option<PathBuf>,
    ) -> Result<(), ArtifactError> {
        let name = node.name().to_string();
        if self.artifacts.contains_key(&name) {
            return Err(ArtifactError::DuplicateArtifact(name));
        }
        self.artifacts.insert(name, Artifact { node, source });
        Ok(())
    }

    pub fn record_load_error(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.load_errors.push(LoadError {
            source: source.into(),
            message: message.into(),
        });
    }

    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn load_errors(&self) -> &[LoadError] {
        &self.load_errors
    }

    fn has_kind(&self, name: &str, kind: NodeKind) -> bool {
        self.get(name).is_some_and(|artifact| artifact.node.kind() == kind)
    }

    /// Cross-reference problems between loaded artifacts, errors first
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .load_errors
            .iter()
            .map(|error| Diagnostic {
                artifact: error.source.clone(),
                severity: Severity::Error,
                message: error.message.clone(),
            })
            .collect();

        for artifact in self.iter() {
            let name = artifact.node.name();
            let mut report = |severity, message: String| {
                diagnostics.push(Diagnostic {
                    artifact: name.to_string(),
                    severity,
                    message,
                })
            };

            let references = visitor::references(&artifact.node);
            for fragment in &references.fragments {
                // Inline data fragments are read through their own spread kind, never by name
                if !self.has_kind(fragment, NodeKind::Fragment) {
                    report(Severity::Error, format!("Spreads unknown fragment '{fragment}'"));
                }
            }
            for split in &references.split_operations {
                if !self.has_kind(split, NodeKind::SplitOperation) {
                    report(Severity::Warning, format!("Missing split operation '{split}'"));
                }
            }
            for operation in &references.operations {
                if !self.has_kind(operation, NodeKind::Request) {
                    report(
                        Severity::Error,
                        format!("Client edge fetches unknown request '{operation}'"),
                    );
                }
            }

            if let GeneratedNode::Request(request) = &artifact.node {
                let params_name = &request.params.name;
                if &request.operation.name != params_name || &request.fragment.name != params_name {
                    report(
                        Severity::Warning,
                        format!(
                            "Request names disagree: params '{}', fragment '{}', operation '{}'",
                            params_name, request.fragment.name, request.operation.name
                        ),
                    );
                }
            }
        }

        diagnostics.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.artifact.cmp(&b.artifact))
        });
        diagnostics
    }
}

fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>, ArtifactError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ArtifactError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        // Links are not descended into, a linked file is still read
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if is_json && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
