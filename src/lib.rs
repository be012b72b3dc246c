//! Relay Artifacts Library
//!
//! Typed model of the artifacts a Relay-style GraphQL compiler emits (requests,
//! fragments, split operations, updatable queries), plus a small backend that loads
//! them and serves inspection and request-payload endpoints.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub mod core;
pub mod web;

use crate::core::artifact_client::ArtifactClient;
use crate::core::artifact_store::ArtifactStore;
use crate::core::provided_variables::ProvidedVariableRegistry;

/// Where compiled artifacts are loaded from
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum ArtifactSource {
    #[value(name = "local-dir", help = "Read *.json artifacts from a local directory")]
    LocalDir,
    #[value(name = "remote", help = "Fetch artifacts from a remote endpoint")]
    Remote,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(value_enum, default_value = "local-dir")]
    pub source: ArtifactSource,
    #[arg(value_name = "URL", required_if_eq("source", "remote"))]
    pub remote_url: Option<String>,
    #[arg(
        short,
        long,
        default_value = DEFAULT_ARTIFACT_DIR,
        help = "Directory scanned in local-dir mode"
    )]
    pub artifact_dir: PathBuf,
    #[arg(short, long, default_value_t = DEFAULT_PORT, help = "Port the API listens on")]
    pub port: u16,
    #[arg(long, value_name = "FILE", help = "JSON object of provider module to value")]
    pub provided_variables: Option<PathBuf>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<ArtifactStore>>,
    pub source: ArtifactSource,
    pub artifact_dir: PathBuf,
    pub client: Option<ArtifactClient>,
    pub provided_variables: Arc<ProvidedVariableRegistry>,
}

impl AppState {
    /// Create the application state from command-line arguments and load artifacts
    pub async fn from_args(args: Args) -> anyhow::Result<Self> {
        let client = match args.source {
            ArtifactSource::LocalDir => {
                info!(dir = %args.artifact_dir.display(), "Starting in local-dir mode");
                None
            }
            ArtifactSource::Remote => {
                let url = args
                    .remote_url
                    .clone()
                    .context("A remote URL is required in remote mode")?;
                let api_key = std::env::var(API_KEY_ENV).ok();
                info!(url = %url, authenticated = api_key.is_some(), "Starting in remote mode");
                Some(ArtifactClient::new(url, api_key))
            }
        };

        let provided_variables = match &args.provided_variables {
            Some(path) => ProvidedVariableRegistry::from_file(path)
                .with_context(|| format!("Loading provided variables from {}", path.display()))?,
            None => ProvidedVariableRegistry::new(),
        };

        let state = Self::new(
            ArtifactStore::new(),
            args.source,
            args.artifact_dir,
            client,
            provided_variables,
        );
        state.reload().await?;
        Ok(state)
    }

    pub fn new(
        store: ArtifactStore,
        source: ArtifactSource,
        artifact_dir: PathBuf,
        client: Option<ArtifactClient>,
        provided_variables: ProvidedVariableRegistry,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            source,
            artifact_dir,
            client,
            provided_variables: Arc::new(provided_variables),
        }
    }

    /// Re-read artifacts from the configured source and swap the store in
    pub async fn reload(&self) -> anyhow::Result<usize> {
        let store = match (&self.source, &self.client) {
            (ArtifactSource::Remote, Some(client)) => client
                .fetch_artifacts()
                .await
                .with_context(|| format!("Fetching artifacts from {}", client.base_url()))?,
            _ => ArtifactStore::from_dir(&self.artifact_dir)?,
        };

        let count = store.len();
        info!(
            artifacts = count,
            load_errors = store.load_errors().len(),
            "Loaded artifacts"
        );
        *self.store.write().await = store;
        Ok(count)
    }
}

/// Constants used throughout the application
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ARTIFACT_DIR: &str = "__generated__";
pub const API_KEY_ENV: &str = "ARTIFACT_API_KEY";
pub const MAX_SEARCH_LIMIT_CHARS: usize = 100;
