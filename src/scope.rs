//! Cluster state holder.
//!
//! The scope supplies the owning VPC and receives the subnet records that
//! convergence derives. [`FileScope`] keeps that state in a JSON file.

use crate::models::{Network, SubnetSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("state file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state file {}: path={json_path} error={message}", .path.display())]
    Parse {
        path: PathBuf,
        json_path: String,
        message: String,
    },
    #[error("serializing state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Desired state input and derived status output for subnet reconciliation.
pub trait StateScope {
    /// The VPC whose subnets are being managed.
    fn owning_network(&self) -> &Network;

    /// Replace the recorded subnets.
    fn set_subnets(&mut self, subnets: Vec<SubnetSpec>);

    /// Flush pending changes to durable storage.
    fn persist_changes(&mut self) -> Result<(), ScopeError>;
}

/// Persisted cluster network state.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ClusterState {
    pub network: Network,
    #[serde(default)]
    pub subnets: Vec<SubnetSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_persisted: Option<DateTime<Utc>>,
}

/// [`StateScope`] stored as a JSON document on disk.
#[derive(Debug)]
pub struct FileScope {
    path: PathBuf,
    state: ClusterState,
}

impl FileScope {
    /// Start a new state file for `network`. Nothing is written until [`StateScope::persist_changes`].
    pub fn new(path: impl Into<PathBuf>, network: Network) -> Self {
        FileScope {
            path: path.into(),
            state: ClusterState {
                network,
                ..Default::default()
            },
        }
    }

    /// Read an existing state file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|source| ScopeError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("Reading state file: {}", path.display());

        let mut deserializer = serde_json::Deserializer::from_str(&json);
        let state: ClusterState =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|e| ScopeError::Parse {
                path: path.clone(),
                json_path: e.path().to_string(),
                message: e.inner().to_string(),
            })?;

        Ok(FileScope { path, state })
    }

    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    /// Point the scope at a different VPC.
    pub fn set_network_id(&mut self, id: &str) {
        self.state.network.id = id.to_string();
    }
}

impl StateScope for FileScope {
    fn owning_network(&self) -> &Network {
        &self.state.network
    }

    fn set_subnets(&mut self, subnets: Vec<SubnetSpec>) {
        self.state.subnets = subnets;
    }

    fn persist_changes(&mut self) -> Result<(), ScopeError> {
        let stamp = Utc::now();
        let mut pending = self.state.clone();
        pending.last_persisted = Some(stamp);
        let json = serde_json::to_string_pretty(&pending)?;

        // write then rename so readers never see a half-written file
        let tmp = self.path.with_extension("json.tmp");
        let written = std::fs::write(&tmp, json)
            .map_err(|source| ScopeError::Io {
                path: tmp.clone(),
                source,
            })
            .and_then(|()| {
                std::fs::rename(&tmp, &self.path).map_err(|source| ScopeError::Io {
                    path: self.path.clone(),
                    source,
                })
            });
        if let Err(e) = written {
            if tmp.exists() {
                if let Err(rm) = std::fs::remove_file(&tmp) {
                    log::warn!("Failed to remove {}: {rm}", tmp.display());
                }
            }
            return Err(e);
        }

        self.state.last_persisted = Some(stamp);
        log::debug!("Persisted state to {}", self.path.display());
        Ok(())
    }
}
