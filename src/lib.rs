//! Subnet reconciliation for a cluster's VPC.
//!
//! [`SubnetService::reconcile_subnets`] makes sure the owning VPC has its
//! subnet and records it in the [`StateScope`]; [`SubnetService::delete_subnets`]
//! removes the VPC's subnets when the cluster goes away.

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod reconcile;
pub mod scope;

use std::path::Path;

pub use error::{ProviderOperation, ReconcileError};
pub use provider::{HttpNetworkClient, NetworkClient, ProviderError};
pub use reconcile::SubnetService;
pub use scope::{ClusterState, FileScope, ScopeError, StateScope};

/// Open the state file at `path`, or start a fresh one when it does not exist yet.
///
/// `network_id`, when given, replaces the VPC ID held in the file.
pub fn open_scope(path: &Path, network_id: Option<&str>) -> Result<FileScope, ScopeError> {
    let mut scope = if path.exists() {
        FileScope::load(path)?
    } else {
        log::warn!("State file not found: {}", path.display());
        FileScope::new(path, models::Network::default())
    };

    if let Some(id) = network_id {
        scope.set_network_id(id);
    }
    Ok(scope)
}

/// One-line outcome of a delete pass for `network`.
pub fn teardown_summary(network: &models::Network) -> String {
    if network.has_id() {
        format!("deleted subnets of VPC '{}'", network.id)
    } else {
        "no VPC ID recorded, nothing to delete".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_scope_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let scope = open_scope(&path, Some("vpc-9")).unwrap();
        assert_eq!(scope.owning_network().id, "vpc-9");
        assert!(!path.exists(), "nothing is written before persist");
    }

    #[test]
    fn test_teardown_summary() {
        assert_eq!(
            teardown_summary(&models::Network::new("vpc-1")),
            "deleted subnets of VPC 'vpc-1'"
        );
        assert_eq!(
            teardown_summary(&models::Network::default()),
            "no VPC ID recorded, nothing to delete"
        );
    }

    #[test]
    fn test_open_scope_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        FileScope::new(&path, models::Network::new("vpc-1"))
            .persist_changes()
            .unwrap();

        assert_eq!(open_scope(&path, None).unwrap().owning_network().id, "vpc-1");
        assert_eq!(
            open_scope(&path, Some("vpc-2")).unwrap().owning_network().id,
            "vpc-2"
        );
    }
}
