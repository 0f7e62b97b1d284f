//! Error types for subnet reconciliation.

use crate::provider::ProviderError;
use crate::scope::ScopeError;
use std::fmt;
use thiserror::Error;

/// Provider call a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOperation {
    ListSubnets,
    CreateSubnet,
    DeleteSubnet,
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderOperation::ListSubnets => "list subnets",
            ProviderOperation::CreateSubnet => "create subnet",
            ProviderOperation::DeleteSubnet => "delete subnet",
        };
        f.write_str(s)
    }
}

fn target_suffix(target: &Option<String>) -> String {
    target.as_deref().map(|t| format!(" {t}")).unwrap_or_default()
}

/// Failure of a reconcile or delete pass.
///
/// None of these are retried here. A failed pass may still have changed
/// remote state (a subnet created but not recorded), so callers re-invoke.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Desired state is not usable yet.
    #[error("precondition failed: {message}")]
    Precondition { message: String },

    /// A list, create or delete call failed.
    #[error("failed to {operation}{}: {source}", target_suffix(.target))]
    ProviderCall {
        operation: ProviderOperation,
        /// Subnet ID for deletions.
        target: Option<String>,
        #[source]
        source: ProviderError,
    },

    /// Flushing state to durable storage failed.
    #[error("failed to persist cluster state: {source}")]
    Persistence {
        #[from]
        source: ScopeError,
    },
}

impl ReconcileError {
    pub fn precondition(message: impl Into<String>) -> Self {
        ReconcileError::Precondition {
            message: message.into(),
        }
    }

    pub fn provider(operation: ProviderOperation, source: ProviderError) -> Self {
        ReconcileError::ProviderCall {
            operation,
            target: None,
            source,
        }
    }

    pub fn provider_for(
        operation: ProviderOperation,
        target: impl Into<String>,
        source: ProviderError,
    ) -> Self {
        ReconcileError::ProviderCall {
            operation,
            target: Some(target.into()),
            source,
        }
    }
}
