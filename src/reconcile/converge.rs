//! Create-if-missing pass for the VPC's subnet.

use super::SubnetService;
use crate::error::{ProviderOperation, ReconcileError};
use crate::models::{SubnetFilter, SubnetSpec};
use crate::provider::NetworkClient;
use crate::scope::StateScope;

impl<C: NetworkClient> SubnetService<C> {
    /// Make sure the owning VPC has a subnet, then persist the scope.
    ///
    /// Any subnet under the VPC counts as converged; nothing is compared or
    /// updated in place. When none exists the planned subnet is created and
    /// recorded as the scope's only subnet. The scope is persisted on every
    /// successful path, created or not.
    pub fn reconcile_subnets<S>(&self, scope: &mut S) -> Result<(), ReconcileError>
    where
        S: StateScope + ?Sized,
    {
        if !scope.owning_network().has_id() {
            return Err(ReconcileError::precondition("VPC ID is empty"));
        }
        let network_id = scope.owning_network().id.clone();
        self.plan
            .validate()
            .map_err(|e| ReconcileError::precondition(format!("invalid subnet plan: {e}")))?;

        let subnets = self
            .client
            .list_subnets(&SubnetFilter::for_network(&network_id))
            .map_err(|e| ReconcileError::provider(ProviderOperation::ListSubnets, e))?;

        if subnets.is_empty() {
            let request = self.plan.to_request(&network_id);
            let created = self
                .client
                .create_subnet(&request)
                .map_err(|e| ReconcileError::provider(ProviderOperation::CreateSubnet, e))?;

            if created.network_id != network_id {
                log::warn!(
                    "Created subnet {} reports VPC {} instead of {network_id}",
                    created.id,
                    created.network_id
                );
            }

            scope.set_subnets(vec![SubnetSpec::from(&created)]);
            log::debug!("Subnet create response: {created:?}");
            log::info!("Created subnet {} in VPC {network_id}", created.id);
        } else {
            log::info!("Subnet already exists ({} in VPC {network_id})", subnets.len());
        }

        scope.persist_changes().map_err(|e| {
            log::error!("Failed to persist cluster state: {e}");
            ReconcileError::from(e)
        })
    }
}
