//! Subnet reconciliation.
//!
//! - [`converge`] - make sure the owning VPC has its subnet and record it
//! - [`teardown`] - delete every subnet of the owning VPC
//!
//! Both passes are idempotent; the controller loop retries by calling them again.

mod converge;
mod teardown;

use crate::models::SubnetPlan;
use crate::provider::NetworkClient;

/// Runs subnet passes against one provider client.
pub struct SubnetService<C: NetworkClient> {
    client: C,
    plan: SubnetPlan,
}

impl<C: NetworkClient> SubnetService<C> {
    /// Service creating the default `subnet-caph` 192.168.1.0/24 subnet.
    pub fn new(client: C) -> Self {
        Self::with_plan(client, SubnetPlan::default_plan())
    }

    pub fn with_plan(client: C, plan: SubnetPlan) -> Self {
        SubnetService { client, plan }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}
