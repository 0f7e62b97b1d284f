//! VPC provider API interaction.
//!
//! - [`NetworkClient`] - the three subnet calls reconciliation needs
//! - [`HttpNetworkClient`] - implementation over the provider's REST API
//! - [`ProviderError`] - provider failure with its machine-readable code

mod error;
mod http;

#[cfg(test)]
use mockall::automock;

use crate::models::{CreateSubnetRequest, Subnet, SubnetFilter};

pub use error::ProviderError;
pub use http::HttpNetworkClient;

/// Subnet operations against the provider.
///
/// Every call is a single blocking round trip. Nothing here retries; the
/// caller re-invokes reconciliation instead.
#[cfg_attr(test, automock)]
pub trait NetworkClient: Send + Sync {
    /// List subnets, optionally restricted to one VPC.
    fn list_subnets(&self, filter: &SubnetFilter) -> Result<Vec<Subnet>, ProviderError>;

    /// Create a subnet and return it as the provider recorded it.
    fn create_subnet(&self, request: &CreateSubnetRequest) -> Result<Subnet, ProviderError>;

    /// Delete one subnet of a VPC.
    fn delete_subnet(&self, network_id: &str, subnet_id: &str) -> Result<(), ProviderError>;
}
