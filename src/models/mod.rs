//! Domain models for subnet reconciliation.
//!
//! - [`Ipv4`] - IPv4 CIDR block
//! - [`Network`] - the owning VPC
//! - [`Subnet`], [`SubnetSpec`], [`SubnetPlan`] - provider, recorded and desired subnets

mod ipv4;
mod network;
mod subnet;

pub use ipv4::{CidrError, Ipv4};
pub use network::Network;
pub use subnet::{CreateSubnetRequest, Subnet, SubnetFilter, SubnetPlan, SubnetSpec};
