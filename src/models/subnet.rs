//! Subnet data models.
//!
//! [`Subnet`] is what the provider reports, [`SubnetSpec`] is the record kept
//! in cluster state, and [`SubnetPlan`] describes the subnet we want created.

use super::Ipv4;
use crate::config;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A subnet as reported by the provider.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Subnet {
    /// Provider-assigned subnet ID.
    pub id: String,
    /// Name of the subnet.
    pub name: String,
    /// CIDR block of the subnet.
    pub cidr: String,
    /// Gateway address of the subnet.
    pub gateway_ip: String,
    /// ID of the VPC owning this subnet.
    #[serde(rename = "vpc_id")]
    pub network_id: String,
    /// Neutron network cross-reference, passed through unmodified.
    #[serde(default)]
    pub neutron_network_id: String,
    /// Neutron subnet cross-reference, passed through unmodified.
    #[serde(default)]
    pub neutron_subnet_id: String,
    /// Provider lifecycle status (ACTIVE, UNKNOWN, ERROR).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Subnet record written to cluster state after creation.
///
/// Consumers such as instance placement read these; only convergence writes them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetSpec {
    pub id: String,
    pub name: String,
    pub cidr: String,
    pub gateway_ip: String,
    #[serde(rename = "vpc_id")]
    pub network_id: String,
    #[serde(default)]
    pub neutron_network_id: String,
    #[serde(default)]
    pub neutron_subnet_id: String,
}

impl From<&Subnet> for SubnetSpec {
    fn from(subnet: &Subnet) -> Self {
        SubnetSpec {
            id: subnet.id.clone(),
            name: subnet.name.clone(),
            cidr: subnet.cidr.clone(),
            gateway_ip: subnet.gateway_ip.clone(),
            network_id: subnet.network_id.clone(),
            neutron_network_id: subnet.neutron_network_id.clone(),
            neutron_subnet_id: subnet.neutron_subnet_id.clone(),
        }
    }
}

/// Body of a create-subnet call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateSubnetRequest {
    pub name: String,
    pub cidr: String,
    #[serde(rename = "vpc_id")]
    pub network_id: String,
    pub gateway_ip: String,
}

/// Filter for list-subnets calls. An empty filter lists every subnet in the project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetFilter {
    pub network_id: Option<String>,
}

impl SubnetFilter {
    /// Filter restricted to one network.
    pub fn for_network(network_id: &str) -> Self {
        SubnetFilter {
            network_id: Some(network_id.to_string()),
        }
    }
}

/// The subnet convergence creates when a network has none.
///
/// Only one subnet per network is modelled: existence is checked by count,
/// never by matching this plan's name or CIDR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetPlan {
    pub name: String,
    pub cidr: Ipv4,
    pub gateway_ip: Ipv4Addr,
}

impl SubnetPlan {
    /// The fixed single-subnet layout.
    pub fn default_plan() -> Self {
        SubnetPlan {
            name: config::DEFAULT_SUBNET_NAME.to_string(),
            cidr: Ipv4 {
                addr: config::DEFAULT_SUBNET_ADDR,
                mask: config::DEFAULT_SUBNET_MASK,
            },
            gateway_ip: config::DEFAULT_GATEWAY_IP,
        }
    }

    /// Check that the gateway is a usable host address inside the CIDR.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("subnet name is empty".to_string());
        }
        if !self.cidr.contains(self.gateway_ip) {
            return Err(format!(
                "gateway {} is outside {}",
                self.gateway_ip, self.cidr
            ));
        }
        if self.gateway_ip == self.cidr.lo() || self.gateway_ip == self.cidr.hi() {
            return Err(format!(
                "gateway {} is the network or broadcast address of {}",
                self.gateway_ip, self.cidr
            ));
        }
        Ok(())
    }

    /// Build the create call for the given owning network.
    pub fn to_request(&self, network_id: &str) -> CreateSubnetRequest {
        CreateSubnetRequest {
            name: self.name.clone(),
            cidr: self.cidr.to_string(),
            network_id: network_id.to_string(),
            gateway_ip: self.gateway_ip.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = SubnetPlan::default_plan();
        assert!(plan.validate().is_ok());

        let req = plan.to_request("vpc-123");
        assert_eq!(req.name, "subnet-caph");
        assert_eq!(req.cidr, "192.168.1.0/24");
        assert_eq!(req.gateway_ip, "192.168.1.1");
        assert_eq!(req.network_id, "vpc-123");
    }

    #[test]
    fn test_plan_rejects_bad_gateway() {
        let mut plan = SubnetPlan::default_plan();
        plan.gateway_ip = Ipv4Addr::new(10, 0, 0, 1);
        assert!(plan.validate().unwrap_err().contains("outside"));

        plan.gateway_ip = Ipv4Addr::new(192, 168, 1, 255);
        assert!(plan.validate().unwrap_err().contains("broadcast"));

        plan.gateway_ip = Ipv4Addr::new(192, 168, 1, 0);
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_subnet_wire_format() {
        let json = r#"{
            "id": "4779ab1c-7c1a-44b1-a02e-93dfc361b32d",
            "name": "subnet-caph",
            "cidr": "192.168.1.0/24",
            "gateway_ip": "192.168.1.1",
            "vpc_id": "3ec3b33f-ac1c-4630-ad1c-7dba1ed79d85",
            "neutron_network_id": "b4ee4d2e-c2f3-4e2a-9b1f-bb23e7eb2c8b",
            "neutron_subnet_id": "213cb9d-3122-2ce1-1022-8f3c7d95c5a2",
            "status": "ACTIVE",
            "dhcp_enable": true
        }"#;
        let subnet: Subnet = serde_json::from_str(json).unwrap();
        assert_eq!(subnet.network_id, "3ec3b33f-ac1c-4630-ad1c-7dba1ed79d85");
        assert_eq!(subnet.status.as_deref(), Some("ACTIVE"));

        let spec = SubnetSpec::from(&subnet);
        assert_eq!(spec.id, subnet.id);
        assert_eq!(spec.neutron_subnet_id, subnet.neutron_subnet_id);
        assert_eq!(spec.network_id, subnet.network_id);
    }
}
