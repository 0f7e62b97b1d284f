//! Owning network (VPC) model.

use serde::{Deserialize, Serialize};

/// The VPC a cluster's subnets live in.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    /// Provider-assigned VPC ID. Empty until the VPC has been created.
    #[serde(default)]
    pub id: String,
    /// Name of the VPC.
    #[serde(default)]
    pub name: String,
    /// Address space of the VPC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
}

impl Network {
    pub fn new(id: &str) -> Self {
        Network {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// True once the provider has assigned an ID.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
