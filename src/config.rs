//! Constants and provider settings.

use std::env;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

/// Name given to the single subnet created per VPC.
pub const DEFAULT_SUBNET_NAME: &str = "subnet-caph";
/// Network address of the default subnet (192.168.1.0/24).
pub const DEFAULT_SUBNET_ADDR: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 0);
pub const DEFAULT_SUBNET_MASK: u8 = 24;
/// Gateway of the default subnet.
pub const DEFAULT_GATEWAY_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);

/// Provider error code returned when the VPC does not exist.
pub const VPC_NOT_FOUND_CODE: &str = "VPC.0202";

/// Default request timeout against the provider API.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ENDPOINT: &str = "VPC_ENDPOINT";
pub const ENV_PROJECT_ID: &str = "VPC_PROJECT_ID";
pub const ENV_AUTH_TOKEN: &str = "VPC_AUTH_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "VPC_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Connection settings for the VPC API.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL, e.g. `https://vpc.ap-southeast-1.myhuaweicloud.com`.
    pub endpoint: String,
    pub project_id: String,
    pub auth_token: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Load settings from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<ProviderConfig, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from any key lookup. Split out so tests avoid touching the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<ProviderConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let endpoint = required(ENV_ENDPOINT)?.trim_end_matches('/').to_string();
        let project_id = required(ENV_PROJECT_ID)?;
        let auth_token = required(ENV_AUTH_TOKEN)?;

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: ENV_TIMEOUT_SECS,
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        log::debug!("Provider endpoint={endpoint} project={project_id} timeout={timeout_secs}s");

        Ok(ProviderConfig {
            endpoint,
            project_id,
            auth_token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
