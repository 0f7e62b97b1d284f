//! REST client for the VPC v1 subnet API.

use super::{NetworkClient, ProviderError};
use crate::config::ProviderConfig;
use crate::models::{CreateSubnetRequest, Subnet, SubnetFilter};
use colored::Colorize;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Page size for list calls.
const PAGE_LIMIT: usize = 100;

#[derive(Deserialize, Debug, Default)]
struct ListSubnetsResponse {
    #[serde(default)]
    subnets: Vec<Subnet>,
}

#[derive(Serialize, Debug)]
struct CreateSubnetBody<'a> {
    subnet: &'a CreateSubnetRequest,
}

#[derive(Deserialize, Debug)]
struct CreateSubnetResponse {
    subnet: Subnet,
}

/// Blocking HTTP implementation of [`NetworkClient`].
pub struct HttpNetworkClient {
    http: Client,
    endpoint: String,
    project_id: String,
    auth_token: String,
}

impl HttpNetworkClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpNetworkClient {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}/{}", self.endpoint, self.project_id, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("X-Auth-Token", &self.auth_token)
            .header("Accept", "application/json")
    }

    fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, ProviderError> {
        let resp = builder.send().map_err(|e| {
            log::warn!("{failed} {what}: {e}", failed = "failed".on_red());
            ProviderError::transport(format!("{what}: {e}"))
        })?;

        let status = resp.status();
        if status.is_success() {
            log::debug!("Success {what}: status={status}");
            return Ok(resp);
        }

        let body = body_or_empty(resp.text(), what);
        log::trace!(
            "code={code}\n┎######\nbody=\n{body}\n┖######",
            code = status.as_u16(),
            body = body.red()
        );
        Err(ProviderError::from_response(status.as_u16(), &body))
    }
}

/// Error body text, or empty when it could not be read.
fn body_or_empty<E: std::fmt::Display>(body: Result<String, E>, what: &str) -> String {
    body.unwrap_or_else(|e| {
        log::warn!("Failed to read error body of {what}: {e}");
        String::new()
    })
}

/// Decode a JSON body, naming the failing path on error.
fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, ProviderError> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("BODY START:\n\n{}\n\nBODY END\n", body);
        ProviderError::transport(format!(
            "error parsing {what} response: path={} error={}",
            e.path(),
            e
        ))
    })
}

fn read_body(resp: Response, what: &str) -> Result<String, ProviderError> {
    resp.text()
        .map_err(|e| ProviderError::transport(format!("reading {what} response: {e}")))
}

/// Query parameters for one page of a list call.
fn list_query(filter: &SubnetFilter, marker: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", PAGE_LIMIT.to_string())];
    if let Some(network_id) = &filter.network_id {
        query.push(("vpc_id", network_id.clone()));
    }
    if let Some(marker) = marker {
        query.push(("marker", marker.to_string()));
    }
    query
}

impl NetworkClient for HttpNetworkClient {
    fn list_subnets(&self, filter: &SubnetFilter) -> Result<Vec<Subnet>, ProviderError> {
        let url = self.url("subnets");
        let mut subnets: Vec<Subnet> = Vec::new();
        let mut marker: Option<String> = None;
        let mut page = 0;

        loop {
            let query = list_query(filter, marker.as_deref());
            let resp = self.send(self.request(Method::GET, &url).query(&query), "list subnets")?;
            let body = read_body(resp, "list subnets")?;
            let parsed: ListSubnetsResponse = decode(&body, "list subnets")?;

            let count = parsed.subnets.len();
            let next_marker = parsed.subnets.last().map(|s| s.id.clone());
            subnets.extend(parsed.subnets);

            log::debug!(
                "got page#{page:2} record_count=+{count:3} => {total:3}",
                total = subnets.len()
            );

            if count < PAGE_LIMIT {
                break;
            }
            if next_marker.is_none() || next_marker == marker {
                return Err(ProviderError::transport(
                    "list subnets marker not advancing - possible infinite loop",
                ));
            }
            marker = next_marker;
            page += 1;
        }

        Ok(subnets)
    }

    fn create_subnet(&self, request: &CreateSubnetRequest) -> Result<Subnet, ProviderError> {
        let url = self.url("subnets");
        let body = CreateSubnetBody { subnet: request };
        let resp = self.send(
            self.request(Method::POST, &url).json(&body),
            "create subnet",
        )?;
        let body = read_body(resp, "create subnet")?;
        let parsed: CreateSubnetResponse = decode(&body, "create subnet")?;
        Ok(parsed.subnet)
    }

    fn delete_subnet(&self, network_id: &str, subnet_id: &str) -> Result<(), ProviderError> {
        let url = self.url(&format!("vpcs/{network_id}/subnets/{subnet_id}"));
        self.send(self.request(Method::DELETE, &url), "delete subnet")?;
        Ok(())
    }
}
