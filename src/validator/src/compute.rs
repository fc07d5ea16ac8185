// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A minimal client for the Azure Compute virtual machines API.

use crate::rest::{self, ServiceError};
use serde::Deserialize;
use url::Url;
use workload_identity_auth::credentials::BearerAuthorizer;
use workload_identity_auth::deadline::Deadline;

/// The public Azure Resource Manager endpoint.
pub const RESOURCE_MANAGER_ENDPOINT: &str = "https://management.azure.com";

const COMPUTE_API_VERSION: &str = "2019-12-01";

/// The subset of a virtual machine resource used in log messages.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[non_exhaustive]
pub struct VirtualMachine {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VirtualMachineListResult {
    #[serde(default)]
    value: Vec<VirtualMachine>,
    next_link: Option<String>,
}

/// Lists the virtual machines in a resource group.
#[async_trait::async_trait]
pub trait VirtualMachines: std::fmt::Debug + Send + Sync {
    /// Returns every virtual machine in the resource group, across all pages.
    async fn list(
        &self,
        subscription_id: &str,
        resource_group: &str,
        authorizer: &BearerAuthorizer,
        deadline: &Deadline,
    ) -> Result<Vec<VirtualMachine>, ServiceError>;
}

/// Implements [VirtualMachines] using the Resource Manager REST API.
#[derive(Clone, Debug)]
pub struct ComputeClient {
    endpoint: String,
    inner: reqwest::Client,
}

impl ComputeClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self {
            endpoint: RESOURCE_MANAGER_ENDPOINT.to_string(),
            inner,
        }
    }

    /// Overrides the Resource Manager endpoint.
    pub fn with_endpoint<T: Into<String>>(mut self, v: T) -> Self {
        self.endpoint = v.into();
        self
    }
}

#[async_trait::async_trait]
impl VirtualMachines for ComputeClient {
    async fn list(
        &self,
        subscription_id: &str,
        resource_group: &str,
        authorizer: &BearerAuthorizer,
        deadline: &Deadline,
    ) -> Result<Vec<VirtualMachine>, ServiceError> {
        let mut url = rest::build_url(
            &self.endpoint,
            &[
                "subscriptions",
                subscription_id,
                "resourceGroups",
                resource_group,
                "providers",
                "Microsoft.Compute",
                "virtualMachines",
            ],
            &[("api-version", COMPUTE_API_VERSION)],
        )?;
        let mut machines = Vec::new();
        loop {
            let page: VirtualMachineListResult =
                rest::get_json(&self.inner, url, authorizer, deadline).await?;
            machines.extend(page.value);
            let Some(link) = page.next_link.filter(|l| !l.is_empty()) else {
                break;
            };
            tracing::debug!(next_link = %link, "fetching next page of virtual machines");
            url = Url::parse(&link).map_err(|e| ServiceError::InvalidUrl {
                url: link.clone(),
                source: e.into(),
            })?;
        }
        Ok(machines)
    }
}
