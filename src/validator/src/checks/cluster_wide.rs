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

use super::Step;
use crate::compute::VirtualMachines;
use crate::config::ResourceGroupRef;
use crate::{Error, Result};
use std::sync::Arc;
use workload_identity_auth::credentials::BearerAuthorizer;
use workload_identity_auth::deadline::Deadline;
use workload_identity_auth::selector::IdentitySelector;
use workload_identity_auth::{RESOURCE_MANAGER_AUDIENCE, TokenAcquirer};

/// Verifies a cluster-wide identity by listing the virtual machines in a
/// resource group.
///
/// Any successful list response passes, including an empty one.
#[derive(Clone, Debug)]
pub struct ResourceListingValidator {
    acquirer: TokenAcquirer,
    machines: Arc<dyn VirtualMachines>,
}

impl ResourceListingValidator {
    pub fn new(acquirer: TokenAcquirer, machines: Arc<dyn VirtualMachines>) -> Self {
        Self { acquirer, machines }
    }

    /// Runs the check and returns the number of virtual machines listed.
    pub async fn validate(
        &self,
        target: &ResourceGroupRef,
        selector: &IdentitySelector,
        deadline: &Deadline,
    ) -> Result<usize> {
        let token = self
            .acquirer
            .acquire(selector, RESOURCE_MANAGER_AUDIENCE, deadline)
            .await
            .map_err(|source| Error::Credentials {
                step: Step::ClusterWide,
                mode: selector.clone(),
                source,
            })?;
        let authorizer = BearerAuthorizer::new(token);

        let machines = self
            .machines
            .list(
                &target.subscription_id,
                &target.resource_group,
                &authorizer,
                deadline,
            )
            .await
            .map_err(|source| Error::ResourceListFailed {
                resource_group: target.resource_group.clone(),
                mode: selector.clone(),
                source,
            })?;
        tracing::info!(
            subscription_id = %target.subscription_id,
            resource_group = %target.resource_group,
            "verified cluster-wide identity, virtual machine count: {}",
            machines.len()
        );
        Ok(machines.len())
    }
}
