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

use crate::Result;
use crate::checks::{
    ResourceListingValidator, SecretRetrievalValidator, Step, SystemIdentityValidator,
};
use crate::compute::VirtualMachines;
use crate::config::{Mode, RunConfig};
use crate::keyvault::SecretStore;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use workload_identity_auth::TokenAcquirer;
use workload_identity_auth::deadline::Deadline;

/// The checks that passed, in the order they ran.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub steps: Vec<Step>,
    /// The number of virtual machines listed by the cluster-wide check.
    pub machine_count: Option<usize>,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let steps = self
            .steps
            .iter()
            .map(Step::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "passed: {steps}")
    }
}

/// Runs the user-assigned check selected by the configuration, then the
/// system-assigned check.
///
/// The first failure ends the run. The orchestrator never exits the process,
/// it returns the failure to the caller.
#[derive(Clone, Debug)]
pub struct Orchestrator {
    resource_listing: ResourceListingValidator,
    secret_retrieval: SecretRetrievalValidator,
    system_identity: SystemIdentityValidator,
}

impl Orchestrator {
    pub fn new(
        acquirer: TokenAcquirer,
        machines: Arc<dyn VirtualMachines>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        Self {
            resource_listing: ResourceListingValidator::new(acquirer.clone(), machines),
            secret_retrieval: SecretRetrievalValidator::new(acquirer.clone(), secrets),
            system_identity: SystemIdentityValidator::new(acquirer),
        }
    }

    /// Runs all the selected checks under one deadline.
    pub async fn run(&self, config: &RunConfig) -> Result<Report> {
        let deadline = Deadline::after(config.timeout);
        let mut report = Report::default();

        match &config.mode {
            Mode::PodScoped(secret) => {
                self.secret_retrieval
                    .validate(secret, &config.selector, &deadline)
                    .await?;
                report.steps.push(Step::PodScoped);
            }
            Mode::ClusterWide(target) => {
                let count = self
                    .resource_listing
                    .validate(target, &config.selector, &deadline)
                    .await?;
                report.machine_count = Some(count);
                report.steps.push(Step::ClusterWide);
            }
        }

        self.system_identity.validate(&deadline).await?;
        report.steps.push(Step::SystemAssigned);
        Ok(report)
    }
}
