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

use crate::checks::Step;
use crate::rest::ServiceError;
use workload_identity_auth::errors::CredentialsError;
use workload_identity_auth::selector::IdentitySelector;

/// The first failure of a validation run.
///
/// Each variant keeps its cause as [source][std::error::Error::source], so the
/// full chain can be reported at the top level.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The validator was misconfigured. No network call was made.
    #[error("invalid configuration: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<CredentialsError>,
    },

    /// A token for `mode` could not be obtained during `step`.
    #[error("{step} failed: cannot obtain a token for the {mode}")]
    Credentials {
        step: Step,
        mode: IdentitySelector,
        #[source]
        source: CredentialsError,
    },

    /// Listing the virtual machines in a resource group failed.
    #[error(
        "{step} failed: cannot list virtual machines in resource group {resource_group} using the {mode}",
        step = Step::ClusterWide
    )]
    ResourceListFailed {
        resource_group: String,
        mode: IdentitySelector,
        #[source]
        source: ServiceError,
    },

    /// Reading a secret failed, or the secret had no value.
    #[error(
        "{step} failed: cannot retrieve secret {secret_name} from {vault_url} using the {mode}",
        step = Step::PodScoped
    )]
    SecretRetrievalFailed {
        vault_url: String,
        secret_name: String,
        mode: IdentitySelector,
        #[source]
        source: ServiceError,
    },
}

impl Error {
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// The step that failed, if the run got past configuration.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Configuration { .. } => None,
            Self::Credentials { step, .. } => Some(*step),
            Self::ResourceListFailed { .. } => Some(Step::ClusterWide),
            Self::SecretRetrievalFailed { .. } => Some(Step::PodScoped),
        }
    }

    /// Returns true if the run deadline elapsed anywhere in the cause chain.
    pub fn is_timeout(&self) -> bool {
        let mut next: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(self);
        while let Some(e) = next {
            if e.downcast_ref::<CredentialsError>()
                .is_some_and(CredentialsError::is_timeout)
                || e.downcast_ref::<ServiceError>()
                    .is_some_and(ServiceError::is_timeout)
                || e.is::<tokio::time::error::Elapsed>()
            {
                return true;
            }
            next = e.source();
        }
        false
    }
}
