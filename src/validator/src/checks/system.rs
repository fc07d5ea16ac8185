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
use crate::{Error, Result};
use workload_identity_auth::credentials::ManagedIdentityCredential;
use workload_identity_auth::deadline::Deadline;
use workload_identity_auth::selector::IdentitySelector;
use workload_identity_auth::token::Token;
use workload_identity_auth::{RESOURCE_MANAGER_AUDIENCE, TokenAcquirer};

/// Verifies the system-assigned identity by refreshing a Resource Manager
/// token for it.
#[derive(Clone, Debug)]
pub struct SystemIdentityValidator {
    acquirer: TokenAcquirer,
}

impl SystemIdentityValidator {
    pub fn new(acquirer: TokenAcquirer) -> Self {
        Self { acquirer }
    }

    pub async fn validate(&self, deadline: &Deadline) -> Result<Token> {
        let failed = |source| Error::Credentials {
            step: Step::SystemAssigned,
            mode: IdentitySelector::Ambient,
            source,
        };
        let credential = ManagedIdentityCredential::new(
            self.acquirer.clone(),
            IdentitySelector::Ambient,
            RESOURCE_MANAGER_AUDIENCE,
        );
        let token = credential.refresh(deadline).await.map_err(failed)?;
        tracing::info!(
            endpoint = %self.acquirer.endpoint(),
            "acquired a token for the system-assigned identity"
        );
        Ok(token)
    }
}
