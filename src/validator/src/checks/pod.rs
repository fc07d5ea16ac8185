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
use crate::config::SecretRef;
use crate::keyvault::SecretStore;
use crate::rest::ServiceError;
use crate::{Error, Result};
use std::sync::Arc;
use workload_identity_auth::credentials::BearerAuthorizer;
use workload_identity_auth::deadline::Deadline;
use workload_identity_auth::selector::IdentitySelector;
use workload_identity_auth::{KEY_VAULT_AUDIENCE, TokenAcquirer};

/// Verifies a pod-scoped identity by reading a secret from Key Vault.
///
/// The token is requested for the Key Vault audience. The check passes only
/// if the secret has a non-empty value.
#[derive(Clone, Debug)]
pub struct SecretRetrievalValidator {
    acquirer: TokenAcquirer,
    secrets: Arc<dyn SecretStore>,
}

impl SecretRetrievalValidator {
    pub fn new(acquirer: TokenAcquirer, secrets: Arc<dyn SecretStore>) -> Self {
        Self { acquirer, secrets }
    }

    pub async fn validate(
        &self,
        secret: &SecretRef,
        selector: &IdentitySelector,
        deadline: &Deadline,
    ) -> Result<()> {
        let token = self
            .acquirer
            .acquire(selector, KEY_VAULT_AUDIENCE, deadline)
            .await
            .map_err(|source| Error::Credentials {
                step: Step::PodScoped,
                mode: selector.clone(),
                source,
            })?;
        let authorizer = BearerAuthorizer::new(token);
        let failed = |source| Error::SecretRetrievalFailed {
            vault_url: secret.vault_url.clone(),
            secret_name: secret.secret_name.clone(),
            mode: selector.clone(),
            source,
        };

        tracing::debug!(
            vault_url = %secret.vault_url,
            secret_name = %secret.secret_name,
            secret_version = ?secret.secret_version,
            "retrieving secret"
        );
        let bundle = self
            .secrets
            .get_secret(secret, &authorizer, deadline)
            .await
            .map_err(failed)?;
        if bundle.is_empty() {
            return Err(failed(ServiceError::EmptySecret));
        }
        tracing::info!(
            vault_url = %secret.vault_url,
            secret_name = %secret.secret_name,
            "verified pod-scoped identity"
        );
        Ok(())
    }
}
