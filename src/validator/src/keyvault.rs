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

//! A minimal client for the Azure Key Vault secrets API.

use crate::config::SecretRef;
use crate::rest::{self, ServiceError};
use serde::Deserialize;
use workload_identity_auth::credentials::BearerAuthorizer;
use workload_identity_auth::deadline::Deadline;

const KEY_VAULT_API_VERSION: &str = "2016-10-01";

/// Returns the data-plane URL of the named vault.
///
/// # Example
/// ```
/// # use identity_validator::keyvault::vault_url;
/// assert_eq!(vault_url("kv1"), "https://kv1.vault.azure.net");
/// ```
pub fn vault_url(vault_name: &str) -> String {
    format!("https://{vault_name}.vault.azure.net")
}

/// A secret and its attributes, as returned by Key Vault.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct SecretBundle {
    pub value: Option<String>,
    pub id: Option<String>,
    pub content_type: Option<String>,
}

impl SecretBundle {
    /// Returns true if the secret has no value, or an empty one.
    pub fn is_empty(&self) -> bool {
        self.value.as_deref().unwrap_or_default().is_empty()
    }
}

impl std::fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBundle")
            .field("value", &self.value.as_ref().map(|_| "[censored]"))
            .field("id", &self.id)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Reads secrets from a vault.
#[async_trait::async_trait]
pub trait SecretStore: std::fmt::Debug + Send + Sync {
    /// Reads a secret. The latest version is returned when the reference has
    /// no version.
    async fn get_secret(
        &self,
        secret: &SecretRef,
        authorizer: &BearerAuthorizer,
        deadline: &Deadline,
    ) -> Result<SecretBundle, ServiceError>;
}

/// Implements [SecretStore] using the Key Vault REST API.
#[derive(Clone, Debug)]
pub struct KeyVaultClient {
    inner: reqwest::Client,
}

impl KeyVaultClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl SecretStore for KeyVaultClient {
    async fn get_secret(
        &self,
        secret: &SecretRef,
        authorizer: &BearerAuthorizer,
        deadline: &Deadline,
    ) -> Result<SecretBundle, ServiceError> {
        let mut segments = vec!["secrets", secret.secret_name.as_str()];
        segments.extend(secret.secret_version.as_deref().filter(|v| !v.is_empty()));
        let url = rest::build_url(
            &secret.vault_url,
            &segments,
            &[("api-version", KEY_VAULT_API_VERSION)],
        )?;
        rest::get_json(&self.inner, url, authorizer, deadline).await
    }
}
