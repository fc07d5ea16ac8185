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

use crate::keyvault::vault_url;
use crate::{Error, Result};
use std::time::Duration;
use workload_identity_auth::endpoint::DEFAULT_TIMEOUT;
use workload_identity_auth::selector::IdentitySelector;

/// A secret to read during the pod-scoped check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretRef {
    pub vault_url: String,
    pub secret_name: String,
    /// The latest version is read when unset.
    pub secret_version: Option<String>,
}

impl SecretRef {
    /// References a secret in the named vault.
    pub fn new<V, S>(vault_name: V, secret_name: S) -> Self
    where
        V: AsRef<str>,
        S: Into<String>,
    {
        Self {
            vault_url: vault_url(vault_name.as_ref()),
            secret_name: secret_name.into(),
            secret_version: None,
        }
    }

    pub fn with_version<T: Into<String>>(mut self, v: T) -> Self {
        self.secret_version = Some(v.into());
        self
    }

    /// Replaces the vault URL, for example to point at a test server.
    pub fn with_vault_url<T: Into<String>>(mut self, v: T) -> Self {
        self.vault_url = v.into();
        self
    }
}

/// A resource group to list during the cluster-wide check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceGroupRef {
    pub subscription_id: String,
    pub resource_group: String,
}

impl ResourceGroupRef {
    pub fn new<S: Into<String>, R: Into<String>>(subscription_id: S, resource_group: R) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
        }
    }
}

/// The user-assigned identity check to run. Exactly one runs per invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    PodScoped(SecretRef),
    ClusterWide(ResourceGroupRef),
}

impl Mode {
    /// Picks the mode from the configured values.
    ///
    /// A vault name and a secret name together select the pod-scoped check.
    /// Anything else selects the cluster-wide check, which then requires a
    /// subscription and a resource group.
    pub fn select(
        keyvault_name: Option<&str>,
        secret_name: Option<&str>,
        secret_version: Option<&str>,
        subscription_id: Option<&str>,
        resource_group: Option<&str>,
    ) -> Result<Self> {
        fn set(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }
        if let (Some(vault), Some(secret)) = (set(keyvault_name), set(secret_name)) {
            let secret = SecretRef::new(vault, secret);
            return Ok(Self::PodScoped(match set(secret_version) {
                Some(v) => secret.with_version(v),
                None => secret,
            }));
        }
        match (set(subscription_id), set(resource_group)) {
            (Some(s), Some(r)) => Ok(Self::ClusterWide(ResourceGroupRef::new(s, r))),
            (None, _) => Err(Error::configuration(
                "the cluster-wide check requires --subscription-id, or set --keyvault-name and --keyvault-secret-name for the pod-scoped check",
            )),
            (_, None) => Err(Error::configuration(
                "the cluster-wide check requires --resource-group, or set --keyvault-name and --keyvault-secret-name for the pod-scoped check",
            )),
        }
    }
}

/// Everything a validation run needs, resolved before any network call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    /// The identity used by the user-assigned check.
    pub selector: IdentitySelector,
    /// Bounds the whole run, including all network calls.
    pub timeout: Duration,
}

impl RunConfig {
    pub fn new(mode: Mode, selector: IdentitySelector) -> Self {
        Self {
            mode,
            selector,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn select_pod_scoped() -> anyhow::Result<()> {
        let mode = Mode::select(Some("kv1"), Some("sec1"), None, Some("sub1"), Some("rg1"))?;
        assert_eq!(mode, Mode::PodScoped(SecretRef::new("kv1", "sec1")));
        let Mode::PodScoped(secret) = mode else {
            unreachable!("checked above");
        };
        assert_eq!(secret.vault_url, "https://kv1.vault.azure.net");
        assert_eq!(secret.secret_version, None);
        Ok(())
    }

    #[test]
    fn select_pod_scoped_with_version() -> anyhow::Result<()> {
        let mode = Mode::select(Some("kv1"), Some("sec1"), Some("v2"), None, None)?;
        assert_eq!(
            mode,
            Mode::PodScoped(SecretRef::new("kv1", "sec1").with_version("v2"))
        );
        Ok(())
    }

    #[test]
    fn select_empty_version_is_latest() -> anyhow::Result<()> {
        let mode = Mode::select(Some("kv1"), Some("sec1"), Some(""), None, None)?;
        assert_eq!(mode, Mode::PodScoped(SecretRef::new("kv1", "sec1")));
        Ok(())
    }

    #[test_case(None, None; "no vault fields")]
    #[test_case(Some("kv1"), None; "vault without secret")]
    #[test_case(None, Some("sec1"); "secret without vault")]
    #[test_case(Some(""), Some("sec1"); "empty vault")]
    fn select_cluster_wide(vault: Option<&str>, secret: Option<&str>) -> anyhow::Result<()> {
        let mode = Mode::select(vault, secret, None, Some("sub1"), Some("rg1"))?;
        assert_eq!(
            mode,
            Mode::ClusterWide(ResourceGroupRef::new("sub1", "rg1"))
        );
        Ok(())
    }

    #[test_case(None, Some("rg1"), "--subscription-id")]
    #[test_case(Some("sub1"), None, "--resource-group")]
    #[test_case(Some("sub1"), Some(""), "--resource-group")]
    fn select_missing(sub: Option<&str>, rg: Option<&str>, want: &str) {
        let err = Mode::select(None, None, None, sub, rg).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
        assert!(err.to_string().contains(want), "{err}");
    }

    #[test]
    fn run_config_defaults() {
        let config = RunConfig::new(
            Mode::ClusterWide(ResourceGroupRef::new("sub1", "rg1")),
            IdentitySelector::Ambient,
        );
        assert_eq!(config.timeout, Duration::from_secs(150));
        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn secret_ref_vault_url() {
        let secret = SecretRef::new("kv1", "sec1").with_vault_url("http://127.0.0.1:8080");
        assert_eq!(secret.vault_url, "http://127.0.0.1:8080");
        assert_eq!(secret.secret_name, "sec1");
    }
}
