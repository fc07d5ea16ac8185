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

use crate::config::{Mode, RunConfig};
use crate::{Error, Result};
use clap::Parser;
use humantime::parse_duration;
use std::time::Duration;
use workload_identity_auth::selector::IdentitySelector;

/// Configuration options for the validator.
///
/// Every option can also be set through the environment variable shown in
/// `--help`.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = crate::DESCRIPTION)]
pub struct Args {
    /// The subscription listed by the cluster-wide check.
    #[arg(long, env = "IDENTITY_VALIDATOR_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    /// The resource group listed by the cluster-wide check.
    #[arg(long, env = "IDENTITY_VALIDATOR_RESOURCE_GROUP")]
    pub resource_group: Option<String>,

    /// The client id of the user-assigned identity.
    ///
    /// If neither this nor `--identity-resource-id` is set the broker picks
    /// the identity.
    #[arg(long, env = "IDENTITY_VALIDATOR_IDENTITY_CLIENT_ID")]
    pub identity_client_id: Option<String>,

    /// The Azure resource id of the user-assigned identity.
    #[arg(long, env = "IDENTITY_VALIDATOR_IDENTITY_RESOURCE_ID")]
    pub identity_resource_id: Option<String>,

    /// The Key Vault read by the pod-scoped check.
    ///
    /// Setting both this and `--keyvault-secret-name` selects the pod-scoped
    /// check instead of the cluster-wide check.
    #[arg(long, env = "IDENTITY_VALIDATOR_KEYVAULT_NAME")]
    pub keyvault_name: Option<String>,

    /// The secret read by the pod-scoped check.
    #[arg(long, env = "IDENTITY_VALIDATOR_KEYVAULT_SECRET_NAME")]
    pub keyvault_secret_name: Option<String>,

    /// The secret version, defaults to the latest version.
    #[arg(long, env = "IDENTITY_VALIDATOR_KEYVAULT_SECRET_VERSION")]
    pub keyvault_secret_version: Option<String>,

    /// Overrides the managed identity endpoint.
    ///
    /// By default the endpoint comes from `MSI_ENDPOINT`, or the instance
    /// metadata service if that is not set.
    #[arg(long, env = "IDENTITY_VALIDATOR_MSI_ENDPOINT")]
    pub msi_endpoint: Option<String>,

    /// The deadline for the whole run.
    #[arg(long, env = "IDENTITY_VALIDATOR_TIMEOUT", value_parser = parse_duration, default_value = "150s")]
    pub timeout: Duration,

    /// Log at DEBUG level.
    #[arg(long, env = "IDENTITY_VALIDATOR_VERBOSE", default_value_t = false)]
    pub verbose: bool,

    #[arg(long, env = "E2E_TEST_POD_NAME", hide = true)]
    pub pod_name: Option<String>,

    #[arg(long, env = "E2E_TEST_POD_NAMESPACE", hide = true)]
    pub pod_namespace: Option<String>,

    #[arg(long, env = "E2E_TEST_POD_IP", hide = true)]
    pub pod_ip: Option<String>,
}

impl Args {
    /// Validates the arguments after parsing.
    pub fn validate(&self) -> Result<()> {
        self.run_config().map(|_| ())
    }

    /// Resolves the arguments into the configuration for one run.
    pub fn run_config(&self) -> Result<RunConfig> {
        if self.timeout.is_zero() {
            return Err(Error::configuration(
                "invalid --timeout, should be > 0",
            ));
        }
        let selector = IdentitySelector::from_options(
            self.identity_client_id.as_deref(),
            self.identity_resource_id.as_deref(),
        )
        .map_err(|source| Error::Configuration {
            message: "cannot select the identity".to_string(),
            source: Some(source),
        })?;
        let mode = Mode::select(
            self.keyvault_name.as_deref(),
            self.keyvault_secret_name.as_deref(),
            self.keyvault_secret_version.as_deref(),
            self.subscription_id.as_deref(),
            self.resource_group.as_deref(),
        )?;
        Ok(RunConfig::new(mode, selector).with_timeout(self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResourceGroupRef, SecretRef};
    use std::error::Error as _;
    use workload_identity_auth::errors::CredentialsError;
    use test_case::test_case;

    #[test]
    fn validate_cluster_wide() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "program",
            "--subscription-id=sub1",
            "--resource-group=rg1",
        ])?;
        let got = args.run_config()?;
        assert_eq!(
            got.mode,
            Mode::ClusterWide(ResourceGroupRef::new("sub1", "rg1"))
        );
        assert_eq!(got.selector, IdentitySelector::Ambient);
        assert_eq!(got.timeout, Duration::from_secs(150));
        Ok(())
    }

    #[test]
    fn validate_pod_scoped() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "program",
            "--keyvault-name=kv1",
            "--keyvault-secret-name=sec1",
            "--keyvault-secret-version=v1",
            "--identity-client-id=client-1",
            "--timeout=30s",
        ])?;
        let got = args.run_config()?;
        assert_eq!(
            got.mode,
            Mode::PodScoped(SecretRef::new("kv1", "sec1").with_version("v1"))
        );
        assert_eq!(got.selector, IdentitySelector::ClientId("client-1".into()));
        assert_eq!(got.timeout, Duration::from_secs(30));
        Ok(())
    }

    #[test]
    fn validate_resource_id() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "program",
            "--subscription-id=sub1",
            "--resource-group=rg1",
            "--identity-resource-id=/subscriptions/sub1/id1",
        ])?;
        let got = args.run_config()?;
        assert_eq!(
            got.selector,
            IdentitySelector::ResourceId("/subscriptions/sub1/id1".into())
        );
        Ok(())
    }

    #[test_case(&["program"]; "nothing set")]
    #[test_case(&["program", "--subscription-id=sub1"]; "missing resource group")]
    #[test_case(&["program", "--keyvault-name=kv1"]; "vault without secret or group")]
    #[test_case(&["program", "--subscription-id=sub1", "--resource-group=rg1", "--timeout=0s"]; "zero timeout")]
    #[test_case(&["program", "--subscription-id=sub1", "--resource-group=rg1", "--identity-client-id=c", "--identity-resource-id=r"]; "both identities")]
    fn validate(input: &[&str]) -> anyhow::Result<()> {
        let args = Args::try_parse_from(input)?;
        let got = args.validate();
        assert!(
            matches!(got, Err(Error::Configuration { .. })),
            "{got:?} {args:?}"
        );
        Ok(())
    }

    #[test]
    fn both_identities_keep_cause() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "program",
            "--subscription-id=sub1",
            "--resource-group=rg1",
            "--identity-client-id=client-1",
            "--identity-resource-id=/subscriptions/sub1/id1",
        ])?;
        let err = args.run_config().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{err:?}");
        assert_eq!(err.step(), None);
        let source = err
            .source()
            .and_then(|e| e.downcast_ref::<CredentialsError>())
            .expect("the selector error is kept as the cause");
        assert!(source.is_configuration(), "{source:?}");
        assert!(source.to_string().contains("identity-resource-id"), "{source}");
        Ok(())
    }

    #[test]
    fn bad_timeout() {
        let got = Args::try_parse_from(["program", "--timeout=soon"]);
        assert!(got.is_err(), "{got:?}");
    }
}
