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
use crate::errors::CredentialsError;
use crate::msi::{MSI_DEFAULT_ENDPOINT, MSI_ENDPOINT_ENV_VAR};
use std::time::Duration;
use url::Url;

/// The timeout applied to a validation run unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(150);

/// The resolved credential broker endpoint.
///
/// Created once at start up and never modified afterwards. The timeout is the
/// budget for all the calls made in one run, see
/// [Deadline][crate::deadline::Deadline].
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointDescriptor {
    url: Url,
    timeout: Duration,
}

impl EndpointDescriptor {
    /// Resolves the broker endpoint reachable from this host.
    ///
    /// The endpoint is, in order of precedence:
    /// * `endpoint_override`, if set and not empty,
    /// * the `MSI_ENDPOINT` environment variable, if set and not empty,
    /// * the well-known Instance Metadata Service token endpoint.
    ///
    /// Fails with an [endpoint unavailable][CredentialsError::is_endpoint_unavailable]
    /// error if the resolved value is not an absolute `http` or `https` URL.
    pub fn locate(endpoint_override: Option<&str>) -> Result<Self> {
        let (candidate, origin) = Self::resolve(endpoint_override);
        let url = Url::parse(&candidate).map_err(|e| {
            CredentialsError::endpoint_unavailable_from(
                format!("{origin} value {candidate:?} is not a valid URL"),
                e,
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(CredentialsError::endpoint_unavailable(format!(
                "{origin} value {candidate:?} is not an http(s) URL"
            )));
        }
        Ok(Self {
            url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    fn resolve(endpoint_override: Option<&str>) -> (String, &'static str) {
        if let Some(e) = endpoint_override.filter(|e| !e.is_empty()) {
            return (e.to_string(), "the endpoint override");
        }
        match std::env::var(MSI_ENDPOINT_ENV_VAR) {
            Ok(e) if !e.is_empty() => (e, "the MSI_ENDPOINT environment variable"),
            _ => (MSI_DEFAULT_ENDPOINT.to_string(), "the default endpoint"),
        }
    }

    /// Replaces the run timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
