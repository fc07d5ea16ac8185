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
use std::fmt::{Display, Formatter};

/// Selects which identity the broker uses to issue a token.
///
/// A host may have several identities assigned to it: at most one
/// system-assigned identity and any number of user-assigned identities. The
/// selector is sent with every token request, there is no process-wide
/// setting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IdentitySelector {
    /// Let the broker pick the sole, or the system-assigned, identity.
    #[default]
    Ambient,
    /// A user-assigned identity, by client id.
    ClientId(String),
    /// A user-assigned identity, by its Azure resource id.
    ResourceId(String),
}

impl IdentitySelector {
    /// Builds a selector from the optional client id and resource id.
    ///
    /// Empty values count as unset. Setting both is rejected: the broker
    /// would have to guess which one takes precedence.
    ///
    /// # Example
    /// ```
    /// # use workload_identity_auth::selector::IdentitySelector;
    /// let selector = IdentitySelector::from_options(Some("00000000-test"), None)?;
    /// assert_eq!(selector, IdentitySelector::ClientId("00000000-test".into()));
    /// # Ok::<(), workload_identity_auth::errors::CredentialsError>(())
    /// ```
    pub fn from_options(client_id: Option<&str>, resource_id: Option<&str>) -> Result<Self> {
        let client_id = client_id.filter(|s| !s.is_empty());
        let resource_id = resource_id.filter(|s| !s.is_empty());
        match (client_id, resource_id) {
            (Some(_), Some(_)) => Err(CredentialsError::configuration(
                "identity-client-id and identity-resource-id are mutually exclusive, set at most one",
            )),
            (Some(id), None) => Ok(Self::ClientId(id.to_string())),
            (None, Some(id)) => Ok(Self::ResourceId(id.to_string())),
            (None, None) => Ok(Self::Ambient),
        }
    }

    /// The query parameter used to disambiguate the identity, if any.
    pub(crate) fn query_parameter(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Ambient => None,
            Self::ClientId(id) => Some(("client_id", id.as_str())),
            Self::ResourceId(id) => Some(("msi_res_id", id.as_str())),
        }
    }
}

impl Display for IdentitySelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ambient => write!(f, "ambient identity"),
            Self::ClientId(id) => write!(f, "user-assigned identity with client id {id}"),
            Self::ResourceId(id) => write!(f, "user-assigned identity with resource id {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None, None, IdentitySelector::Ambient; "unset")]
    #[test_case(Some(""), Some(""), IdentitySelector::Ambient; "empty")]
    #[test_case(Some("client-1"), None, IdentitySelector::ClientId("client-1".into()); "client id")]
    #[test_case(Some("client-1"), Some(""), IdentitySelector::ClientId("client-1".into()); "client id and empty resource id")]
    #[test_case(None, Some("/subscriptions/x/id1"), IdentitySelector::ResourceId("/subscriptions/x/id1".into()); "resource id")]
    fn from_options(client_id: Option<&str>, resource_id: Option<&str>, want: IdentitySelector) {
        let got = IdentitySelector::from_options(client_id, resource_id);
        assert_eq!(got.ok(), Some(want));
    }

    #[test]
    fn from_options_rejects_both() {
        let err = IdentitySelector::from_options(Some("client-1"), Some("/subscriptions/x/id1"))
            .unwrap_err();
        assert!(err.is_configuration(), "{err:?}");
        let msg = err.to_string();
        assert!(msg.contains("identity-client-id"), "{msg}");
        assert!(msg.contains("identity-resource-id"), "{msg}");
    }

    #[test]
    fn query_parameter() {
        assert_eq!(IdentitySelector::Ambient.query_parameter(), None);
        assert_eq!(
            IdentitySelector::ClientId("c".into()).query_parameter(),
            Some(("client_id", "c"))
        );
        assert_eq!(
            IdentitySelector::ResourceId("r".into()).query_parameter(),
            Some(("msi_res_id", "r"))
        );
    }

    #[test]
    fn display() {
        let got = IdentitySelector::ResourceId("/subscriptions/x/id1".into()).to_string();
        assert!(got.contains("/subscriptions/x/id1"), "{got}");
        let got = IdentitySelector::Ambient.to_string();
        assert_eq!(got, "ambient identity");
    }
}
