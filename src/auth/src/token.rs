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

use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

/// Represents an access token issued by the managed identity endpoint.
#[derive(Clone, PartialEq)]
pub struct Token {
    /// The actual token string.
    ///
    /// This is the value used in `Authorization:` header.
    pub access_token: String,

    /// The type of the token, almost always `"Bearer"`.
    pub token_type: String,

    /// The audience the token was issued for.
    pub resource: String,

    /// The time at which the token expires.
    ///
    /// If `None`, the broker did not report an expiration.
    pub expires_on: Option<OffsetDateTime>,
}

impl Token {
    /// Returns `true` if the token carries no credential at all.
    pub fn is_zero(&self) -> bool {
        self.access_token.is_empty()
    }

    /// Returns `true` if the token has a known expiration in the past.
    pub fn is_expired(&self) -> bool {
        self.expires_on
            .is_some_and(|at| at <= OffsetDateTime::now_utc())
    }

    /// The value for an `Authorization:` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[censored]")
            .field("token_type", &self.token_type)
            .field("resource", &self.resource)
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// The token response from the managed identity endpoint.
///
/// The broker encodes the numeric fields as strings, older proxies use JSON
/// numbers. Both are accepted.
#[derive(Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub(crate) expires_in: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub(crate) expires_on: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub(crate) not_before: Option<i64>,
    #[serde(default)]
    pub(crate) resource: String,
    #[serde(default = "default_token_type")]
    pub(crate) token_type: String,
    #[serde(default)]
    pub(crate) client_id: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) if s.is_empty() => Ok(None),
        Some(NumberOrString::String(s)) => s
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl From<TokenResponse> for Token {
    fn from(response: TokenResponse) -> Self {
        let expires_on = response
            .expires_on
            .and_then(|s| OffsetDateTime::from_unix_timestamp(s).ok())
            .or_else(|| {
                response
                    .expires_in
                    .and_then(|d| OffsetDateTime::now_utc().checked_add(time::Duration::seconds(d)))
            });
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            resource: response.resource,
            expires_on,
        }
    }
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[censored]")
            .field("expires_in", &self.expires_in)
            .field("expires_on", &self.expires_on)
            .field("not_before", &self.not_before)
            .field("resource", &self.resource)
            .field("token_type", &self.token_type)
            .field("client_id", &self.client_id)
            .finish()
    }
}
