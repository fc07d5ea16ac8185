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
use crate::deadline::Deadline;
use crate::endpoint::EndpointDescriptor;
use crate::errors::CredentialsError;
use crate::selector::IdentitySelector;
use crate::token::{Token, TokenResponse};
use bytes::Bytes;
use reqwest::{Client as ReqwestClient, StatusCode};
use url::Url;

/// Obtains access tokens from the managed identity endpoint.
///
/// All identity selectors go through the same request: a `GET` to the broker
/// with the `Metadata: true` header and the target audience as a query
/// parameter. A user-assigned identity adds either `client_id` or
/// `msi_res_id`. Callers never need to know which one was used.
#[derive(Clone, Debug)]
pub struct TokenAcquirer {
    endpoint: Url,
    inner: ReqwestClient,
}

impl TokenAcquirer {
    /// Creates a new acquirer for the given broker endpoint.
    pub fn new(endpoint: &EndpointDescriptor) -> Result<Self> {
        let inner = ReqwestClient::builder()
            .timeout(endpoint.timeout())
            .build()
            .map_err(|e| CredentialsError::request(endpoint.url(), e))?;
        Ok(Self {
            endpoint: endpoint.url().clone(),
            inner,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches a token for `resource` using the identity chosen by `selector`.
    ///
    /// Returns either a token with a non-empty value or an error, never an
    /// empty token.
    #[tracing::instrument(level = "debug", skip(self, deadline), fields(endpoint = %self.endpoint))]
    pub async fn acquire(
        &self,
        selector: &IdentitySelector,
        resource: &str,
        deadline: &Deadline,
    ) -> Result<Token> {
        let (status, body) = deadline
            .bound(self.exchange(selector, resource))
            .await
            .map_err(CredentialsError::timeout)??;

        if !status.is_success() {
            return Err(CredentialsError::broker(status, &body));
        }

        let response = serde_json::from_slice::<TokenResponse>(&body)
            .map_err(|e| CredentialsError::response_parse(&self.endpoint, e))?;
        let token = Token::from(response);
        if token.is_zero() {
            return Err(CredentialsError::empty_token());
        }
        tracing::debug!(resource = %token.resource, expires_on = ?token.expires_on, "acquired token");
        Ok(token)
    }

    /// Sends the token request and reads the full response body.
    ///
    /// The body is always consumed, even for error statuses, so the
    /// connection is released before the response is interpreted.
    async fn exchange(
        &self,
        selector: &IdentitySelector,
        resource: &str,
    ) -> Result<(StatusCode, Bytes)> {
        let request = self
            .inner
            .get(self.endpoint.clone())
            .header(super::METADATA, super::METADATA_VALUE)
            .query(&[("api-version", super::MSI_API_VERSION), ("resource", resource)]);
        let request = selector
            .query_parameter()
            .into_iter()
            .fold(request, |r, p| r.query(&[p]));

        let response = request
            .send()
            .await
            .map_err(|e| CredentialsError::from_http_error(&self.endpoint, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CredentialsError::from_http_error(&self.endpoint, e))?;
        Ok((status, body))
    }
}
