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

//! Plumbing shared by the Azure REST clients.

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use url::Url;
use workload_identity_auth::credentials::BearerAuthorizer;
use workload_identity_auth::deadline::Deadline;
use workload_identity_auth::errors::CredentialsError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error calling one of the Azure APIs exercised by the checks.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("cannot build a request URL from {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("cannot authorize the request")]
    Authorization(#[source] CredentialsError),
    #[error("error executing request to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("the request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("cannot decode the response from {url}")]
    Deserialization {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("the deadline elapsed while waiting for {url}")]
    Timeout {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("the secret value is empty")]
    EmptySecret,
}

impl ServiceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The HTTP status code returned by the service, if any.
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }

    fn from_http_error(url: &Url, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout {
                url: url.to_string(),
                source: source.into(),
            };
        }
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }
}

/// Appends percent-encoded `segments` and a query to `base`.
pub(crate) fn build_url(
    base: &str,
    segments: &[&str],
    query: &[(&str, &str)],
) -> Result<Url, ServiceError> {
    let invalid = |source: BoxError| ServiceError::InvalidUrl {
        url: base.to_string(),
        source,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.into()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("the URL cannot be a base".into()))?
        .pop_if_empty()
        .extend(segments);
    url.query_pairs_mut().extend_pairs(query);
    Ok(url)
}

/// Sends an authorized `GET` request and decodes the JSON response.
///
/// The whole exchange, including reading the body, is bounded by `deadline`.
pub(crate) async fn get_json<T>(
    client: &reqwest::Client,
    url: Url,
    authorizer: &BearerAuthorizer,
    deadline: &Deadline,
) -> Result<T, ServiceError>
where
    T: DeserializeOwned,
{
    let header = authorizer
        .header_value()
        .map_err(ServiceError::Authorization)?;
    let request = client.get(url.clone()).header(AUTHORIZATION, header);
    let exchange = async {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::from_http_error(&url, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::from_http_error(&url, e))?;
        Ok::<_, ServiceError>((status, body))
    };
    let (status, body) = deadline
        .bound(exchange)
        .await
        .map_err(|e| ServiceError::Timeout {
            url: url.to_string(),
            source: e.into(),
        })??;

    if !status.is_success() {
        return Err(ServiceError::Status {
            url: url.to_string(),
            status,
            body: String::from_utf8_lossy(&body).trim().to_string(),
        });
    }
    serde_json::from_slice(&body).map_err(|source| ServiceError::Deserialization {
        url: url.to_string(),
        source,
    })
}
