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

//! Errors returned while locating the broker or using it to obtain tokens.

use http::StatusCode;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Represents an error locating the credential broker or obtaining a token
/// from it.
///
/// None of these errors are retried. The validator is a diagnostic, any
/// failure is reported and terminates the run. Use the `is_*` predicates to
/// examine the cause, and [source][StdError::source] to walk the chain of
/// underlying errors.
///
/// # Example
/// ```
/// # use workload_identity_auth::errors::CredentialsError;
/// let err = CredentialsError::configuration("simulated bad configuration");
/// assert!(err.is_configuration());
/// assert!(format!("{err}").contains("simulated bad configuration"));
/// ```
#[derive(Debug)]
pub struct CredentialsError {
    kind: ErrorKind,
    source: Option<BoxError>,
}

#[derive(Debug)]
enum ErrorKind {
    EndpointUnavailable(String),
    Configuration(String),
    Request(String),
    Broker { status: StatusCode, message: String },
    ResponseParse(String),
    RefreshFailed,
    EmptyToken,
    Timeout,
}

impl CredentialsError {
    /// The local platform does not expose a usable credential broker.
    pub fn endpoint_unavailable<T: Into<String>>(message: T) -> Self {
        Self {
            kind: ErrorKind::EndpointUnavailable(message.into()),
            source: None,
        }
    }

    /// Like [endpoint_unavailable][Self::endpoint_unavailable], keeping the
    /// underlying cause.
    pub fn endpoint_unavailable_from<T, E>(message: T, source: E) -> Self
    where
        T: Into<String>,
        E: Into<BoxError>,
    {
        Self {
            kind: ErrorKind::EndpointUnavailable(message.into()),
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the broker endpoint could not be located.
    pub fn is_endpoint_unavailable(&self) -> bool {
        matches!(self.kind, ErrorKind::EndpointUnavailable(_))
    }

    /// The identity selection is contradictory or incomplete.
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self {
            kind: ErrorKind::Configuration(message.into()),
            source: None,
        }
    }

    /// Returns `true` if the identity selection was rejected before any
    /// request was made.
    pub fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration(_))
    }

    pub(crate) fn request<E: Into<BoxError>>(url: &url::Url, source: E) -> Self {
        Self {
            kind: ErrorKind::Request(url.to_string()),
            source: Some(source.into()),
        }
    }

    /// Maps a transport error, preserving client-side timeouts as
    /// [is_timeout][Self::is_timeout] errors.
    pub(crate) fn from_http_error(url: &url::Url, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::timeout(e);
        }
        Self::request(url, e)
    }

    /// Returns `true` if the token request could not be sent, or its response
    /// could not be received.
    pub fn is_request(&self) -> bool {
        matches!(self.kind, ErrorKind::Request(_))
    }

    /// Creates an error from a non-successful broker response.
    ///
    /// The broker reports failures as a JSON object with `error` and
    /// `error_description` fields. If the body has that shape the message
    /// uses those fields, otherwise it uses the raw body.
    pub(crate) fn broker(status: StatusCode, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct BrokerErrorBody {
            error: String,
            #[serde(default)]
            error_description: String,
        }

        let message = match serde_json::from_slice::<BrokerErrorBody>(body) {
            Ok(b) if b.error_description.is_empty() => b.error,
            Ok(b) => format!("{}: {}", b.error, b.error_description),
            Err(_) => String::from_utf8_lossy(body).trim().to_string(),
        };
        Self {
            kind: ErrorKind::Broker { status, message },
            source: None,
        }
    }

    /// Returns `true` if the broker answered with an error status.
    pub fn is_broker(&self) -> bool {
        matches!(self.kind, ErrorKind::Broker { .. })
    }

    /// The HTTP status code returned by the broker, if any.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Broker { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn response_parse<E: Into<BoxError>>(url: &url::Url, source: E) -> Self {
        Self::response_parse_with_message(
            format!("error unmarshaling token response from {url}"),
            source,
        )
    }

    pub(crate) fn response_parse_with_message<T, E>(message: T, source: E) -> Self
    where
        T: Into<String>,
        E: Into<BoxError>,
    {
        Self {
            kind: ErrorKind::ResponseParse(message.into()),
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the broker answered with a body that is not a token.
    pub fn is_response_parse(&self) -> bool {
        matches!(self.kind, ErrorKind::ResponseParse(_))
    }

    pub(crate) fn refresh_failed(source: CredentialsError) -> Self {
        Self {
            kind: ErrorKind::RefreshFailed,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if refreshing an existing credential failed.
    ///
    /// The underlying error is available via [source][StdError::source].
    pub fn is_refresh_failed(&self) -> bool {
        matches!(self.kind, ErrorKind::RefreshFailed)
    }

    pub(crate) fn empty_token() -> Self {
        Self {
            kind: ErrorKind::EmptyToken,
            source: None,
        }
    }

    /// Returns `true` if the broker reported success but the token is empty.
    pub fn is_empty_token(&self) -> bool {
        matches!(self.kind, ErrorKind::EmptyToken)
    }

    pub(crate) fn timeout<E: Into<BoxError>>(source: E) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the run deadline elapsed before the broker answered.
    ///
    /// A refresh that failed because of a timeout reports
    /// [is_refresh_failed][Self::is_refresh_failed], the timeout is its
    /// source.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }
}

impl Display for CredentialsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.kind {
            ErrorKind::EndpointUnavailable(m) => {
                write!(f, "the managed identity endpoint is unavailable: {m}")
            }
            ErrorKind::Configuration(m) => write!(f, "invalid identity configuration: {m}"),
            ErrorKind::Request(url) => write!(f, "error executing token request to {url}"),
            ErrorKind::Broker { status, message } => write!(
                f,
                "the managed identity endpoint rejected the token request with status {status}: {message}"
            ),
            ErrorKind::ResponseParse(m) => write!(f, "{m}"),
            ErrorKind::RefreshFailed => write!(f, "cannot refresh the managed identity token"),
            ErrorKind::EmptyToken => write!(
                f,
                "the managed identity endpoint reported success but returned an empty token"
            ),
            ErrorKind::Timeout => write!(f, "the deadline elapsed while waiting for a token"),
        }
    }
}

impl StdError for CredentialsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(br#"{"error":"invalid_request","error_description":"Identity not found"}"#, "invalid_request: Identity not found"; "error and description")]
    #[test_case(br#"{"error":"invalid_resource"}"#, "invalid_resource"; "error only")]
    #[test_case(b"upstream connect error", "upstream connect error"; "not json")]
    fn broker_message(body: &[u8], want: &str) {
        let err = CredentialsError::broker(StatusCode::BAD_REQUEST, body);
        assert!(err.is_broker(), "{err:?}");
        assert_eq!(err.http_status_code(), Some(400));
        let got = err.to_string();
        assert!(got.contains(want), "{got}");
        assert!(got.contains("400"), "{got}");
    }

    #[test]
    fn refresh_failed_keeps_cause() {
        let cause = CredentialsError::broker(StatusCode::NOT_FOUND, b"not found");
        let err = CredentialsError::refresh_failed(cause);
        assert!(err.is_refresh_failed(), "{err:?}");
        assert!(!err.is_broker(), "{err:?}");
        let source = err
            .source()
            .and_then(|e| e.downcast_ref::<CredentialsError>())
            .expect("refresh errors keep their cause");
        assert!(source.is_broker(), "{source:?}");
    }

    #[test]
    fn predicates() {
        let err = CredentialsError::endpoint_unavailable("test-only");
        assert!(err.is_endpoint_unavailable(), "{err:?}");
        assert!(err.source().is_none(), "{err:?}");
        assert!(err.to_string().contains("test-only"), "{err}");

        let err = CredentialsError::empty_token();
        assert!(err.is_empty_token(), "{err:?}");
        assert!(!err.is_timeout(), "{err:?}");

        let url = url::Url::parse("http://127.0.0.1/token").unwrap();
        let err = CredentialsError::response_parse(&url, "bad json");
        assert!(err.is_response_parse(), "{err:?}");
        assert!(err.source().is_some(), "{err:?}");
        assert!(err.to_string().contains("http://127.0.0.1/token"), "{err}");

        let err = CredentialsError::timeout("elapsed");
        assert!(err.is_timeout(), "{err:?}");
        assert_eq!(err.http_status_code(), None);
    }
}
