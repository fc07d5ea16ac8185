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
use crate::TokenAcquirer;
use crate::deadline::Deadline;
use crate::errors::CredentialsError;
use crate::selector::IdentitySelector;
use crate::token::Token;
use http::HeaderValue;

/// A managed identity credential for one identity and one audience.
///
/// The credential does not keep tokens between calls. Each
/// [refresh][Self::refresh] asks the broker for a new one.
#[derive(Debug)]
pub struct ManagedIdentityCredential {
    acquirer: TokenAcquirer,
    selector: IdentitySelector,
    resource: String,
}

impl ManagedIdentityCredential {
    pub fn new<S: Into<String>>(
        acquirer: TokenAcquirer,
        selector: IdentitySelector,
        resource: S,
    ) -> Self {
        Self {
            acquirer,
            selector,
            resource: resource.into(),
        }
    }

    /// Obtains a new token from the broker.
    ///
    /// Any failure talking to the broker is reported as a
    /// [refresh failure][CredentialsError::is_refresh_failed], with the
    /// original error as its source. A broker response with an empty token is
    /// reported as an [empty token][CredentialsError::is_empty_token].
    pub async fn refresh(&self, deadline: &Deadline) -> Result<Token> {
        // `acquire` never returns a zero token.
        self.acquirer
            .acquire(&self.selector, &self.resource, deadline)
            .await
            .map_err(|e| {
                if e.is_empty_token() {
                    e
                } else {
                    CredentialsError::refresh_failed(e)
                }
            })
    }
}

/// Authorizes requests with a fixed bearer token.
///
/// # Example
/// ```
/// # use workload_identity_auth::credentials::BearerAuthorizer;
/// # use workload_identity_auth::token::Token;
/// let token = Token {
///     access_token: "test-only".into(),
///     token_type: "Bearer".into(),
///     resource: "https://vault.azure.net".into(),
///     expires_on: None,
/// };
/// let authorizer = BearerAuthorizer::new(token);
/// let header = authorizer.header_value()?;
/// assert!(header.is_sensitive());
/// # Ok::<(), workload_identity_auth::errors::CredentialsError>(())
/// ```
#[derive(Clone, Debug)]
pub struct BearerAuthorizer {
    token: Token,
}

impl BearerAuthorizer {
    pub fn new(token: Token) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The `Authorization:` header value, marked as sensitive.
    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.token.authorization()).map_err(|e| {
            CredentialsError::response_parse_with_message(
                "the token contains characters not allowed in an HTTP header",
                e,
            )
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointDescriptor;
    use crate::msi::RESOURCE_MANAGER_AUDIENCE;
    use crate::token::tests::test_token;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use std::time::Duration;

    fn credential(server: &Server) -> ManagedIdentityCredential {
        let endpoint = EndpointDescriptor::locate(Some(&format!(
            "http://{}/metadata/identity/oauth2/token",
            server.addr()
        )))
        .expect("test endpoint is a valid URL");
        let acquirer = TokenAcquirer::new(&endpoint).expect("test client builds");
        ManagedIdentityCredential::new(
            acquirer,
            IdentitySelector::Ambient,
            RESOURCE_MANAGER_AUDIENCE,
        )
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(30))
    }

    fn token_body(value: &str) -> String {
        json!({
            "access_token": value,
            "expires_on": "4102444800",
            "resource": RESOURCE_MANAGER_AUDIENCE,
            "token_type": "Bearer",
        })
        .to_string()
    }

    #[tokio::test]
    async fn refresh_always_asks_the_broker() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method("GET"))
                .times(2)
                .respond_with(cycle![
                    status_code(200).body(token_body("token-1")),
                    status_code(200).body(token_body("token-2")),
                ]),
        );

        let credential = credential(&server);
        let first = credential.refresh(&deadline()).await?;
        let second = credential.refresh(&deadline()).await?;
        assert_eq!(first.access_token, "token-1");
        assert_eq!(second.access_token, "token-2");
        Ok(())
    }

    #[tokio::test]
    async fn refresh_failed() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method("GET"))
                .respond_with(status_code(404).body("no identity assigned")),
        );

        let err = credential(&server).refresh(&deadline()).await.unwrap_err();
        assert!(err.is_refresh_failed(), "{err:?}");
        let source = std::error::Error::source(&err)
            .and_then(|e| e.downcast_ref::<CredentialsError>())
            .expect("refresh failures keep their cause");
        assert!(source.is_broker(), "{source:?}");
        assert!(source.to_string().contains("no identity assigned"), "{source}");
    }

    #[tokio::test]
    async fn refresh_empty_token() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method("GET"))
                .respond_with(status_code(200).body(token_body(""))),
        );

        let err = credential(&server).refresh(&deadline()).await.unwrap_err();
        assert!(err.is_empty_token(), "{err:?}");
    }

    #[tokio::test]
    async fn refresh_timeout_is_wrapped() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method("GET")).respond_with(delay_and_then(
                Duration::from_secs(5),
                status_code(200).body(token_body("too-late")),
            )),
        );

        let deadline = Deadline::after(Duration::from_millis(100));
        let err = credential(&server).refresh(&deadline).await.unwrap_err();
        assert!(err.is_refresh_failed(), "{err:?}");
        let source = std::error::Error::source(&err)
            .and_then(|e| e.downcast_ref::<CredentialsError>())
            .expect("refresh failures keep their cause");
        assert!(source.is_timeout(), "{source:?}");
    }

    #[test]
    fn bearer_header() -> anyhow::Result<()> {
        let authorizer = BearerAuthorizer::new(test_token("abc"));
        let header = authorizer.header_value()?;
        assert_eq!(header.to_str()?, "Bearer abc");
        assert!(header.is_sensitive());
        assert_eq!(authorizer.token().access_token, "abc");
        Ok(())
    }

    #[test]
    fn bearer_header_rejects_bad_token() {
        let authorizer = BearerAuthorizer::new(test_token("abc\ndef"));
        let err = authorizer.header_value().unwrap_err();
        assert!(err.is_response_parse(), "{err:?}");
    }
}
