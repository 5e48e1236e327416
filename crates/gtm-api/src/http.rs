//! reqwest-backed transport and the Google credential provider

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use serde_json::Value;
use url::Url;

use crate::auth::{Credentials, Scope};
use crate::client::{ClientProvider, TagManagerClient, Transport};
use crate::error::{ApiError, Result};
use crate::request::ApiRequest;

/// Production endpoint of the Tag Manager v2 API
pub const DEFAULT_BASE_URL: &str = "https://tagmanager.googleapis.com/tagmanager/v2/";

/// Sends [`ApiRequest`]s over HTTPS with a bearer token
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl HttpTransport {
    pub fn new(http: reqwest::Client, base_url: Url, access_token: String) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Option<Value>> {
        let url = self.url_for(&request.path)?;
        let mut builder = self
            .http
            .request(request.method.into(), url)
            .bearer_auth(&self.access_token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Tag Manager API returned an error");
            return Err(ApiError::from_response(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}

/// Resolves credentials into bearer tokens and hands out [`HttpTransport`]
/// backed clients
pub struct GoogleClientProvider {
    http: reqwest::Client,
    base_url: Url,
}

impl GoogleClientProvider {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Provider pointed at the production API
    pub fn production() -> Result<Self> {
        Ok(Self::new(Url::parse(DEFAULT_BASE_URL)?))
    }

    async fn access_token(&self, credentials: &Credentials, scopes: &[Scope]) -> Result<String> {
        let scope_urls: Vec<&str> = scopes.iter().map(|s| s.url()).collect();
        match credentials {
            Credentials::AccessToken(token) => {
                if token.trim().is_empty() {
                    return Err(ApiError::Credentials("empty bearer token".to_string()));
                }
                Ok(token.clone())
            }
            Credentials::ServiceAccountKey(path) => {
                let account = CustomServiceAccount::from_file(path)?;
                let token = account.token(&scope_urls).await?;
                Ok(token.as_str().to_string())
            }
            Credentials::ApplicationDefault => {
                let provider = gcp_auth::provider().await?;
                let token = provider.token(&scope_urls).await?;
                Ok(token.as_str().to_string())
            }
        }
    }
}

#[async_trait]
impl ClientProvider for GoogleClientProvider {
    async fn client(
        &self,
        credentials: &Credentials,
        scopes: &[Scope],
    ) -> Result<TagManagerClient> {
        let token = self.access_token(credentials, scopes).await?;
        let transport = HttpTransport::new(self.http.clone(), self.base_url.clone(), token);
        Ok(TagManagerClient::new(std::sync::Arc::new(transport)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_relative_paths_onto_base() {
        let transport = HttpTransport::new(
            reqwest::Client::new(),
            Url::parse(DEFAULT_BASE_URL).unwrap(),
            "token".to_string(),
        );
        let url = transport.url_for("accounts/1/containers/2:snippet").unwrap();
        assert_eq!(
            url.as_str(),
            "https://tagmanager.googleapis.com/tagmanager/v2/accounts/1/containers/2:snippet"
        );
        let url = transport.url_for("/accounts").unwrap();
        assert_eq!(
            url.as_str(),
            "https://tagmanager.googleapis.com/tagmanager/v2/accounts"
        );
    }

    #[tokio::test]
    async fn empty_bearer_token_is_rejected() {
        let provider = GoogleClientProvider::production().unwrap();
        let err = provider
            .client(&Credentials::AccessToken("  ".to_string()), &[Scope::Readonly])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Credentials(_)));
    }

    #[tokio::test]
    async fn missing_key_file_is_a_credentials_error() {
        let provider = GoogleClientProvider::production().unwrap();
        let err = provider
            .client(
                &Credentials::ServiceAccountKey("/nonexistent/key.json".into()),
                &[Scope::Readonly],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Credentials(_)));
    }
}
