use async_trait::async_trait;
use serde::Deserialize;

use super::ProviderAdapter;
use crate::error::AuthError;
use crate::models::{CanonicalIdentity, Provider};
use crate::settings::ClientCredentials;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
    email: Option<String>,
    name: Option<String>,
}

/// Google OAuth2 adapter: authorization-code exchange against the token
/// endpoint followed by a bearer-authenticated userinfo fetch.
#[derive(Clone)]
pub struct GoogleAdapter {
    credentials: Option<ClientCredentials>,
    http: reqwest::Client,
}

impl GoogleAdapter {
    #[must_use]
    pub(super) fn new(credentials: Option<ClientCredentials>, http: reqwest::Client) -> Self {
        Self { credentials, http }
    }

    async fn fetch_access_token(
        &self,
        credentials: &ClientCredentials,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, AuthError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", &credentials.client_id),
                ("client_secret", &credentials.client_secret),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| token_exchange_failed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(token_exchange_failed(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| token_exchange_failed(format!("unparseable token response: {e}")))?;

        token
            .access_token
            .ok_or_else(|| token_exchange_failed("no access token in response".to_string()))
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, AuthError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| profile_fetch_failed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(profile_fetch_failed(format!(
                "userinfo endpoint returned {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| profile_fetch_failed(format!("unparseable userinfo response: {e}")))
    }
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<CanonicalIdentity, AuthError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(AuthError::ProviderNotConfigured(Provider::Google))?;

        let access_token = self
            .fetch_access_token(credentials, code, redirect_uri)
            .await?;
        let info = self.fetch_userinfo(&access_token).await?;

        Ok(normalize(info))
    }
}

/// Map the raw userinfo payload into a canonical identity. A profile without
/// a display name falls back to the email, then to the account id.
fn normalize(info: UserInfo) -> CanonicalIdentity {
    let name = info
        .name
        .filter(|n| !n.is_empty())
        .or_else(|| info.email.clone())
        .unwrap_or_else(|| info.id.clone());

    CanonicalIdentity {
        id: info.id,
        email: info.email,
        name,
        provider: Provider::Google,
    }
}

fn token_exchange_failed(reason: String) -> AuthError {
    AuthError::TokenExchangeFailed {
        provider: Provider::Google,
        reason,
    }
}

fn profile_fetch_failed(reason: String) -> AuthError {
    AuthError::ProfileFetchFailed {
        provider: Provider::Google,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_profile() {
        let identity = normalize(UserInfo {
            id: "g-1".to_string(),
            email: Some("a@gmail.com".to_string()),
            name: Some("Ada".to_string()),
        });
        assert_eq!(identity.id, "g-1");
        assert_eq!(identity.email.as_deref(), Some("a@gmail.com"));
        assert_eq!(identity.name, "Ada");
        assert_eq!(identity.provider, Provider::Google);
    }

    #[test]
    fn test_normalize_name_falls_back_to_email_then_id() {
        let with_email = normalize(UserInfo {
            id: "g-2".to_string(),
            email: Some("b@gmail.com".to_string()),
            name: None,
        });
        assert_eq!(with_email.name, "b@gmail.com");

        let bare = normalize(UserInfo {
            id: "g-3".to_string(),
            email: None,
            name: None,
        });
        assert_eq!(bare.name, "g-3");
    }

    #[actix_web::test]
    async fn test_unconfigured_adapter_fails_before_network() {
        let adapter = GoogleAdapter::new(None, reqwest::Client::new());
        let result = adapter.exchange("code", "http://localhost/cb").await;
        assert!(matches!(
            result,
            Err(AuthError::ProviderNotConfigured(Provider::Google))
        ));
    }
}
