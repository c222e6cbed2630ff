use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::ProviderAdapter;
use crate::error::AuthError;
use crate::models::{CanonicalIdentity, Provider};
use crate::settings::ClientCredentials;

const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const EMAILS_URL: &str = "https://api.github.com/user/emails";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    id: i64,
    login: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailEntry {
    email: String,
    primary: bool,
}

/// GitHub OAuth adapter. GitHub splits identity across two profile
/// endpoints, so an exchange makes three outbound calls: token, user,
/// and user-emails.
#[derive(Clone)]
pub struct GitHubAdapter {
    credentials: Option<ClientCredentials>,
    http: reqwest::Client,
}

impl GitHubAdapter {
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
        // GitHub answers with form-encoding unless JSON is requested.
        let response = self
            .http
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({
                "client_id": credentials.client_id,
                "client_secret": credentials.client_secret,
                "code": code,
                "redirect_uri": redirect_uri,
            }))
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

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, AuthError> {
        self.get_json(USER_URL, access_token).await
    }

    async fn fetch_emails(&self, access_token: &str) -> Result<Vec<EmailEntry>, AuthError> {
        self.get_json(EMAILS_URL, access_token).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AuthError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| profile_fetch_failed(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(profile_fetch_failed(format!("{url} returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| profile_fetch_failed(format!("unparseable response from {url}: {e}")))
    }
}

#[async_trait]
impl ProviderAdapter for GitHubAdapter {
    async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<CanonicalIdentity, AuthError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(AuthError::ProviderNotConfigured(Provider::GitHub))?;

        let access_token = self
            .fetch_access_token(credentials, code, redirect_uri)
            .await?;
        let profile = self.fetch_profile(&access_token).await?;
        let emails = self.fetch_emails(&access_token).await?;

        Ok(normalize(profile, &emails))
    }
}

fn normalize(profile: UserProfile, emails: &[EmailEntry]) -> CanonicalIdentity {
    CanonicalIdentity {
        id: profile.id.to_string(),
        email: select_primary_email(emails),
        name: display_name(profile.name, &profile.login),
        provider: Provider::GitHub,
    }
}

/// Select the address flagged primary, falling back to the first listed
/// email, or `None` when the account exposes no email at all.
fn select_primary_email(emails: &[EmailEntry]) -> Option<String> {
    emails
        .iter()
        .find(|e| e.primary)
        .or_else(|| emails.first())
        .map(|e| e.email.clone())
}

/// Profile display name, falling back to the account handle when no display
/// name is set (or it is blank).
fn display_name(name: Option<String>, login: &str) -> String {
    name.filter(|n| !n.is_empty())
        .unwrap_or_else(|| login.to_string())
}

fn token_exchange_failed(reason: String) -> AuthError {
    AuthError::TokenExchangeFailed {
        provider: Provider::GitHub,
        reason,
    }
}

fn profile_fetch_failed(reason: String) -> AuthError {
    AuthError::ProfileFetchFailed {
        provider: Provider::GitHub,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(email: &str, primary: bool) -> EmailEntry {
        EmailEntry {
            email: email.to_string(),
            primary,
        }
    }

    #[test]
    fn test_primary_email_is_preferred() {
        let emails = [entry("a@x.com", false), entry("b@x.com", true)];
        assert_eq!(select_primary_email(&emails).as_deref(), Some("b@x.com"));
    }

    #[test]
    fn test_first_email_when_none_primary() {
        let emails = [entry("a@x.com", false), entry("b@x.com", false)];
        assert_eq!(select_primary_email(&emails).as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_empty_email_list_yields_none() {
        assert_eq!(select_primary_email(&[]), None);
    }

    #[test]
    fn test_display_name_falls_back_to_login() {
        assert_eq!(display_name(None, "octocat"), "octocat");
        assert_eq!(display_name(Some(String::new()), "octocat"), "octocat");
        assert_eq!(
            display_name(Some("The Octocat".to_string()), "octocat"),
            "The Octocat"
        );
    }

    #[test]
    fn test_normalize_stringifies_numeric_id() {
        let identity = normalize(
            UserProfile {
                id: 583_231,
                login: "octocat".to_string(),
                name: None,
            },
            &[],
        );
        assert_eq!(identity.id, "583231");
        assert_eq!(identity.email, None);
        assert_eq!(identity.name, "octocat");
        assert_eq!(identity.provider, Provider::GitHub);
    }

    #[actix_web::test]
    async fn test_unconfigured_adapter_fails_before_network() {
        let adapter = GitHubAdapter::new(None, reqwest::Client::new());
        let result = adapter.exchange("code", "http://localhost/cb").await;
        assert!(matches!(
            result,
            Err(AuthError::ProviderNotConfigured(Provider::GitHub))
        ));
    }
}
