//! Provider adapters: one implementation per identity provider, dispatched
//! through the closed [`Provider`] enum.

pub mod demo;
pub mod github;
pub mod google;

pub use demo::{demo_identity, DemoAdapter};
pub use github::GitHubAdapter;
pub use google::GoogleAdapter;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::AuthError;
use crate::models::{CanonicalIdentity, Provider};
use crate::settings::AuthgateSettings;

/// Bounded timeout applied to every outbound provider call. A timeout
/// surfaces as the failure of whichever call it interrupted.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Exchange an authorization code for a normalized identity.
///
/// Implementations perform at most three outbound network calls and mutate
/// no local state; provider access tokens never outlive one invocation.
#[async_trait]
pub trait ProviderAdapter {
    async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<CanonicalIdentity, AuthError>;
}

/// One adapter per provider, built once at startup and shared across
/// requests. Credentials are resolved at construction time; the adapters
/// themselves are immutable.
#[derive(Clone)]
pub struct ProviderRegistry {
    google: GoogleAdapter,
    github: GitHubAdapter,
    demo: DemoAdapter,
}

impl ProviderRegistry {
    /// Build the registry from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the shared HTTP client cannot be constructed.
    pub fn from_settings(settings: &AuthgateSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("authgate/", env!("CARGO_PKG_VERSION")))
            .timeout(PROVIDER_TIMEOUT)
            .build()?;

        Ok(Self {
            google: GoogleAdapter::new(settings.resolve_credentials(Provider::Google), http.clone()),
            github: GitHubAdapter::new(settings.resolve_credentials(Provider::GitHub), http),
            demo: DemoAdapter,
        })
    }

    /// Dispatch to the adapter for `provider`. The match is exhaustive: a new
    /// provider variant cannot be added without wiring an adapter here.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`AuthError`].
    pub async fn exchange(
        &self,
        provider: Provider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<CanonicalIdentity, AuthError> {
        match provider {
            Provider::Google => self.google.exchange(code, redirect_uri).await,
            Provider::GitHub => self.github.exchange(code, redirect_uri).await,
            Provider::Demo => self.demo.exchange(code, redirect_uri).await,
        }
    }
}
