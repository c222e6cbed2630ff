use async_trait::async_trait;

use super::ProviderAdapter;
use crate::error::AuthError;
use crate::models::{CanonicalIdentity, Provider};

/// The fixed identity issued by demo logins.
#[must_use]
pub fn demo_identity() -> CanonicalIdentity {
    CanonicalIdentity {
        id: "demo-user-123".to_string(),
        email: Some("demo@example.com".to_string()),
        name: "Demo User".to_string(),
        provider: Provider::Demo,
    }
}

/// Adapter for environments without provider credentials: no network calls,
/// always the same identity.
#[derive(Clone, Copy)]
pub struct DemoAdapter;

#[async_trait]
impl ProviderAdapter for DemoAdapter {
    async fn exchange(
        &self,
        _code: &str,
        _redirect_uri: &str,
    ) -> Result<CanonicalIdentity, AuthError> {
        Ok(demo_identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_demo_exchange_ignores_inputs() {
        let identity = DemoAdapter.exchange("", "").await.unwrap();
        assert_eq!(identity, demo_identity());
        assert_eq!(identity.id, "demo-user-123");
        assert_eq!(identity.provider, Provider::Demo);
    }
}
