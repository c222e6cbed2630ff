use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::models::Provider;

/// Failure taxonomy for the login pipeline.
///
/// Every provider-network failure is caught and reclassified into one of the
/// adapter variants; raw transport errors never reach the HTTP surface.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Client credentials for the provider are missing from configuration.
    /// Raised before any network call is attempted.
    #[error("{0} OAuth is not configured")]
    ProviderNotConfigured(Provider),

    /// The provider token endpoint did not return a usable access token.
    #[error("token exchange with {provider} failed: {reason}")]
    TokenExchangeFailed { provider: Provider, reason: String },

    /// A profile call failed or returned no usable identity fields.
    #[error("profile fetch from {provider} failed: {reason}")]
    ProfileFetchFailed { provider: Provider, reason: String },

    /// Signature mismatch, structural corruption, or expiry of a session
    /// token. Carries no detail: an invalid token must be indistinguishable
    /// from a missing one.
    #[error("invalid session token")]
    InvalidToken,

    /// Enforcing-mode session gate rejection.
    #[error("authentication required")]
    AuthenticationRequired,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ProviderNotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ProfileFetchFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::TokenExchangeFailed { .. }
            | Self::InvalidToken
            | Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::ProviderNotConfigured(provider) => format!(
                "{provider} OAuth is not configured. \
                 Set the provider client id and secret in the environment."
            ),
            // Provider-side failure detail stays in the logs.
            Self::TokenExchangeFailed { provider, .. }
            | Self::ProfileFetchFailed { provider, .. } => format!("{provider} login failed"),
            // Invalid credentials degrade to the generic anonymous rejection
            // so the response never reveals why a token was refused.
            Self::InvalidToken | Self::AuthenticationRequired => {
                "Authentication required".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
