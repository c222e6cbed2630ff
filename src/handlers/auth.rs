// Login, status, and logout handlers: the glue between the HTTP surface and
// the adapter/codec/gate pipeline.
use actix_web::{error, web, HttpRequest, HttpResponse, Result};
use chrono::{Duration, Utc};
use log::{error as log_error, info};
use serde::Deserialize;
use serde_json::json;

use crate::models::{CanonicalIdentity, Provider};
use crate::providers::ProviderRegistry;
use crate::session::cookie::{expired_session_cookie, session_cookie};
use crate::session::gate::{AuthenticatedUser, SessionGate};
use crate::session::token::SessionCodec;
use crate::settings::{AuthgateSettings, MAX_SESSION_TTL_HOURS};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub code: String,
    /// Must exactly match the URI used to obtain the code; the provider
    /// enforces the comparison.
    pub redirect_uri: String,
}

/// OAuth login handler for `POST /auth/{provider}`.
///
/// Drives the full exchange: adapter (code to provider token to profile),
/// then a freshly minted session token delivered as a cookie. The identity in
/// the response body is for display only; later requests re-derive it from
/// the token.
///
/// # Errors
///
/// Returns an error if the provider is unconfigured or either provider call
/// fails; see [`crate::error::AuthError`] for the mapping to HTTP statuses.
pub async fn oauth_login(
    path: web::Path<String>,
    body: web::Json<LoginRequest>,
    registry: web::Data<ProviderRegistry>,
    codec: web::Data<SessionCodec>,
    settings: web::Data<AuthgateSettings>,
) -> Result<HttpResponse> {
    let Ok(provider) = path.parse::<Provider>() else {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": format!("Unknown provider: {}", path.as_str())
        })));
    };
    if provider == Provider::Demo {
        // Demo logins go through their own route with no request body.
        return Ok(HttpResponse::NotFound().json(json!({
            "error": format!("Unknown provider: {}", path.as_str())
        })));
    }
    if body.code.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Missing authorization code"
        })));
    }

    let identity = registry
        .exchange(provider, &body.code, &body.redirect_uri)
        .await
        .map_err(|e| {
            log_error!("{provider} login failed: {e}");
            e
        })?;

    issue_session(&identity, &codec, &settings)
}

/// Demo login handler for `POST /auth/demo`: the same pipeline with the
/// fixed-identity adapter and no request body.
///
/// # Errors
///
/// Returns an error only if token minting fails.
pub async fn demo_login(
    registry: web::Data<ProviderRegistry>,
    codec: web::Data<SessionCodec>,
    settings: web::Data<AuthgateSettings>,
) -> Result<HttpResponse> {
    let identity = registry.exchange(Provider::Demo, "", "").await?;
    issue_session(&identity, &codec, &settings)
}

/// Status handler for `GET /auth/status`: informational-mode session gate.
/// Reports the computed state and never rejects the request.
pub async fn auth_status(req: HttpRequest, gate: web::Data<SessionGate>) -> HttpResponse {
    match gate.authenticate(&req) {
        Some(user) => HttpResponse::Ok().json(json!({
            "authenticated": true,
            "user": user
        })),
        None => HttpResponse::Ok().json(json!({ "authenticated": false })),
    }
}

/// Logout handler for `POST /auth/logout`.
///
/// Clears the client's cookie only. There is no server-side revocation: an
/// already-issued token stays valid until its natural expiry.
pub async fn logout(settings: web::Data<AuthgateSettings>) -> HttpResponse {
    info!("user signed out; session cookie cleared");
    HttpResponse::Ok()
        .cookie(expired_session_cookie(settings.cookie_secure()))
        .json(json!({
            "success": true,
            "message": "Logged out successfully"
        }))
}

/// Protected endpoint for `GET /auth/me`: enforcing-mode session gate via the
/// [`AuthenticatedUser`] extractor.
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}

/// Diagnostic endpoint for `GET /auth/test`: reports which providers have
/// credentials configured. Booleans only; credential values never leave the
/// settings.
pub async fn auth_test(settings: web::Data<AuthgateSettings>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Auth server is working!",
        "env": {
            "hasGoogleCredentials": settings.resolve_credentials(Provider::Google).is_some(),
            "hasGithubCredentials": settings.resolve_credentials(Provider::GitHub).is_some(),
            "hasSessionSecret": !settings.session.secret.is_empty(),
        }
    }))
}

/// Health check endpoint.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

/// Mint a session token for `identity` and deliver it as the session cookie.
fn issue_session(
    identity: &CanonicalIdentity,
    codec: &SessionCodec,
    settings: &AuthgateSettings,
) -> Result<HttpResponse> {
    let ttl_hours = settings.session.ttl_hours.min(MAX_SESSION_TTL_HOURS);
    let ttl = Duration::hours(i64::try_from(ttl_hours).unwrap_or(1));
    let token = codec
        .mint(identity, ttl)
        .map_err(error::ErrorInternalServerError)?;

    info!(
        "issued session for {} via {}",
        identity.id, identity.provider
    );

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, settings.cookie_secure(), ttl_hours))
        .json(json!({
            "success": true,
            "user": identity
        })))
}
