use actix_web::cookie::{time::Duration, Cookie, SameSite};

use crate::settings::MAX_SESSION_TTL_HOURS;

/// Name of the session cookie carrying the signed token.
pub const SESSION_COOKIE: &str = "token";

/// Build the session cookie for a freshly minted token.
///
/// Http-only and `SameSite=Lax`; the `Secure` attribute follows the
/// deployment-mode flag. Max-age matches the token TTL so the browser drops
/// the cookie when the token expires.
#[must_use]
pub fn session_cookie(token: String, secure: bool, ttl_hours: u64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::hours(
            i64::try_from(ttl_hours.min(MAX_SESSION_TTL_HOURS)).unwrap_or(1),
        ))
        .finish()
}

/// Create an expired cookie to clear the session on logout.
#[must_use]
pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(-1))
        .finish()
}
