use actix_web::{dev::Payload, error, web, Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AuthError;
use crate::models::CanonicalIdentity;
use crate::session::cookie::SESSION_COOKIE;
use crate::session::token::SessionCodec;

/// Per-request authentication state machine with two states: authenticated
/// (identity attached) and anonymous.
///
/// A missing cookie, a corrupted token, and an expired token are deliberately
/// indistinguishable: all collapse to anonymous.
#[derive(Clone)]
pub struct SessionGate {
    codec: SessionCodec,
}

impl SessionGate {
    #[must_use]
    pub fn new(codec: SessionCodec) -> Self {
        Self { codec }
    }

    /// Informational mode: compute the authentication state without ever
    /// failing the request.
    #[must_use]
    pub fn authenticate(&self, req: &HttpRequest) -> Option<CanonicalIdentity> {
        let cookie = req.cookie(SESSION_COOKIE)?;
        match self.codec.verify(cookie.value()) {
            Ok(identity) => Some(identity),
            Err(_) => {
                log::debug!("rejected session cookie; treating request as anonymous");
                None
            }
        }
    }
}

/// Enforcing mode: extractor for endpoints that require an authenticated
/// caller.
///
/// Rejects with [`AuthError::AuthenticationRequired`] exactly when
/// [`SessionGate::authenticate`] would report anonymous. A gate that was
/// never registered as application data is a wiring bug, not an anonymous
/// caller, and surfaces as a server error instead.
pub struct AuthenticatedUser(pub CanonicalIdentity);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(gate) = req.app_data::<web::Data<SessionGate>>() else {
            log::error!("SessionGate is not registered as application data");
            return ready(Err(error::ErrorInternalServerError(
                "session gate not configured",
            )));
        };
        let result = gate
            .authenticate(req)
            .map(AuthenticatedUser)
            .ok_or_else(|| AuthError::AuthenticationRequired.into());
        ready(result)
    }
}
