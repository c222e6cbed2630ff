// Session token codec: HS256 JWTs carrying a canonical identity.
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;

use crate::error::AuthError;
use crate::models::{CanonicalIdentity, Provider};

type HmacSha256 = Hmac<Sha256>;

/// Claims embedded in a session token. The token is the only persisted
/// representation of a session; possession is equivalent to authentication.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    email: Option<String>,
    name: String,
    provider: Provider,
    iat: i64,
    exp: i64,
}

/// Signs canonical identities into session tokens and verifies them back.
///
/// Verification fails closed: signature mismatch, structural corruption, and
/// expiry all collapse to [`AuthError::InvalidToken`]. The signature check
/// goes through `Mac::verify_slice`, which compares in constant time.
#[derive(Clone)]
pub struct SessionCodec {
    secret: String,
}

impl SessionCodec {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Produce a signed token embedding `identity` with expiry `now + ttl`.
    ///
    /// # Errors
    ///
    /// Returns an error if claim serialization or keying fails.
    pub fn mint(&self, identity: &CanonicalIdentity, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            provider: identity.provider,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let header_b64 =
            general_purpose::URL_SAFE_NO_PAD.encode(serde_json::to_string(&header)?.as_bytes());
        let claims_b64 =
            general_purpose::URL_SAFE_NO_PAD.encode(serde_json::to_string(&claims)?.as_bytes());

        let message = format!("{header_b64}.{claims_b64}");
        let signature = self.sign(message.as_bytes())?;
        let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{message}.{signature_b64}"))
    }

    /// Return the embedded identity iff the signature is valid for the
    /// current secret and the token has not expired.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for every failure mode.
    pub fn verify(&self, token: &str) -> Result<CanonicalIdentity, AuthError> {
        let (message, signature_b64) = token.rsplit_once('.').ok_or(AuthError::InvalidToken)?;
        let signature = general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac =
            HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|_| AuthError::InvalidToken)?;
        mac.update(message.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let (_header_b64, claims_b64) = message.split_once('.').ok_or(AuthError::InvalidToken)?;
        let claims_bytes = general_purpose::URL_SAFE_NO_PAD
            .decode(claims_b64)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: SessionClaims =
            serde_json::from_slice(&claims_bytes).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::InvalidToken);
        }

        Ok(CanonicalIdentity {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            provider: claims.provider,
        })
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| anyhow!("invalid HMAC key: {e}"))?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
