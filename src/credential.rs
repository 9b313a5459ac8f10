use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Bearer token plus the principal it was issued for.
///
/// Attached to requests as two separate headers. The token is opaque to this
/// crate; [`Credential::expires_at`] only peeks at the JWT `exp` claim and
/// never verifies the signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    user_name: String,
    token: String,
}

impl Credential {
    pub fn new(user_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            token: token.into(),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Expiry embedded in the token, when it is a JWT with a numeric `exp` claim.
    pub fn expires_at(&self) -> Option<SystemTime> {
        let exp = unverified_claims(&self.token)?.get("exp")?.as_f64()?;
        UNIX_EPOCH.checked_add(Duration::try_from_secs_f64(exp).ok()?)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user_name", &self.user_name)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn unverified_claims(token: &str) -> Option<Value> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims.is_object().then_some(claims)
}
