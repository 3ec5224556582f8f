//! Per-request bearer credential in the shape the store client expects.

use chrono::Utc;

/// Wraps the inbound bearer token as a "yields current access token"
/// value for the duration of one request.
///
/// The validity window is a fixed offset, not the real token lifetime;
/// the credential is recreated on every request so it never needs
/// refreshing. Construction cannot fail.
#[derive(Clone, Debug)]
pub struct Credential {
    token: String,
    expires_on: i64,
}

impl Credential {
    /// Fixed validity window in seconds, long enough to cover one request.
    pub const EXPIRES_IN: i64 = 1000;

    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_on: Utc::now().timestamp() + Self::EXPIRES_IN,
        }
    }

    /// The (token, expiry) pair the storage client consumes.
    pub fn access_token(&self) -> (&str, i64) {
        (&self.token, self.expires_on)
    }
}
