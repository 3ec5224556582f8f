//! Bearer-token extraction at the transport edge.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::errors::GatewayError;

/// The caller's bearer token, taken verbatim from the `Authorization`
/// header. The gateway never inspects or refreshes it; it is handed to
/// the store client wrapped in a per-request credential.
///
/// A missing header rejects with 403 `{"detail": "Not authenticated"}`
/// before the handler runs.
pub struct AccessToken(pub String);

impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|token| AccessToken(token.to_string()))
            .ok_or(GatewayError::NotAuthenticated)
    }
}
