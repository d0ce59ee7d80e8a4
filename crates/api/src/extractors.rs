//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use mosaique_common::AppError;

/// Header carrying the caller-derived voter identity.
pub const VOTER_KEY_HEADER: &str = "x-voter-key";

const MAX_VOTER_KEY_LEN: usize = 256;

/// Opaque voter key taken from the `X-Voter-Key` header.
///
/// The calling layer derives it (session, fingerprint); this API only checks
/// that it is present and sane.
#[derive(Clone)]
pub struct VoterKey(pub String);

impl std::fmt::Debug for VoterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VoterKey(..)")
    }
}

impl<S> FromRequestParts<S> for VoterKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(VOTER_KEY_HEADER)
            .ok_or_else(|| {
                tracing::debug!(path = %parts.uri.path(), "Request without X-Voter-Key");
                AppError::BadRequest("Missing X-Voter-Key header".to_string())
            })?
            .to_str()
            .map_err(|_| AppError::BadRequest("X-Voter-Key must be ASCII".to_string()))?
            .trim();

        if value.is_empty() || value.len() > MAX_VOTER_KEY_LEN {
            return Err(AppError::BadRequest(
                "X-Voter-Key must be 1 to 256 characters".to_string(),
            ));
        }

        Ok(Self(value.to_string()))
    }
}
