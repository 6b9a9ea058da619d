//! Axum extractors forming the two-tier auth gate.
//!
//! The gate resolves a bearer token to an identity through the session
//! manager and nothing else — it never sees password material. The
//! required tier rejects with 401 before the handler runs; the optional
//! tier degrades to anonymous on any resolution failure.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};

use ripple_types::models::{Session, User};

use crate::AppState;
use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved from `Authorization: Bearer {token}`.
///
/// As the required tier, extraction fails with 401 when the header is
/// missing or malformed, the token is unknown, or the session has expired.
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix(BEARER_PREFIX)
            .ok_or_else(|| ApiError::Unauthorized("invalid authorization format".to_string()))?;

        let (user, session) = state.sessions.validate(token)?;

        // Best-effort last-active bookkeeping on every validated use.
        state.sessions.touch(&session);

        Ok(CurrentUser { user, session })
    }
}

/// Optional tier: handlers take `Option<CurrentUser>` and get `None` for
/// anonymous or failed resolution, never an error.
impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(
            <Self as FromRequestParts<AppState>>::from_request_parts(parts, state)
                .await
                .ok(),
        )
    }
}
