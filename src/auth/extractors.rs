use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use crate::{auth::sessions, error::AppError, state::AppState};

/// Authenticated caller, resolved from the session cookie.
pub struct CurrentUser(pub Uuid);

/// Best-effort caller identity; anonymous requests resolve to `None`.
pub struct MaybeUser(pub Option<Uuid>);

/// Raw session token from the cookie, when one is present.
pub struct SessionToken(pub Option<String>);

fn token_from_parts<'a>(parts: &'a Parts, cookie_name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| sessions::token_from_cookie_header(h, cookie_name))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = token_from_parts(parts, &state.config.session.cookie_name) else {
            return Err(AppError::Forbidden("User not logged in".into()));
        };

        match sessions::resolve(&state.db, token).await? {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => {
                warn!("request with unknown session token");
                Err(AppError::Forbidden("User not logged in".into()))
            }
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = token_from_parts(parts, &state.config.session.cookie_name) else {
            return Ok(MaybeUser(None));
        };
        let user_id = sessions::resolve(&state.db, token).await.ok().flatten();
        Ok(MaybeUser(user_id))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts, &state.config.session.cookie_name);
        Ok(SessionToken(token.map(str::to_owned)))
    }
}
