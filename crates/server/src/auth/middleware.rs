use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Credential from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Error::Authentication("authorization header is not text".into()))?;
    value
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| Error::Authentication("authorization header must be a bearer token".into()))
}

pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let token = bearer_token(req.headers())?.map(str::to_string);
    let identity = state.auth.authenticate(token.as_deref()).await?;

    req.extensions_mut().insert(Ctx::new(identity));

    Ok(next.run(req).await)
}
