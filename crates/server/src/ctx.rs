use crate::error::{Error, Result};
use crate::models::Identity;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The authenticated caller of a request or connection
#[derive(Clone, Debug)]
pub struct Ctx {
    identity: Identity,
}

impl Ctx {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Ctx>()
            .cloned()
            .ok_or_else(|| Error::Authentication("no authenticated caller".into()))
    }
}
