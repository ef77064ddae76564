//! Connection Authenticator
//!
//! Credentials are HS256 JWTs whose `sub` names an identity in the store.
//! Verification checks signature and expiry, then resolves the identity;
//! nothing is mutated until that has succeeded.

pub mod middleware;

use crate::error::{Error, Result};
use crate::models::Identity;
use crate::store::SqliteStore;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Claims carried by a credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct Authenticator {
    store: SqliteStore,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl Authenticator {
    pub fn new(store: SqliteStore, secret: &[u8], token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            store,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            token_ttl,
        }
    }

    /// Mint a credential for `identity_id`
    pub fn issue(&self, identity_id: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Persistence(format!("token signing failed: {}", e)))
    }

    /// Verify `credential` and resolve the identity it names
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<Identity> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication("missing credential".into()))?;

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!("[Auth] Rejected credential: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    Error::Authentication("credential expired".into())
                }
                _ => Error::Authentication("invalid credential".into()),
            }
        })?;

        match self.store.find_identity(&data.claims.sub).await? {
            Some(identity) => Ok(identity),
            None => {
                warn!("[Auth] Credential for unknown identity {}", data.claims.sub);
                Err(Error::Authentication("unknown identity".into()))
            }
        }
    }
}
