//! JWT token handling
//!
//! Tokens are HS256 JWTs (`header.payload.signature`, each segment
//! base64url without padding). The claims carry only the subject and the
//! issue/expiry timestamps; roles and enablement are re-resolved from the
//! user store on every request.

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::models::User;
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at, seconds since epoch
    pub iat: i64,
    /// Expiration time, seconds since epoch
    pub exp: i64,
}

impl Claims {
    /// Subject parsed back into a user id
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Issues and validates signed tokens with a single process-wide secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: &[u8], lifetime: chrono::Duration) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::Config("Token signing secret must not be empty".to_string()));
        }
        if lifetime <= chrono::Duration::zero() {
            return Err(Error::Config("Token lifetime must be positive".to_string()));
        }

        // Expiry is checked against our own clock after the signature,
        // so the library only verifies structure and signature.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        Self::new(config.secret.as_bytes(), config.token_lifetime()?)
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn lifetime(&self) -> chrono::Duration {
        self.lifetime
    }

    /// Create a signed token for the user
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = self.clock.now();
        let expires = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| Error::Config("Token lifetime overflows the expiry time".to_string()))?;
        let claims = Claims {
            sub: user.id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)?;
        tracing::debug!(user_id = user.id, exp = claims.exp, "Issued token");
        Ok(token)
    }

    /// Validate and decode a token
    ///
    /// Checks run in order: structure (`Malformed`), signature
    /// (`SignatureInvalid`), expiry (`Expired`). Nothing is mutated.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        check_structure(token)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                // The header already decoded, so a base64 failure here can
                // only come from the signature segment.
                ErrorKind::InvalidSignature | ErrorKind::Base64(_) => Error::SignatureInvalid,
                ErrorKind::ExpiredSignature => Error::Expired,
                _ => Error::Malformed,
            })?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(Error::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Reject anything that is not three non-empty base64url segments with an
/// HS256 header, before any signature work is done.
fn check_structure(token: &str) -> Result<()> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(Error::Malformed);
    }

    let is_base64url = |s: &str| {
        !s.is_empty()
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    };
    if !segments.iter().all(|s| is_base64url(s)) {
        return Err(Error::Malformed);
    }

    let header = decode_header(token).map_err(|_| Error::Malformed)?;
    if header.alg != ALGORITHM {
        return Err(Error::Malformed);
    }

    Ok(())
}
