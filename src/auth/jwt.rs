use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: &User, ttl_mins: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_mins)).timestamp(),
        }
    }
}

/// Why verification failed. The guard logs these distinctly but collapses
/// both into a single unauthenticated outcome for the caller.
#[derive(Debug, PartialEq)]
pub enum VerifyError {
    Expired,
    Invalid,
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

/// Checks signature and expiry with zero leeway: a token is rejected at
/// and after its `exp` instant.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, VerifyError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => VerifyError::Expired,
        _ => VerifyError::Invalid,
    })
}

/// Decodes the embedded expiry claim WITHOUT verifying the signature.
/// Only used to copy `exp` onto a blacklist row at revocation time; the
/// result must never feed an authorization decision.
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>, String> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| format!("Malformed token: {e}"))?;

    DateTime::from_timestamp(data.claims.exp, 0)
        .ok_or_else(|| "Token carries an out-of-range expiry".to_string())
}
