//! Credential codec: issue / verify the HS256 bearer token that carries the caller's user id.
//!
//! The token is a compact JWT:
//! - header: `{"alg": "HS256", "typ": "JWT"}`
//! - payload: `{"authorized": true, "exp": <unix seconds>, "user_id": <u64>}`
//!
//! There is no revocation. `exp` (issue time + 6h) is the only way a credential stops working.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecretKey;

/// Validity window of every issued credential.
pub const CREDENTIAL_TTL_HOURS: i64 = 6;

/// HMAC family accepted on verify. Anything else (`none`, RS*, ES*, EdDSA ...) is rejected
/// before the signature is even looked at.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Why a credential was rejected.
///
/// Only used for logging. Callers must collapse every variant into one
/// "unauthenticated" answer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("malformed credential")]
    Malformed,
    #[error("invalid signature")]
    BadSignature,
    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,
    #[error("credential expired")]
    Expired,
    #[error("credential is not marked as authorized")]
    NotAuthorized,
    #[error("failed to sign credential")]
    Signing,
}

impl From<jsonwebtoken::errors::Error> for CredentialError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnexpectedAlgorithm
            }
            ErrorKind::ExpiredSignature => Self::Expired,
            // InvalidToken, Base64, Json (missing / non-u64 user_id), MissingRequiredClaim ...
            _ => Self::Malformed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CredentialClaims {
    authorized: bool,
    exp: i64,
    user_id: u64,
}

/// Issues and verifies credentials with the process-wide secret key.
///
/// Built once at startup and shared read-only (`Arc`) between requests.
#[derive(Clone)]
pub struct CredentialCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("CredentialCodec")
            .field("validation", &self.validation)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl CredentialCodec {
    pub fn new(secret: &SecretKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // `exp` must be present, but it is compared against our own clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(CREDENTIAL_TTL_HOURS),
        }
    }

    pub fn issue(&self, user_id: u64) -> Result<String, CredentialError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a credential as if the current time were `now`.
    pub fn issue_at(&self, user_id: u64, now: DateTime<Utc>) -> Result<String, CredentialError> {
        let claims = CredentialClaims {
            authorized: true,
            exp: (now + self.ttl).timestamp(),
            user_id,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign credential");
            CredentialError::Signing
        })
    }

    pub fn verify(&self, token: &str) -> Result<u64, CredentialError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a credential against the clock value `now`.
    ///
    /// `jsonwebtoken` checks:
    /// - compact structure + base64/JSON decoding of header and payload
    /// - header `alg` is one of HS256/HS384/HS512
    /// - signature
    /// - `exp` is present
    ///
    /// This method additionally checks:
    /// - `now <= exp`
    /// - `authorized == true`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<u64, CredentialError> {
        if token.is_empty() {
            return Err(CredentialError::Malformed);
        }

        let data = jsonwebtoken::decode::<CredentialClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;
        let claims = data.claims;

        if now.timestamp() > claims.exp {
            return Err(CredentialError::Expired);
        }
        if !claims.authorized {
            return Err(CredentialError::NotAuthorized);
        }

        Ok(claims.user_id)
    }
}
