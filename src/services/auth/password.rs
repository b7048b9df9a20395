//! Password hashing (argon2id, PHC string format).
//!
//! - A fresh random salt is generated per hash and embedded in the output.
//! - `verify` reads the cost parameters from the stored hash, so changing `PasswordCost`
//!   does not break existing hashes.
//! - Comparison of the derived output is constant-time (done by `password-hash`).

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password does not match")]
    Mismatch,
    #[error("invalid password hash parameters: {0}")]
    Params(argon2::Error),
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
    #[error("stored password hash is not a valid PHC string")]
    InvalidStoredHash,
}

/// Tunable argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    pub fn new(cost: PasswordCost) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(PasswordError::Params)?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?;
        Ok(hash.to_string())
    }

    pub fn verify(&self, stored_hash: &str, candidate: &str) -> Result<(), PasswordError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::InvalidStoredHash)?;

        match self.argon2().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(password_hash::Error::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::Hash(e)),
        }
    }

    /// `hash` on the blocking pool (argon2 is CPU/memory heavy by design).
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, PasswordError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&plaintext))
            .await
            .map_err(|_| PasswordError::Hash(password_hash::Error::Crypto))?
    }

    /// `verify` on the blocking pool.
    pub async fn verify_blocking(
        &self,
        stored_hash: String,
        candidate: String,
    ) -> Result<(), PasswordError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&stored_hash, &candidate))
            .await
            .map_err(|_| PasswordError::Hash(password_hash::Error::Crypto))?
    }
}

#[cfg(test)]
pub(crate) fn test_password_service() -> PasswordService {
    PasswordService::new(PasswordCost {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}
