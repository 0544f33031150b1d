//! One-way hashing of the web UI password.
//!
//! Digests are argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`)
//! with a fresh random salt each time, so hashing the same password twice
//! gives two different digests. The parameters travel inside the string and
//! `verify` reads them from there.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::error::{PrefsError, Result};

/// One-way transformation applied to credentials before they reach the
/// store. The plaintext is never kept anywhere.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// `memory_kib` and `iterations` are the argon2 memory and time costs.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| PrefsError::Config(format!("invalid credential hashing parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self { params: Params::default() }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PrefsError::Credential(e.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        PasswordHash::new(digest)
            .is_ok_and(|parsed| self.argon2().verify_password(plaintext.as_bytes(), &parsed).is_ok())
    }
}
