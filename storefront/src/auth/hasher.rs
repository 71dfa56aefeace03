//! Password hashing with Argon2id and a server-side pepper.

use argon2::{
    Algorithm, Argon2, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::errors::{AuthError, AuthResult};

pub use argon2::Params as HashParams;

/// One-way password hasher
#[derive(Clone)]
pub struct CredentialHasher {
    pepper: String,
    params: HashParams,
}

impl CredentialHasher {
    /// Create a hasher with the production work factor (19 MiB, 2 passes, 1 lane)
    ///
    /// # Arguments
    ///
    /// * `pepper` - Server-side pepper appended to every password
    pub fn new(pepper: String) -> Self {
        Self::with_params(pepper, HashParams::default())
    }

    /// Create a hasher with explicit Argon2 parameters. Tests use this to keep
    /// hashing cheap.
    pub fn with_params(pepper: String, params: HashParams) -> Self {
        Self { pepper, params }
    }

    /// Hash a plaintext password into a PHC string
    ///
    /// # Errors
    ///
    /// * `AuthError::HashingFailed` - The Argon2 primitive rejected the input
    pub fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", plaintext, self.pepper);
        let salt = SaltString::generate(&mut OsRng);

        Ok(self
            .argon2()
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify a candidate password against a stored hash
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Mismatch, or the stored hash is unparsable
    pub fn verify(&self, hash: &str, candidate: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", candidate, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

        self.argon2()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}
