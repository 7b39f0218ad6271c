use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and JWT token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

/// Result of successful token issuance.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Absolute expiry of the token
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Default bearer token validity window.
    pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher used for registration and login
    /// * `jwt_handler` - Token signer/verifier
    /// * `token_ttl` - Validity window of issued tokens
    pub fn new(
        password_hasher: PasswordHasher,
        jwt_handler: JwtHandler,
        token_ttl: Duration,
    ) -> Self {
        Self {
            password_hasher,
            jwt_handler,
            token_ttl,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against the stored hash of an account, if there is one.
    ///
    /// Without an account the password is still run through a full
    /// verification against a dummy digest, so both failure paths cost the same.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash, `None` when no account matched
    ///
    /// # Errors
    /// * `InvalidCredentials` - No account or password does not match
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<(), AuthenticationError> {
        let is_valid = match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash)?,
            None => self.password_hasher.verify_dummy(password),
        };

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(())
    }

    /// Issue a bearer token for a subject.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: impl ToString) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::for_subject(subject, self.token_ttl);
        let access_token = self.jwt_handler.encode(&claims)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;

        Ok(AuthenticationResult {
            access_token,
            expires_at,
        })
    }

    /// Validate and decode JWT token.
    ///
    /// # Errors
    /// * `TokenExpired` - Token signature valid but expired
    /// * `InvalidToken` - Token malformed or signature mismatch
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
