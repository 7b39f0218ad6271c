//! Authentication utilities library
//!
//! Provides the identity primitives used by the credential service:
//! - Password hashing (Argon2id, tunable work factor)
//! - JWT token issuance and validation (HS256 only)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new().unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("my_passwordx", &hash).unwrap());
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, JwtHandler, PasswordHasher};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     PasswordHasher::new().unwrap(),
//!     JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap(),
//!     Duration::hours(24),
//! );
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! auth.verify_credentials("password123", Some(&hash)).unwrap();
//! let result = auth.issue_token("user123").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
