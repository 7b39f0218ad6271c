use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Missing,

    #[error("email is not a valid address: {0}")]
    InvalidFormat(String),
}

/// Error for Password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("password is required")]
    Missing,

    #[error("password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// A single violated input constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every constraint a request violated, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl ToString) {
        self.violations.push(FieldViolation {
            field,
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failures reported by the credential store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Unique constraint violated")]
    UniqueViolation,

    #[error("Database error: {0}")]
    Database(String),
}

/// Top-level error for all credential operations.
///
/// Messages of caller-facing variants are safe to return verbatim; `Internal`
/// carries detail for logs only.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("user already exists")]
    DuplicateAccount,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("invalid token")]
    TokenInvalid,

    #[error("token expired")]
    TokenExpired,

    #[error("user not found")]
    UserNotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl CredentialError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialError::Validation(_) => "validation_error",
            CredentialError::DuplicateAccount => "duplicate_account",
            CredentialError::InvalidCredentials => "invalid_credentials",
            CredentialError::TokenInvalid => "token_invalid",
            CredentialError::TokenExpired => "token_expired",
            CredentialError::UserNotFound => "user_not_found",
            CredentialError::Internal(_) => "internal_error",
        }
    }
}
