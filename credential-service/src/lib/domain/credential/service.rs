use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::JwtError;

use super::errors::CredentialError;
use super::errors::StoreError;
use super::models::AccessToken;
use super::models::LoginCommand;
use super::models::NewUser;
use super::models::RegisterCommand;
use super::models::RegisteredUser;
use super::models::User;
use super::models::UserId;
use super::ports::CredentialRepository;
use super::ports::CredentialServicePort;

/// Domain service implementation for registration and login.
///
/// Argon2 work runs on the blocking pool; each call is independent and holds
/// no state between requests.
pub struct CredentialService<R>
where
    R: CredentialRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
}

impl<R> CredentialService<R>
where
    R: CredentialRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn run_blocking<T, F>(&self, task: F) -> Result<T, CredentialError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || task(&authenticator))
            .await
            .map_err(|e| CredentialError::Internal(format!("Blocking task failed: {}", e)))
    }
}

fn classify_store_error(err: StoreError) -> CredentialError {
    match err {
        StoreError::UniqueViolation => CredentialError::DuplicateAccount,
        StoreError::Database(msg) => CredentialError::Internal(msg),
    }
}

#[async_trait]
impl<R> CredentialServicePort for CredentialService<R>
where
    R: CredentialRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<RegisteredUser, CredentialError> {
        let RegisterCommand { email, password } = command;

        let password_hash = self
            .run_blocking(move |authenticator| authenticator.hash_password(password.expose()))
            .await?
            .map_err(|e| CredentialError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = self
            .repository
            .insert_user(NewUser {
                email,
                password_hash,
            })
            .await
            .map_err(|e| {
                if matches!(e, StoreError::UniqueViolation) {
                    tracing::info!("Registration rejected: email already registered");
                }
                classify_store_error(e)
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(RegisteredUser {
            id: user.id,
            email: user.email,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, CredentialError> {
        let LoginCommand { email, password } = command;

        let user = self
            .repository
            .find_user_by_email(&email)
            .await
            .map_err(classify_store_error)?
            .filter(|user| !user.is_deleted());

        // Unknown users still pay for one full verification.
        let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
        self.run_blocking(move |authenticator| {
            authenticator.verify_credentials(&password, stored_hash.as_deref())
        })
        .await?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => CredentialError::InvalidCredentials,
            other => CredentialError::Internal(format!("Password verification failed: {}", other)),
        })?;

        let user = user.ok_or(CredentialError::InvalidCredentials)?;

        let issued = self
            .authenticator
            .issue_token(user.id)
            .map_err(|e| CredentialError::Internal(format!("Token signing failed: {}", e)))?;

        tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "Token issued");

        Ok(AccessToken {
            token: issued.access_token,
            expires_at: issued.expires_at,
        })
    }

    async fn authenticate(&self, token: &str) -> Result<UserId, CredentialError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| match e {
            JwtError::TokenExpired => CredentialError::TokenExpired,
            other => {
                tracing::debug!(error = %other, "Token rejected");
                CredentialError::TokenInvalid
            }
        })?;

        UserId::from_string(&claims.sub).map_err(|_| CredentialError::TokenInvalid)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, CredentialError> {
        self.repository
            .find_user_by_id(id)
            .await
            .map_err(classify_store_error)?
            .filter(|user| !user.is_deleted())
            .ok_or(CredentialError::UserNotFound)
    }
}
