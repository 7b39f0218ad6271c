use async_trait::async_trait;

use super::errors::CredentialError;
use super::errors::StoreError;
use super::models::AccessToken;
use super::models::LoginCommand;
use super::models::NewUser;
use super::models::RegisterCommand;
use super::models::RegisteredUser;
use super::models::User;
use super::models::UserId;

/// Port for credential domain service operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated email and password
    ///
    /// # Returns
    /// Identifier and email of the created account
    ///
    /// # Errors
    /// * `DuplicateAccount` - Email is already registered
    /// * `Internal` - Hashing or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<RegisteredUser, CredentialError>;

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Internal` - Verification, signing or storage failed
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, CredentialError>;

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// # Errors
    /// * `TokenInvalid` - Malformed token or signature mismatch
    /// * `TokenExpired` - Signature valid but past expiry
    async fn authenticate(&self, token: &str) -> Result<UserId, CredentialError>;

    /// Retrieve a live (non-deleted) user.
    ///
    /// # Errors
    /// * `UserNotFound` - No live user with this id
    /// * `Internal` - Storage failed
    async fn get_user(&self, id: &UserId) -> Result<User, CredentialError>;
}

/// Persistence operations for user credentials.
///
/// Lookups never return soft-deleted users.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Insert a user unless a live user with the same email exists.
    ///
    /// The check and the insert are one atomic operation.
    ///
    /// # Returns
    /// Stored user with store-assigned id and timestamps
    ///
    /// # Errors
    /// * `UniqueViolation` - Email already registered
    /// * `Database` - Storage operation failed
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Retrieve a live user by exact email.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Retrieve a live user by identifier.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;
}
