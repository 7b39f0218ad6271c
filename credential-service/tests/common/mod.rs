use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashingParams;
use auth::JwtHandler;
use auth::PasswordHasher;
use chrono::Utc;
use credential_service::credential::errors::StoreError;
use credential_service::credential::models::NewUser;
use credential_service::credential::models::User;
use credential_service::credential::models::UserId;
use credential_service::credential::ports::CredentialRepository;
use credential_service::credential::service::CredentialService;
use credential_service::inbound::http::router::create_router;
use uuid::Uuid;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Credential store kept in process memory.
///
/// Insert checks uniqueness under the same lock as the write, like the
/// partial unique index does in PostgreSQL.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryCredentialRepository {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn soft_delete(&self, email: &str) {
        let mut users = self.users.lock().unwrap();
        for user in users.iter_mut() {
            if user.email.as_str() == email && user.deleted_at.is_none() {
                user.deleted_at = Some(Utc::now());
            }
        }
    }

    pub fn password_hash_of(&self, email: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email.as_str() == email && !user.is_deleted())
            .map(|user| user.password_hash.clone())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|existing| existing.email == user.email && !existing.is_deleted())
        {
            return Err(StoreError::UniqueViolation);
        }

        let now = Utc::now();
        let stored = User {
            id: UserId(Uuid::new_v4()),
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.push(stored.clone());

        Ok(stored)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email.as_str() == email && !user.is_deleted())
            .cloned())
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == *id && !user.is_deleted())
            .cloned())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryCredentialRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryCredentialRepository::default());

        let hasher = PasswordHasher::with_params(HashingParams {
            memory_kib: 4096,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");
        let authenticator = Arc::new(Authenticator::new(
            hasher,
            JwtHandler::new(JWT_SECRET).expect("Failed to build JWT handler"),
            chrono::Duration::hours(24),
        ));

        let credential_service = Arc::new(CredentialService::new(
            Arc::clone(&repository),
            authenticator,
        ));
        let router = create_router(credential_service, Duration::from_secs(10));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET).expect("Failed to build JWT handler"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and return the response body.
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/register")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
