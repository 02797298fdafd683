use std::sync::Arc;

use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::Role;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserName;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::service::AccountService;
use account_service::inbound::http::cookies::CookieSettings;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use auth::PasswordHasher;
use auth::TokenService;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub token_service: TokenService,
    password_hasher: PasswordHasher,
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

        let repository = Arc::new(InMemoryUserRepository::new());

        // Cheap work factor keeps the suite fast
        let password_hasher =
            PasswordHasher::with_params(1024, 1, 1).expect("Failed to build password hasher");

        let account_service = Arc::new(AccountService::with_password_hasher(
            Arc::clone(&repository),
            password_hasher.clone(),
        ));

        let token_service = Arc::new(TokenService::new(TEST_SECRET, chrono::Duration::days(90)));
        let cookies = CookieSettings::new(chrono::Duration::days(90), false);

        let router = create_router(account_service, token_service, cookies);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            api_client: Self::client(),
            token_service: TokenService::new(TEST_SECRET, chrono::Duration::days(90)),
            password_hasher,
        }
    }

    /// Fresh client with its own cookie jar
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create reqwest client")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/users{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Sign up through the API and return the response body.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/signup")
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "passwordConfirm": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Sign up and return the issued token and the new user's id.
    pub async fn signup_token(&self, name: &str, email: &str, password: &str) -> (String, String) {
        let body = self.signup(name, email, password).await;
        (
            body["token"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Insert an administrator directly into the store and log in as them.
    pub async fn admin_token(&self) -> String {
        let mut admin = User::new(
            UserName::new("admin".to_string()).unwrap(),
            EmailAddress::new("admin@example.com".to_string()).unwrap(),
            self.password_hasher.hash("admin-pass").unwrap(),
        );
        admin.role = Role::Admin;
        self.repository
            .create(admin)
            .await
            .expect("Failed to seed admin");

        let response = self
            .post("/login")
            .json(&json!({"email": "admin@example.com", "password": "admin-pass"}))
            .send()
            .await
            .expect("Failed to execute request");

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().unwrap().to_string()
    }
}
