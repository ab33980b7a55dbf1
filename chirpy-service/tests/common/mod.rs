use std::sync::Arc;

use chirpy_service::config::Config;
use chirpy_service::config::DatabaseConfig;
use chirpy_service::config::JwtConfig;
use chirpy_service::config::MembershipConfig;
use chirpy_service::config::ServerConfig;
use chirpy_service::config::SessionConfig;
use chirpy_service::inbound::http::router::create_router;
use chirpy_service::inbound::http::router::AppState;
use chirpy_service::inbound::http::router::Repositories;
use chirpy_service::outbound::repositories::InMemoryStore;
use serde_json::json;
use serde_json::Value;

pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Test application that spawns a real server over the in-memory backend
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

/// Tokens and identity returned by a successful login.
pub struct Session {
    pub user_id: String,
    pub token: String,
    pub refresh_token: String,
}

pub fn test_config(port: u16) -> Config {
    Config {
        server: ServerConfig { http_port: port },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
            issuer: "chirpy".to_string(),
            access_token_ttl_seconds: 3600,
            max_access_token_ttl_seconds: 3600,
            leeway_seconds: 0,
        },
        session: SessionConfig {
            refresh_token_ttl_days: 60,
        },
        membership: MembershipConfig {
            api_key: POLKA_KEY.to_string(),
        },
    }
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

        let store = Arc::new(InMemoryStore::new());
        let repositories = Repositories {
            users: Arc::clone(&store),
            refresh_tokens: Arc::clone(&store),
            chirps: Arc::clone(&store),
            follows: Arc::clone(&store),
            friendships: store,
        };
        let state = AppState::new(repositories, &test_config(port));
        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(self.url(path)).bearer_auth(token)
    }

    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Register an account and return its id.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/users")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> Session {
        self.login_with(json!({ "email": email, "password": password }))
            .await
    }

    pub async fn login_with(&self, body: Value) -> Session {
        let response = self
            .post("/api/login")
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        Session {
            user_id: body["data"]["id"].as_str().unwrap().to_string(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
            refresh_token: body["data"]["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// Register then log in.
    pub async fn signed_up(&self, email: &str) -> Session {
        self.register(email, "pass_word!").await;
        self.login(email, "pass_word!").await
    }

    /// Raise an account to the paid tier through the webhook.
    pub async fn upgrade(&self, user_id: &str) {
        let response = self
            .post("/api/polka/webhooks")
            .header("Authorization", format!("ApiKey {}", POLKA_KEY))
            .json(&json!({ "event": "user.upgraded", "data": { "user_id": user_id } }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
    }

    pub async fn post_chirp(&self, token: &str, body: &str) -> Value {
        let response = self
            .post_authenticated("/api/chirps", token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}
