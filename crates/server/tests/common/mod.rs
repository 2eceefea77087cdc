//! Common test utilities for E2E testing.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by a SQLite catalog in a temporary directory, enabling
//! E2E testing of the HTTP surface without a running process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use pansearch_core::config::{
    AuthConfig, DatabaseConfig, SearchConfig, ServerConfig, TelemetryConfig,
};
use pansearch_core::{
    create_authenticator, create_telemetry_system, AuthMethod, Authenticator, CatalogStore,
    Category, Config, NewCategory, Resource, SqliteCatalog,
};

/// Re-export fixtures for test convenience
pub use pansearch_core::testing::fixtures;

/// Test fixture for E2E testing against a real SQLite catalog.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     let movies = fixture.category("movie", "Movies");
///     fixture.add_resource(fixtures::resource("r1", "Linux Guide", movies.id));
///
///     let response = fixture.get("/api/v1/resources/search?q=Linux").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Catalog behind the router, for seeding and inspection
    pub catalog: Arc<SqliteCatalog>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of the response envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestFixture {
    /// Create a new test fixture with no authentication.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let auth = AuthConfig::new(test_config.auth_method, test_config.api_key);
        let authenticator: Arc<dyn Authenticator> =
            Arc::from(create_authenticator(&auth).expect("Failed to create authenticator"));

        let config = Config {
            auth,
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            search: SearchConfig::default(),
            telemetry: TelemetryConfig::default(),
        };

        let catalog = Arc::new(SqliteCatalog::new(&db_path).expect("Failed to create catalog"));

        // Search telemetry lands in the same database
        let (telemetry, writer) =
            create_telemetry_system(Arc::clone(&catalog) as Arc<dyn CatalogStore>, 100);
        tokio::spawn(writer.run());

        let state = Arc::new(pansearch_server::state::AppState::new(
            config,
            authenticator,
            Arc::clone(&catalog) as Arc<dyn CatalogStore>,
            telemetry,
        ));

        let router = pansearch_server::api::create_router(state);

        Self {
            router,
            catalog,
            temp_dir,
        }
    }

    /// Insert a category.
    pub fn category(&self, value: &str, label: &str) -> Category {
        let sort_order = self
            .catalog
            .active_categories()
            .map(|c| c.len() as i32)
            .unwrap_or(0);
        self.catalog
            .insert_category(&NewCategory::new(value, label, sort_order))
            .expect("Failed to insert category")
    }

    /// Insert a resource.
    pub fn add_resource(&self, resource: Resource) {
        self.catalog
            .insert_resource(&resource)
            .expect("Failed to insert resource");
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, &[]).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.request("GET", path, None, headers).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), &[]).await
    }

    /// Send a POST request with JSON body and extra headers.
    pub async fn post_with_headers(
        &self,
        path: &str,
        body: Value,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        self.request("POST", path, Some(body), headers).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub auth_method: AuthMethod,
    pub api_key: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            auth_method: AuthMethod::None,
            api_key: None,
        }
    }
}

impl TestConfig {
    /// Create config with the placeholder token gate.
    pub fn with_placeholder_auth() -> Self {
        Self {
            auth_method: AuthMethod::Placeholder,
            api_key: None,
        }
    }

    /// Create config with the shared API key gate.
    pub fn with_api_key(key: &str) -> Self {
        Self {
            auth_method: AuthMethod::ApiKey,
            api_key: Some(key.to_string()),
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
