use crate::config::ServerConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Test fixture for setting up the auth server against a mocked identity provider.
///
/// The fixture starts a mock server standing in for the Civo profile, validate and
/// permissions endpoints, configures the application to use it, and provides helper
/// methods for making requests.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     fixture
///         .add_provider_mock(
///             "/oauth/profile",
///             json!({"email": "user@example.com", "user_id": "user-1"}),
///             StatusCode::OK,
///             1,
///         )
///         .await;
///     fixture
///         .add_provider_mock("/v2/permissions", json!([{"code": "compute.read"}]), StatusCode::OK, 1)
///         .await;
///
///     let response = fixture.get_with_token("/oauth2/auth", "token").await;
///     response.assert_status(StatusCode::ACCEPTED);
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub config: ServerConfig,
    /// Mock server for the identity provider
    pub provider_mock: MockServer,
}

impl TestFixture {
    /// Creates a fixture restricted to the `compute.read` permission in account `acct-1`.
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::for_test_with_mocks).await
    }

    /// Creates a fixture whose configuration is derived from the started mock server.
    pub async fn with_config<F>(make_config: F) -> Self
    where
        F: FnOnce(&MockServer) -> ServerConfig,
    {
        Self::setup_logger(LevelFilter::Debug);

        let provider_mock = MockServer::start().await;
        let config = make_config(&provider_mock);

        let state = AppState::for_testing(&config);
        let app = create_app(state);

        Self {
            app,
            config,
            provider_mock,
        }
    }

    /// Initializes the test logger with customized settings.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        Request::builder().method(method).uri(uri.as_ref())
    }

    /// Sends a GET request without credentials.
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a GET request carrying `Authorization: Bearer <token>`.
    pub async fn get_with_token(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// Adds a GET route to the provider mock.
    ///
    /// The mock only answers requests carrying a bearer token and asserts that it is hit
    /// `expected_calls` times when the fixture is dropped.
    pub async fn add_provider_mock(
        &self,
        path: impl Into<String>,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path(path.into()))
            .and(matchers::header_exists("Authorization"))
            .and(matchers::header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.provider_mock)
            .await;
    }
}

/// Response captured by [`TestFixture::send`]
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestResponse {
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "Expected status {} but got {}, body: {}",
            expected, self.status, self.json
        );
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Deserializes the JSON body into `T`
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
