//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock platform drivers injected, so complete runs can be driven
//! through the HTTP API without touching any recruiting site.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use jobhound_core::{
    load_config_from_str,
    sequencer::SequencerConfig,
    testing::MockDriver,
    DriverRegistry, Platform, Profile, ReportStore, RunConfig, RunController, RunOrchestrator,
};
use jobhound_server::state::AppState;

/// Re-export fixtures for test convenience
pub use jobhound_core::testing::fixtures;

const TEST_CONFIG: &str = r#"
[profile]
name = "Asha Rao"
email = "asha@example.com"
skills = ["java", "spring boot"]
experience_years = 3

[search]
keywords = ["java"]
locations = ["Bangalore"]
"#;

/// Test fixture for API testing with mock drivers.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_start_run() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/run").await;
///     assert_eq!(response.status, 202);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared application state, for awaiting runs
    pub state: Arc<AppState>,
    /// Mock LinkedIn driver - configure listings and failures
    pub linkedin: Arc<MockDriver>,
    /// Report output location
    pub store: ReportStore,
    /// Temporary directory for report files
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with one matching LinkedIn listing.
    pub fn new() -> Self {
        let linkedin = Arc::new(MockDriver::with_listings(
            Platform::Linkedin,
            vec![
                fixtures::java_listing("https://www.linkedin.com/jobs/view/1"),
                fixtures::unrelated_listing("https://www.linkedin.com/jobs/view/2"),
            ],
        ));
        Self::with_driver(linkedin)
    }

    /// Create a test fixture around a custom driver.
    pub fn with_driver(linkedin: Arc<MockDriver>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = load_config_from_str(TEST_CONFIG).expect("Failed to parse test config");

        let store = ReportStore::new(
            temp_dir.path().join("results.json"),
            temp_dir.path().join("report.txt"),
        );
        let run_config = RunConfig {
            sequencer: SequencerConfig {
                max_applications: None,
                delay: Duration::ZERO,
            },
            ..RunConfig::from(&config)
        };
        let orchestrator = RunOrchestrator::new(
            Arc::new(Profile::from_config(&config.profile, &config.search)),
            DriverRegistry::new().with_driver(linkedin.clone()),
            run_config,
            Some(store.clone()),
        );

        let state = Arc::new(AppState::new(config, RunController::new(orchestrator)));
        let router = jobhound_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            linkedin,
            store,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request without body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

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

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
