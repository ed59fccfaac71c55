#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests drive the REAL kernel router and state, backed by the in-memory
//! content store, so no database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use modalink_kernel::config::{Config, EnvironmentType};
use modalink_kernel::content::BlockPipeline;
use modalink_kernel::modal::SupportedBlockSet;
use modalink_kernel::models::{ContentItem, ContentStatus, MemoryContentStore};
use modalink_kernel::routes;
use modalink_kernel::state::AppState;

/// Editor token configured on every test app.
pub const EDITOR_TOKEN: &str = "test-editor-token";

/// Test application wrapper using the real routes and state.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryContentStore>,
    pub state: AppState,
}

impl TestApp {
    /// App with the default test configuration.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(config, SupportedBlockSet::default(), |_| {})
    }

    /// App with a custom supported block set and extra render filters.
    pub fn build(
        config: Config,
        supported_blocks: SupportedBlockSet,
        customize: impl FnOnce(&mut BlockPipeline),
    ) -> Self {
        let store = Arc::new(MemoryContentStore::new());
        let state = AppState::with_pipeline(config, store.clone(), supported_blocks, customize);
        let router = routes::app(state.clone());
        Self {
            router,
            store,
            state,
        }
    }

    /// Insert a content item.
    pub fn insert(&self, item: ContentItem) {
        self.store.insert(item);
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// GET a path without credentials.
    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// GET a path as an editor.
    pub async fn get_as_editor(&self, uri: &str) -> Response {
        self.request(
            Request::get(uri)
                .header(header::AUTHORIZATION, format!("Bearer {EDITOR_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// Configuration used by [`TestApp::new`].
pub fn test_config() -> Config {
    Config {
        site_url: "http://site.test".to_string(),
        environment: EnvironmentType::Production,
        editor_tokens: vec![EDITOR_TOKEN.to_string()],
        ..Config::default()
    }
}

/// A published post.
pub fn post(id: i64, title: &str, body: &str) -> ContentItem {
    ContentItem {
        id,
        item_type: "post".to_string(),
        title: title.to_string(),
        body: body.to_string(),
        excerpt: None,
        status: ContentStatus::Publish,
        created: 1_700_000_000 + id,
    }
}

/// Read a response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
