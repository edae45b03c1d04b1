//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use devclub_client::{
    ApiClient, HistoryNavigator, MemoryTokenStore, Navigator, RecordingNotifier, Route,
    SessionContext, TokenStore,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;

/// Mock backend plus a client wired to in-memory session state
pub struct TestApp {
    pub server: MockServer,
    pub store: Arc<MemoryTokenStore>,
    pub navigator: Arc<HistoryNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub api: ApiClient,
}

impl TestApp {
    /// Signed-out app on the home page
    pub async fn start() -> Self {
        Self::build(MemoryTokenStore::new(), Route::Home, Duration::from_secs(5)).await
    }

    /// App holding `token`, on the dashboard
    pub async fn signed_in(token: &str) -> Self {
        Self::build(
            MemoryTokenStore::with_token(token),
            Route::AdminDashboard,
            Duration::from_secs(5),
        )
        .await
    }

    /// Signed-in app with a short request timeout
    pub async fn with_timeout(token: &str, timeout: Duration) -> Self {
        Self::build(
            MemoryTokenStore::with_token(token),
            Route::AdminDashboard,
            timeout,
        )
        .await
    }

    async fn build(store: MemoryTokenStore, route: Route, timeout: Duration) -> Self {
        init_test_logging();

        let server = MockServer::start().await;
        let store = Arc::new(store);
        let navigator = Arc::new(HistoryNavigator::starting_at(route));
        let session = SessionContext::new(store.clone(), navigator.clone());
        let api = ApiClient::with_timeout(format!("{}/api", server.uri()), timeout, session)
            .expect("client should build");

        Self {
            server,
            store,
            navigator,
            notifier: Arc::new(RecordingNotifier::new()),
            api,
        }
    }

    /// Token currently in the store
    pub fn token(&self) -> Option<String> {
        self.store.get()
    }

    /// Route currently shown
    pub fn route(&self) -> Route {
        self.navigator.current()
    }

    /// Move to `route` as if the user had followed a link
    pub fn navigate_to(&self, route: Route) {
        self.navigator.navigate(route);
    }
}
