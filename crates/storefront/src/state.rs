//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::BackendClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration and the backend
/// API client; everything per-user lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = BackendClient::new(&config.backend);
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    /// The storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The backend food-court API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Full URL for an uploaded image on the backend origin.
    #[must_use]
    pub fn image_url(&self, image_path: &str) -> String {
        self.inner.config.backend.image_url(image_path)
    }
}
