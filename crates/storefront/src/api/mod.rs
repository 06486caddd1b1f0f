//! Backend food-court API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for accounts, outlets, menus,
//!   favourites and orders - no local sync, direct JSON calls
//! - In-memory caching via `moka` for public catalog reads (5 minute TTL)
//! - Bearer tokens are issued by the backend at login and attached per call
//!
//! # Example
//!
//! ```rust,ignore
//! use nextgen_storefront::api::BackendClient;
//!
//! let client = BackendClient::new(&config.backend);
//!
//! let outlets = client.outlets().await?;
//! let menu = client.outlet_menu(outlets[0].id).await?;
//! ```

mod client;
pub mod types;

pub use client::BackendClient;

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected the request with a message envelope.
    #[error("Backend error ({status}): {message}")]
    Backend {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Message decoded from the `{"message"}` / `{"error"}` envelope.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The call requires a bearer token and none was supplied or it was
    /// rejected.
    #[error("Unauthorized")]
    Unauthorized,
}

impl ApiError {
    /// True for failures worth retry-less degradation to fallback content
    /// (the backend being down, as opposed to it rejecting the request).
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
