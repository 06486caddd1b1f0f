//! Flash notifications.
//!
//! Toast-style notifications rendered server-side: messages queue in the
//! session and drain into the next page render, where the base layout shows
//! them with an auto-dismiss timer.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Severity of a flash message, matching the four toast styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl FlashLevel {
    /// CSS class suffix used by the base template.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// A transient notification queued for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }
}

/// Append a flash to the session queue.
///
/// Best-effort: a session write failure loses the notification, not the
/// request, so the error is logged and swallowed.
pub async fn push_flash(session: &Session, flash: Flash) {
    let mut queue: Vec<Flash> = session
        .get(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    queue.push(flash);

    if let Err(e) = session.insert(session_keys::FLASH, &queue).await {
        tracing::warn!("Failed to queue flash message: {e}");
    }
}

/// Drain all queued flashes, leaving the queue empty.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    session
        .remove::<Vec<Flash>>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, Session};

    use super::*;

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_queue_and_drain() {
        let session = test_session();

        push_flash(&session, Flash::success("Added to cart")).await;
        push_flash(&session, Flash::error("Login failed")).await;

        let flashes = take_flashes(&session).await;
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].level, FlashLevel::Success);
        assert_eq!(flashes[1].message, "Login failed");

        // Draining empties the queue
        assert!(take_flashes(&session).await.is_empty());
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(FlashLevel::Warning.css_class(), "warning");
        assert_eq!(Flash::info("x").level.css_class(), "info");
    }
}
