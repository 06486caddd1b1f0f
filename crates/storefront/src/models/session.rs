//! Session-related types.
//!
//! The backend issues a bearer token at login; the token and the profile it
//! belongs to travel together as one session value.

use serde::{Deserialize, Serialize};

use nextgen_core::Role;

/// Session-stored user identity.
///
/// Holds the bearer token the backend issued at login plus the display
/// fields the dashboards need. Cleared wholesale on logout; there is no
/// refresh or rotation (the backend token simply expires).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend account id (customer or owner id depending on role).
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Role the token was issued for.
    pub role: Role,
    /// Bearer token presented on authenticated backend calls.
    pub token: String,
}

impl CurrentUser {
    /// Whether this session belongs to an outlet owner.
    #[must_use]
    pub const fn is_owner(&self) -> bool {
        matches!(self.role, Role::Owner)
    }
}

/// Session keys.
pub mod session_keys {
    /// Key for the logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart map.
    pub const CART: &str = "cart_items";

    /// Key for queued flash notifications.
    pub const FLASH: &str = "flash_messages";
}
