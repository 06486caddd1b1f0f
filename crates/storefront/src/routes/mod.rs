//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /outlets                - Outlet directory (optional ?cuisine= filter)
//! GET  /outlets/{id}           - Outlet menu
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one of an entry (returns count badge)
//! POST /cart/update            - Set entry quantity (returns cart_items fragment)
//! POST /cart/remove            - Decrement entry (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /checkout               - Submit the cart as orders (requires auth)
//!
//! # Auth
//! GET  /auth/login             - Login page (customer/owner toggle)
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /orders                 - Customer order history
//! GET  /dashboard/customer     - Customer profile, orders, favourites
//! GET  /dashboard/owner        - Owner outlets and incoming orders
//! GET  /dashboard/owner/outlets/{id}                      - Menu management (?q= search)
//! POST /dashboard/owner/outlets/{id}/menu                 - Add a dish
//! POST /dashboard/owner/outlets/{id}/menu/{menu_id}/update - Rename/reprice a dish
//! POST /dashboard/owner/outlets/{id}/menu/{menu_id}/delete - Remove a dish
//! POST /favourites/{item_id}/toggle - Favourite heart toggle (fragment)
//! ```

pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod favourites;
pub mod home;
pub mod orders;
pub mod outlets;

use axum::{
    Router,
    routing::{get, post},
};
use nextgen_core::Price;
use tower_sessions::Session;

use crate::api::types::{MenuEntry, Outlet};
use crate::flash::{Flash, take_flashes};
use crate::models::{Cart, CurrentUser, session_keys};
use crate::state::AppState;

// =============================================================================
// Shared view models
// =============================================================================

/// Per-page data every full-page template carries: the navbar identity,
/// the cart badge, and drained flash notifications.
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub flashes: Vec<Flash>,
    pub cart_count: u32,
}

impl PageContext {
    /// Assemble the context from the session, draining queued flashes.
    pub async fn build(session: &Session) -> Self {
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let flashes = take_flashes(session).await;
        let cart_count = Cart::load(session).await.total_items();

        Self {
            user,
            flashes,
            cart_count,
        }
    }
}

/// Outlet display data for templates.
#[derive(Clone)]
pub struct OutletCard {
    pub id: i32,
    pub name: String,
    pub cuisine: String,
    pub blurb: String,
    pub image_url: String,
    pub rating: f64,
    pub reviews: u32,
    pub is_open: bool,
}

impl OutletCard {
    /// Build the card, resolving the image against the backend origin.
    #[must_use]
    pub fn from_outlet(state: &AppState, outlet: &Outlet) -> Self {
        Self {
            id: outlet.id.as_i32(),
            name: outlet.name.clone(),
            cuisine: outlet.cuisine().to_string(),
            blurb: outlet.blurb(),
            image_url: image_src(state, &outlet.image_path),
            rating: outlet.rating.unwrap_or(4.5),
            reviews: outlet.reviews.unwrap_or(0),
            is_open: outlet.is_open,
        }
    }
}

/// Menu entry display data for templates.
#[derive(Clone)]
pub struct DishCard {
    pub outlet_id: i32,
    pub entry_id: i32,
    pub item_id: i32,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    /// Quantity already in the cart, for the stepper on menu pages.
    pub in_cart: u32,
}

impl DishCard {
    /// Build the card for one menu entry, with the caller's cart quantity.
    #[must_use]
    pub fn from_entry(state: &AppState, outlet_id: i32, entry: &MenuEntry, in_cart: u32) -> Self {
        Self {
            outlet_id,
            entry_id: entry.id.as_i32(),
            item_id: entry.item_id.as_i32(),
            name: entry.item_name.clone(),
            price: entry.price,
            image_url: image_src(state, entry.image.as_deref().unwrap_or("")),
            in_cart,
        }
    }
}

/// Resolve an image reference to a URL.
///
/// Bundled fallback assets are absolute `/static` paths; anything else is
/// an upload filename on the backend origin.
#[must_use]
pub fn image_src(state: &AppState, path: &str) -> String {
    if path.starts_with("/static/") {
        path.to_string()
    } else {
        state.image_url(path)
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the outlet routes router.
pub fn outlet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(outlets::index))
        .route("/{id}", get(outlets::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/customer", get(dashboard::customer))
        .route("/owner", get(dashboard::owner))
        .route("/owner/outlets/{id}", get(dashboard::manage))
        .route("/owner/outlets/{id}/menu", post(dashboard::menu_add))
        .route(
            "/owner/outlets/{id}/menu/{menu_id}/update",
            post(dashboard::menu_update),
        )
        .route(
            "/owner/outlets/{id}/menu/{menu_id}/delete",
            post(dashboard::menu_remove),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/outlets", outlet_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .route("/orders", get(orders::index))
        .nest("/dashboard", dashboard_routes())
        .route("/favourites/{item_id}/toggle", post(favourites::toggle))
        .nest("/auth", auth_routes())
}
