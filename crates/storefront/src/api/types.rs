//! DTOs for the backend food-court API.
//!
//! The backend leaves many fields null or absent depending on the endpoint;
//! serde defaults here reproduce the display fallbacks the pages rely on
//! (placeholder image, open-by-default, zeroed stats).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use nextgen_core::{
    CustomerId, ItemId, MenuEntryId, OrderId, OrderStatus, OutletId, OwnerId, Price,
};

fn default_image() -> String {
    "default-food.jpg".to_string()
}

fn default_true() -> bool {
    true
}

fn default_outlet_name() -> String {
    "Food Court Outlet".to_string()
}

// =============================================================================
// Catalog
// =============================================================================

/// Envelope for `GET /api/outlets` and `GET /api/owner/outlets`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutletsResponse {
    #[serde(default)]
    pub outlets: Vec<Outlet>,
}

/// A vendor stall within the food court.
#[derive(Debug, Clone, Deserialize)]
pub struct Outlet {
    pub id: OutletId,
    pub name: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
    #[serde(default = "default_image")]
    pub image_path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<u32>,
    #[serde(default = "default_true", alias = "isOpen")]
    pub is_open: bool,
    // Owner dashboard stats; zero when the listing endpoint omits them
    #[serde(default)]
    pub today_orders: u32,
    #[serde(default)]
    pub today_revenue: f64,
    #[serde(default)]
    pub total_orders: u32,
}

impl Outlet {
    /// Cuisine tag, with a generic fallback when the backend omits one.
    #[must_use]
    pub fn cuisine(&self) -> &str {
        self.category_name.as_deref().unwrap_or("African Cuisine")
    }

    /// Blurb, generated from the cuisine when no description is set.
    #[must_use]
    pub fn blurb(&self) -> String {
        self.description.clone().unwrap_or_else(|| {
            format!(
                "Authentic {} cuisine prepared by expert chefs.",
                self.cuisine()
            )
        })
    }
}

/// Envelope for `GET /api/outlet/{id}/menu`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutletMenuResponse {
    /// Outlet display name.
    pub outlet: String,
    #[serde(default)]
    pub menu: Vec<MenuEntry>,
}

/// One line on an outlet's menu.
///
/// `id` is the menu-entry id (the outlet-item link) and is what order
/// creation references; `item_id` identifies the dish itself and is what
/// favourites reference.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuEntry {
    pub id: MenuEntryId,
    pub item_id: ItemId,
    pub item_name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
}

// =============================================================================
// Auth
// =============================================================================

/// Account details as returned by login/signup/details endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Envelope for the login endpoints.
///
/// Customer login nests the profile under `customer`, owner login under
/// `owner`; [`Self::profile`] papers over the difference.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    customer: Option<UserProfile>,
    #[serde(default)]
    owner: Option<UserProfile>,
}

impl LoginResponse {
    /// The profile embedded in the login response, whichever role it was.
    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        match (&self.customer, &self.owner) {
            (Some(profile), _) | (None, Some(profile)) => Some(profile),
            (None, None) => None,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order as serialized by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub outlet_id: Option<OutletId>,
    #[serde(default = "default_outlet_name")]
    pub outlet_name: String,
    #[serde(default)]
    pub outlet_category: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

/// One line inside an order payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: Price,
    #[serde(default = "default_image")]
    pub image_path: String,
}

/// Body for `POST /api/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub menu_outlet_item_id: MenuEntryId,
    pub quantity: u32,
}

// =============================================================================
// Owner menu management
// =============================================================================

/// Form fields for `POST /api/menu`: create an item and link it to an
/// outlet's menu in one call.
#[derive(Debug, Clone, Serialize)]
pub struct NewMenuItem {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub outlet_id: i32,
}

/// Form fields for `PUT /api/menu/{menu_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemUpdate {
    pub name: String,
    pub price: f64,
}

/// Receipt the menu write endpoints return.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuWriteReceipt {
    pub item_id: ItemId,
    pub menu_id: MenuEntryId,
}

// =============================================================================
// Favourites & testimonials
// =============================================================================

/// Response of the favourite toggle endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FavouriteToggle {
    #[serde(default)]
    pub message: String,
    pub favourited: bool,
    #[serde(default)]
    pub favourite_count: u32,
}

/// Envelope for `GET /api/customer/favourites`.
#[derive(Debug, Clone, Deserialize)]
pub struct FavouritesResponse {
    // Yes, the backend really uses this key
    #[serde(default, rename = "Your Favourites")]
    pub favourites: Vec<FavouriteItem>,
}

/// A favourited dish.
#[derive(Debug, Clone, Deserialize)]
pub struct FavouriteItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Price,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub favourites_count: u32,
}

/// A customer testimonial shown on the home page.
#[derive(Debug, Clone, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub customer_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub rating: u8,
    pub review_text: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_outlet_listing_shape() {
        // Shape of GET /api/outlets
        let json = r#"{"outlets": [
            {"id": 1, "name": "Addis Kitchen", "category_name": "Ethiopian",
             "owner_id": 2, "image_path": "addis.jpg"},
            {"id": 2, "name": "Lagos Grill", "category_name": null,
             "owner_id": null, "image_path": "lagos.jpg"}
        ]}"#;
        let parsed: OutletsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.outlets.len(), 2);
        let lagos = &parsed.outlets[1];
        assert_eq!(lagos.cuisine(), "African Cuisine");
        assert!(lagos.is_open);
        assert_eq!(lagos.today_orders, 0);
    }

    #[test]
    fn test_outlet_menu_shape() {
        // Shape of GET /api/outlet/{id}/menu
        let json = r#"{"outlet": "Addis Kitchen", "menu": [
            {"id": 11, "item_id": 3, "item_name": "Doro Wat", "price": 14.99, "image": "doro.jpg"},
            {"id": 12, "item_id": 4, "item_name": "Tibs", "price": 15.5, "image": null}
        ]}"#;
        let parsed: OutletMenuResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.outlet, "Addis Kitchen");
        assert_eq!(parsed.menu[0].price.to_string(), "$14.99");
        assert!(parsed.menu[1].image.is_none());
    }

    #[test]
    fn test_login_response_both_roles() {
        let customer = r#"{"token": "abc", "customer": {"id": 5, "name": "Ada", "email": "ada@example.com"}}"#;
        let parsed: LoginResponse = serde_json::from_str(customer).unwrap();
        assert_eq!(parsed.profile().unwrap().id, 5);

        let owner = r#"{"token": "xyz", "owner": {"id": 9, "name": "Omar", "email": "omar@example.com"}}"#;
        let parsed: LoginResponse = serde_json::from_str(owner).unwrap();
        assert_eq!(parsed.profile().unwrap().id, 9);

        let bare = r#"{"token": "t"}"#;
        let parsed: LoginResponse = serde_json::from_str(bare).unwrap();
        assert!(parsed.profile().is_none());
    }

    #[test]
    fn test_order_shape_with_defaults() {
        let json = r#"{"id": 7, "customer_id": 5, "status": "confirmed",
            "created_at": "2024-06-01T12:30:00",
            "outlet_name": "Lagos Grill", "outlet_id": 2,
            "items": [{"name": "Jollof Rice", "quantity": 2, "price": 11.99, "image_path": "jollof.jpg"}],
            "total": 23.98}"#;
        let parsed: Order = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, OrderStatus::Confirmed);
        assert_eq!(parsed.total.to_string(), "$23.98");
        assert!(parsed.created_at.is_some());

        // Sparse payloads fall back to display defaults
        let sparse: Order = serde_json::from_str(r#"{"id": 8}"#).unwrap();
        assert_eq!(sparse.status, OrderStatus::Pending);
        assert_eq!(sparse.outlet_name, "Food Court Outlet");
        assert!(sparse.items.is_empty());
    }

    #[test]
    fn test_favourites_envelope_key() {
        let json = r#"{"Your Favourites": [
            {"id": 3, "name": "Doro Wat", "description": null, "image": "doro.jpg",
             "price": 14.99, "is_available": true, "favourites_count": 12}
        ]}"#;
        let parsed: FavouritesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.favourites.len(), 1);
        assert_eq!(parsed.favourites[0].favourites_count, 12);
    }

    #[test]
    fn test_menu_write_shapes() {
        // Optional form fields are omitted entirely, not sent as blanks
        let item = NewMenuItem {
            name: "Doro Wat".to_string(),
            price: 14.99,
            description: None,
            category: Some("Mains".to_string()),
            outlet_id: 1,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Doro Wat", "price": 14.99, "category": "Mains", "outlet_id": 1})
        );

        // Receipt of POST /api/menu and PUT /api/menu/{id}
        let receipt: MenuWriteReceipt = serde_json::from_str(
            r#"{"message": "Item created and added to menu", "item_id": 3, "menu_id": 11,
                "image_url": "/uploads/default-food.jpg"}"#,
        )
        .unwrap();
        assert_eq!(receipt.item_id, ItemId::new(3));
        assert_eq!(receipt.menu_id, MenuEntryId::new(11));
    }

    #[test]
    fn test_create_order_body() {
        let body = CreateOrderRequest {
            customer_id: CustomerId::new(5),
            menu_outlet_item_id: MenuEntryId::new(11),
            quantity: 2,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"customer_id": 5, "menu_outlet_item_id": 11, "quantity": 2})
        );
    }
}
