//! Backend API client implementation.
//!
//! Plain JSON over `reqwest`. Public catalog reads (outlets, menus,
//! testimonials) are cached with `moka` for five minutes; everything
//! token-scoped goes straight through.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use nextgen_core::{CustomerId, ItemId, MenuEntryId, OutletId, OwnerId, Role};

use crate::api::ApiError;
use crate::api::types::{
    CreateOrderRequest, FavouriteItem, FavouriteToggle, FavouritesResponse, LoginResponse,
    MenuItemUpdate, MenuWriteReceipt, NewMenuItem, Order, Outlet, OutletMenuResponse,
    OutletsResponse, Testimonial, UserProfile,
};
use crate::config::BackendConfig;

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 1000;

/// Cached catalog payloads, `Arc`d so hits are cheap clones.
#[derive(Clone)]
enum CacheValue {
    Outlets(Arc<Vec<Outlet>>),
    Menu(Arc<OutletMenuResponse>),
    Testimonials(Arc<Vec<Testimonial>>),
}

/// Error envelope used by the backend on non-2xx responses.
///
/// Different routes use `message` or `error`; accept either.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorEnvelope {
    fn into_message(self, status: StatusCode) -> String {
        self.message
            .or(self.error)
            .unwrap_or_else(|| format!("HTTP {status}"))
    }
}

/// Client for the backend food-court API.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    http: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                http: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                cache,
            }),
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email and password for the given role.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        role: Role,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let path = match role {
            Role::Customer => "/api/customer/login",
            Role::Owner => "/api/owner/login",
        };
        self.post_json(
            path,
            &serde_json::json!({ "email": email, "password": password }),
            None,
        )
        .await
    }

    /// Create an account for the given role.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        role: Role,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        let path = match role {
            Role::Customer => "/api/customer/signup",
            Role::Owner => "/api/owner/signup",
        };
        self.post_json(
            path,
            &serde_json::json!({ "name": name, "email": email, "password": password }),
            None,
        )
        .await
    }

    /// Fetch the logged-in account's details.
    #[instrument(skip(self, token))]
    pub async fn user_details(&self, role: Role, token: &str) -> Result<UserProfile, ApiError> {
        let path = match role {
            Role::Customer => "/api/customer/details",
            Role::Owner => "/api/owner/details",
        };
        self.get_json(path, Some(token)).await
    }

    // =========================================================================
    // Catalog (cached)
    // =========================================================================

    /// List all outlets. Cached.
    #[instrument(skip(self))]
    pub async fn outlets(&self) -> Result<Arc<Vec<Outlet>>, ApiError> {
        if let Some(CacheValue::Outlets(outlets)) = self.inner.cache.get("outlets").await {
            debug!("outlets cache hit");
            return Ok(outlets);
        }

        let response: OutletsResponse = self.get_json("/api/outlets", None).await?;
        let outlets = Arc::new(response.outlets);
        self.inner
            .cache
            .insert("outlets".to_string(), CacheValue::Outlets(outlets.clone()))
            .await;
        Ok(outlets)
    }

    /// Fetch one outlet's menu. Cached per outlet.
    #[instrument(skip(self))]
    pub async fn outlet_menu(&self, outlet_id: OutletId) -> Result<Arc<OutletMenuResponse>, ApiError> {
        let key = format!("menu:{outlet_id}");
        if let Some(CacheValue::Menu(menu)) = self.inner.cache.get(&key).await {
            debug!("menu cache hit");
            return Ok(menu);
        }

        let menu: Arc<OutletMenuResponse> = Arc::new(
            self.get_json(&format!("/api/outlet/{outlet_id}/menu"), None)
                .await?,
        );
        self.inner
            .cache
            .insert(key, CacheValue::Menu(menu.clone()))
            .await;
        Ok(menu)
    }

    /// Home page testimonial strip. Cached.
    #[instrument(skip(self))]
    pub async fn testimonials(&self) -> Result<Arc<Vec<Testimonial>>, ApiError> {
        if let Some(CacheValue::Testimonials(list)) = self.inner.cache.get("testimonials").await {
            return Ok(list);
        }

        let list: Arc<Vec<Testimonial>> =
            Arc::new(self.get_json("/api/testimonials", None).await?);
        self.inner
            .cache
            .insert(
                "testimonials".to_string(),
                CacheValue::Testimonials(list.clone()),
            )
            .await;
        Ok(list)
    }

    // =========================================================================
    // Owner views
    // =========================================================================

    /// Outlets belonging to the authenticated owner.
    #[instrument(skip(self, token))]
    pub async fn owner_outlets(&self, token: &str) -> Result<Vec<Outlet>, ApiError> {
        let response: OutletsResponse = self.get_json("/api/owner/outlets", Some(token)).await?;
        Ok(response.outlets)
    }

    /// Orders across the owner's outlets.
    #[instrument(skip(self, token))]
    pub async fn owner_orders(&self, owner_id: OwnerId, token: &str) -> Result<Vec<Order>, ApiError> {
        self.get_json(&format!("/api/orders/owner/{owner_id}"), Some(token))
            .await
    }

    /// Create an item and put it on an outlet's menu.
    ///
    /// The menu cache for that outlet is invalidated so the next read sees
    /// the new dish.
    #[instrument(skip(self, token))]
    pub async fn create_menu_item(
        &self,
        item: &NewMenuItem,
        token: &str,
    ) -> Result<MenuWriteReceipt, ApiError> {
        let receipt = self.post_form("/api/menu", item, Some(token)).await?;
        self.invalidate_menu(OutletId::new(item.outlet_id)).await;
        Ok(receipt)
    }

    /// Rename or reprice a dish on an outlet's menu.
    #[instrument(skip(self, token))]
    pub async fn update_menu_item(
        &self,
        outlet_id: OutletId,
        menu_id: MenuEntryId,
        update: &MenuItemUpdate,
        token: &str,
    ) -> Result<MenuWriteReceipt, ApiError> {
        let receipt = self
            .put_form(&format!("/api/menu/{menu_id}"), update, Some(token))
            .await?;
        self.invalidate_menu(outlet_id).await;
        Ok(receipt)
    }

    /// Take a dish off an outlet's menu.
    #[instrument(skip(self, token))]
    pub async fn delete_menu_item(
        &self,
        outlet_id: OutletId,
        menu_id: MenuEntryId,
        token: &str,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .http
            .delete(self.url(&format!("/api/menu/{menu_id}")))
            .bearer_auth(token);
        Self::check(request.send().await?).await?;
        self.invalidate_menu(outlet_id).await;
        Ok(())
    }

    async fn invalidate_menu(&self, outlet_id: OutletId) {
        self.inner.cache.invalidate(&format!("menu:{outlet_id}")).await;
    }

    // =========================================================================
    // Customer views
    // =========================================================================

    /// Orders placed by the given customer.
    #[instrument(skip(self, token))]
    pub async fn customer_orders(
        &self,
        customer_id: CustomerId,
        token: &str,
    ) -> Result<Vec<Order>, ApiError> {
        self.get_json(&format!("/api/orders/customer/{customer_id}"), Some(token))
            .await
    }

    /// Submit one order line.
    #[instrument(skip(self, token))]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
        token: &str,
    ) -> Result<Order, ApiError> {
        self.post_json("/api/orders", request, Some(token)).await
    }

    /// Toggle a dish on/off the customer's favourites.
    #[instrument(skip(self, token))]
    pub async fn toggle_favourite(
        &self,
        item_id: ItemId,
        token: &str,
    ) -> Result<FavouriteToggle, ApiError> {
        self.post_json(
            &format!("/api/items/{item_id}/favourite"),
            &serde_json::json!({}),
            Some(token),
        )
        .await
    }

    /// The customer's favourite dishes.
    #[instrument(skip(self, token))]
    pub async fn customer_favourites(&self, token: &str) -> Result<Vec<FavouriteItem>, ApiError> {
        let response: FavouritesResponse =
            self.get_json("/api/customer/favourites", Some(token)).await?;
        Ok(response.favourites)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.http.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
    }

    /// The menu write endpoints take url-encoded form fields, not JSON.
    async fn post_form<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.http.post(self.url(path)).form(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
    }

    async fn put_form<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.http.put(self.url(path)).form(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Map a backend response to a typed value or error.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }
        Err(Self::decode_error(response).await)
    }

    /// Status-only decode, for deletes whose 204 carries no body.
    async fn check(response: reqwest::Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::decode_error(response).await)
    }

    async fn decode_error(response: reqwest::Response) -> ApiError {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }

        // The backend wraps failures in {"message"} or {"error"}
        let envelope: ErrorEnvelope = response.json().await.unwrap_or(ErrorEnvelope {
            message: None,
            error: None,
        });
        let message = envelope.into_message(status);

        if status == StatusCode::NOT_FOUND {
            return ApiError::NotFound(message);
        }

        ApiError::Backend { status, message }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_precedence() {
        let envelope = ErrorEnvelope {
            message: Some("Email already exists.".to_string()),
            error: Some("ignored".to_string()),
        };
        assert_eq!(
            envelope.into_message(StatusCode::BAD_REQUEST),
            "Email already exists."
        );

        let envelope = ErrorEnvelope {
            message: None,
            error: Some("Unauthorized".to_string()),
        };
        assert_eq!(
            envelope.into_message(StatusCode::FORBIDDEN),
            "Unauthorized"
        );

        let envelope = ErrorEnvelope {
            message: None,
            error: None,
        };
        assert_eq!(
            envelope.into_message(StatusCode::BAD_GATEWAY),
            "HTTP 502 Bad Gateway"
        );
    }

    #[test]
    fn test_url_joining() {
        let client = BackendClient::new(&BackendConfig {
            api_url: "http://localhost:5555".to_string(),
            uploads_path: "/uploads".to_string(),
        });
        assert_eq!(
            client.url("/api/outlets"),
            "http://localhost:5555/api/outlets"
        );
    }
}
