//! Customer and owner dashboards, plus the owner's menu management screen.
//!
//! All pages here are token-scoped views over the backend: there is no
//! fixture fallback, an outage surfaces as an error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use nextgen_core::{CustomerId, MenuEntryId, OutletId, OwnerId, Price};

use crate::api::ApiError;
use crate::api::types::{FavouriteItem, MenuItemUpdate, NewMenuItem, Outlet};
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, push_flash};
use crate::middleware::{RequireAuth, RequireOwner};
use crate::models::CurrentUser;
use crate::routes::orders::OrderView;
use crate::routes::{PageContext, image_src};
use crate::state::AppState;

/// Orders shown in the owner's recent list.
const RECENT_ORDERS: usize = 10;

// =============================================================================
// View models
// =============================================================================

/// A favourited dish ready for display.
#[derive(Clone)]
pub struct FavouriteView {
    pub item_id: i32,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: String,
    pub is_available: bool,
    pub favourites_count: u32,
}

impl FavouriteView {
    fn from_item(state: &AppState, item: &FavouriteItem) -> Self {
        Self {
            item_id: item.id.as_i32(),
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            image_url: image_src(state, item.image.as_deref().unwrap_or("")),
            price: item.price.to_string(),
            is_available: item.is_available,
            favourites_count: item.favourites_count,
        }
    }
}

/// One outlet's stat card on the owner dashboard.
#[derive(Clone)]
pub struct OutletStatsView {
    pub id: i32,
    pub name: String,
    pub cuisine: String,
    pub image_url: String,
    pub is_open: bool,
    pub today_orders: u32,
    pub today_revenue: String,
    pub total_orders: u32,
}

/// One editable row on the menu management screen.
#[derive(Clone)]
pub struct MenuRowView {
    pub menu_id: i32,
    pub name: String,
    /// Bare decimal for the price input, no currency symbol.
    pub price: String,
    pub image_url: String,
}

// =============================================================================
// Menu management forms
// =============================================================================

/// Query parameters for the menu management page.
#[derive(Debug, Deserialize)]
pub struct ManageQuery {
    /// Case-insensitive dish name filter.
    pub q: Option<String>,
}

/// Add-dish form data.
#[derive(Debug, Deserialize)]
pub struct MenuAddForm {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Edit-dish form data.
#[derive(Debug, Deserialize)]
pub struct MenuUpdateForm {
    pub name: String,
    pub price: f64,
}

fn validate_menu_fields(name: &str, price: f64) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("Dish name is required")
    } else if !price.is_finite() || price <= 0.0 {
        Some("Price must be a positive amount")
    } else {
        None
    }
}

/// Match a dish name against a pre-lowercased search needle.
fn matches_search(name: &str, needle: &str) -> bool {
    needle.is_empty() || name.to_lowercase().contains(needle)
}

/// User-facing message for a failed menu write.
fn menu_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Backend { message, .. } | ApiError::NotFound(message) => message.clone(),
        ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
        ApiError::Http(_) | ApiError::Parse(_) => {
            "The food court service is unavailable right now".to_string()
        }
    }
}

/// Resolve an outlet id to one of the caller's own outlets.
///
/// Outlets belonging to someone else come back as a 404, the same answer
/// an unknown id gets.
async fn owned_outlet(
    state: &AppState,
    user: &CurrentUser,
    outlet_id: OutletId,
) -> Result<Outlet> {
    let outlets = state.backend().owner_outlets(&user.token).await?;
    outlets
        .into_iter()
        .find(|outlet| outlet.id == outlet_id)
        .ok_or_else(|| AppError::NotFound(format!("outlet {outlet_id}")))
}

// =============================================================================
// Templates
// =============================================================================

/// Customer dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/customer.html")]
pub struct CustomerDashboardTemplate {
    pub ctx: PageContext,
    pub profile_name: String,
    pub profile_email: String,
    pub orders: Vec<OrderView>,
    pub favourites: Vec<FavouriteView>,
}

/// Owner dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/owner.html")]
pub struct OwnerDashboardTemplate {
    pub ctx: PageContext,
    pub owner_name: String,
    pub outlets: Vec<OutletStatsView>,
    pub today_orders: u32,
    pub today_revenue: String,
    pub recent_orders: Vec<OrderView>,
}

/// Menu management template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/manage.html")]
pub struct ManageOutletTemplate {
    pub ctx: PageContext,
    pub outlet_id: i32,
    pub outlet_name: String,
    pub rows: Vec<MenuRowView>,
    pub search: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the customer dashboard: profile, order history, favourites.
#[instrument(skip(state, session, user))]
pub async fn customer(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::build(&session).await;

    // Refresh the profile; the session copy serves if the call fails
    let (profile_name, profile_email) =
        match state.backend().user_details(user.role, &user.token).await {
            Ok(profile) => (profile.name, profile.email),
            Err(e) => {
                tracing::debug!("Using session profile: {e}");
                (user.name.clone(), user.email.clone())
            }
        };

    let mut orders = state
        .backend()
        .customer_orders(CustomerId::new(user.id), &user.token)
        .await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let favourites = state
        .backend()
        .customer_favourites(&user.token)
        .await
        .map_or_else(
            |e| {
                tracing::warn!("Failed to fetch favourites: {e}");
                Vec::new()
            },
            |items| {
                items
                    .iter()
                    .map(|item| FavouriteView::from_item(&state, item))
                    .collect()
            },
        );

    let orders = orders
        .iter()
        .map(|order| OrderView::from_order(&state, order))
        .collect();

    Ok(CustomerDashboardTemplate {
        ctx,
        profile_name,
        profile_email,
        orders,
        favourites,
    })
}

/// Display the owner dashboard: outlet stat cards and incoming orders.
#[instrument(skip(state, session, user))]
pub async fn owner(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(user): RequireOwner,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::build(&session).await;

    let outlets = state.backend().owner_outlets(&user.token).await?;

    let today_orders = outlets.iter().map(|o| o.today_orders).sum();
    let today_revenue = outlets
        .iter()
        .fold(Price::ZERO, |acc, o| acc.plus(Price::from_f64(o.today_revenue)));

    let outlets: Vec<OutletStatsView> = outlets
        .iter()
        .map(|outlet| OutletStatsView {
            id: outlet.id.as_i32(),
            name: outlet.name.clone(),
            cuisine: outlet.cuisine().to_string(),
            image_url: image_src(&state, &outlet.image_path),
            is_open: outlet.is_open,
            today_orders: outlet.today_orders,
            today_revenue: Price::from_f64(outlet.today_revenue).to_string(),
            total_orders: outlet.total_orders,
        })
        .collect();

    let mut orders = state
        .backend()
        .owner_orders(OwnerId::new(user.id), &user.token)
        .await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders.truncate(RECENT_ORDERS);

    let recent_orders = orders
        .iter()
        .map(|order| OrderView::from_order(&state, order))
        .collect();

    Ok(OwnerDashboardTemplate {
        ctx,
        owner_name: user.name,
        outlets,
        today_orders,
        today_revenue: today_revenue.to_string(),
        recent_orders,
    })
}

/// Display the menu management screen for one of the owner's outlets.
#[instrument(skip(state, session, user))]
pub async fn manage(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(user): RequireOwner,
    Path(id): Path<i32>,
    Query(query): Query<ManageQuery>,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::build(&session).await;
    let outlet_id = OutletId::new(id);
    let outlet = owned_outlet(&state, &user, outlet_id).await?;

    let menu = state.backend().outlet_menu(outlet_id).await?;
    let search = query.q.unwrap_or_default();
    let needle = search.trim().to_lowercase();

    let rows = menu
        .menu
        .iter()
        .filter(|entry| matches_search(&entry.item_name, &needle))
        .map(|entry| MenuRowView {
            menu_id: entry.id.as_i32(),
            name: entry.item_name.clone(),
            price: entry.price.amount().to_string(),
            image_url: image_src(&state, entry.image.as_deref().unwrap_or("")),
        })
        .collect();

    Ok(ManageOutletTemplate {
        ctx,
        outlet_id: id,
        outlet_name: outlet.name,
        rows,
        search,
    })
}

/// Add a dish to the outlet's menu.
#[instrument(skip(state, session, user, form))]
pub async fn menu_add(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(user): RequireOwner,
    Path(id): Path<i32>,
    Form(form): Form<MenuAddForm>,
) -> Result<Response> {
    let outlet_id = OutletId::new(id);
    owned_outlet(&state, &user, outlet_id).await?;
    let back = format!("/dashboard/owner/outlets/{id}");

    if let Some(message) = validate_menu_fields(&form.name, form.price) {
        push_flash(&session, Flash::error(message)).await;
        return Ok(Redirect::to(&back).into_response());
    }

    let item = NewMenuItem {
        name: form.name.trim().to_string(),
        price: form.price,
        description: form.description.filter(|d| !d.trim().is_empty()),
        category: form.category.filter(|c| !c.trim().is_empty()),
        outlet_id: id,
    };
    match state.backend().create_menu_item(&item, &user.token).await {
        Ok(receipt) => {
            tracing::info!(menu_id = %receipt.menu_id, "Dish added to menu");
            push_flash(&session, Flash::success(format!("Added {}", item.name))).await;
        }
        Err(e) => {
            tracing::warn!(outlet_id = %outlet_id, "Dish add failed: {e}");
            push_flash(&session, Flash::error(menu_error_message(&e))).await;
        }
    }
    Ok(Redirect::to(&back).into_response())
}

/// Rename or reprice a dish.
#[instrument(skip(state, session, user, form))]
pub async fn menu_update(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(user): RequireOwner,
    Path((id, menu_id)): Path<(i32, i32)>,
    Form(form): Form<MenuUpdateForm>,
) -> Result<Response> {
    let outlet_id = OutletId::new(id);
    owned_outlet(&state, &user, outlet_id).await?;
    let back = format!("/dashboard/owner/outlets/{id}");

    if let Some(message) = validate_menu_fields(&form.name, form.price) {
        push_flash(&session, Flash::error(message)).await;
        return Ok(Redirect::to(&back).into_response());
    }

    let update = MenuItemUpdate {
        name: form.name.trim().to_string(),
        price: form.price,
    };
    match state
        .backend()
        .update_menu_item(outlet_id, MenuEntryId::new(menu_id), &update, &user.token)
        .await
    {
        Ok(_) => {
            push_flash(&session, Flash::success(format!("Updated {}", update.name))).await;
        }
        Err(e) => {
            tracing::warn!(menu_id, "Dish update failed: {e}");
            push_flash(&session, Flash::error(menu_error_message(&e))).await;
        }
    }
    Ok(Redirect::to(&back).into_response())
}

/// Take a dish off the outlet's menu.
#[instrument(skip(state, session, user))]
pub async fn menu_remove(
    State(state): State<AppState>,
    session: Session,
    RequireOwner(user): RequireOwner,
    Path((id, menu_id)): Path<(i32, i32)>,
) -> Result<Response> {
    let outlet_id = OutletId::new(id);
    owned_outlet(&state, &user, outlet_id).await?;
    let back = format!("/dashboard/owner/outlets/{id}");

    match state
        .backend()
        .delete_menu_item(outlet_id, MenuEntryId::new(menu_id), &user.token)
        .await
    {
        Ok(()) => {
            push_flash(&session, Flash::success("Dish removed from the menu")).await;
        }
        Err(e) => {
            tracing::warn!(menu_id, "Dish removal failed: {e}");
            push_flash(&session, Flash::error(menu_error_message(&e))).await;
        }
    }
    Ok(Redirect::to(&back).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_field_validation() {
        assert!(validate_menu_fields("Doro Wat", 14.99).is_none());
        assert_eq!(
            validate_menu_fields("   ", 14.99),
            Some("Dish name is required")
        );
        assert_eq!(
            validate_menu_fields("Doro Wat", 0.0),
            Some("Price must be a positive amount")
        );
        assert_eq!(
            validate_menu_fields("Doro Wat", -2.5),
            Some("Price must be a positive amount")
        );
        assert_eq!(
            validate_menu_fields("Doro Wat", f64::NAN),
            Some("Price must be a positive amount")
        );
    }

    #[test]
    fn test_menu_search_is_case_insensitive() {
        assert!(matches_search("Jollof Rice", "jollof"));
        assert!(matches_search("Jollof Rice", "rice"));
        assert!(!matches_search("Jollof Rice", "suya"));
        // An empty query shows the whole menu
        assert!(matches_search("Jollof Rice", ""));
    }
}
