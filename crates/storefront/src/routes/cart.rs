//! Cart page, HTMX cart fragments, and checkout.
//!
//! The cart holds `{outlet_id}:{entry_id}` keys so each line can be
//! resolved back to its outlet's menu for display and checkout. Mutating
//! handlers load the cart, apply one change, save it, and return a
//! fragment with an `HX-Trigger` so the navbar badge refreshes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use nextgen_core::{CustomerId, MenuEntryId, OutletId, Price};

use crate::api::types::CreateOrderRequest;
use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, push_flash};
use crate::middleware::RequireAuth;
use crate::models::Cart;
use crate::routes::{PageContext, image_src};
use crate::state::AppState;

// =============================================================================
// Cart keys
// =============================================================================

/// Cart key for a menu entry: `{outlet_id}:{entry_id}`.
#[must_use]
pub fn cart_key(outlet_id: OutletId, entry_id: MenuEntryId) -> String {
    format!("{outlet_id}:{entry_id}")
}

/// Parse a cart key back into its ids. Malformed keys yield `None` and the
/// line is dropped, mirroring the rehydration sanitation on load.
#[must_use]
pub fn parse_cart_key(key: &str) -> Option<(OutletId, MenuEntryId)> {
    let (outlet, entry) = key.split_once(':')?;
    Some((
        OutletId::new(outlet.parse().ok()?),
        MenuEntryId::new(entry.parse().ok()?),
    ))
}

// =============================================================================
// View models
// =============================================================================

/// One resolved cart line for display.
#[derive(Clone)]
pub struct CartLineView {
    pub key: String,
    pub name: String,
    pub outlet_name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            subtotal: Price::ZERO.to_string(),
            item_count: 0,
        }
    }
}

/// Resolve every cart line against the outlet menus.
///
/// Stale lines (outlet or entry gone) are skipped rather than failing the
/// whole page.
async fn build_cart_view(state: &AppState, cart: &Cart) -> CartView {
    let mut lines = Vec::new();
    let mut subtotal = Price::ZERO;

    for (key, quantity) in cart.entries() {
        let Some((outlet_id, entry_id)) = parse_cart_key(key) else {
            tracing::warn!(key, "Dropping malformed cart key");
            continue;
        };

        let menu = match super::outlets::menu_for(state, outlet_id).await {
            Ok(menu) => menu,
            Err(e) => {
                tracing::warn!(key, "Dropping unresolvable cart line: {e}");
                continue;
            }
        };
        let Some(entry) = menu.menu.iter().find(|entry| entry.id == entry_id) else {
            tracing::warn!(key, "Cart line no longer on the menu");
            continue;
        };

        let line_total = entry.price.times(quantity);
        subtotal = subtotal.plus(line_total);
        lines.push(CartLineView {
            key: key.to_string(),
            name: entry.item_name.clone(),
            outlet_name: menu.outlet.clone(),
            quantity,
            unit_price: entry.price.to_string(),
            line_total: line_total.to_string(),
            image_url: image_src(state, entry.image.as_deref().unwrap_or("")),
        });
    }

    // Count what is actually rendered; dropped lines stay out of the label
    let item_count = lines.iter().map(|line| line.quantity).sum();
    CartView {
        lines,
        subtotal: subtotal.to_string(),
        item_count,
    }
}

/// Convert a posted quantity to the stored `u32` range. Zero and below
/// delete the line; anything past `u32::MAX` saturates instead.
fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

// =============================================================================
// Forms
// =============================================================================

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub outlet_id: i32,
    pub entry_id: i32,
}

/// Set-quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub key: String,
    /// Signed on purpose: negative input deletes the line like zero does.
    pub quantity: i64,
}

/// Remove/decrement form data.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub key: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let ctx = PageContext::build(&session).await;
    let cart = Cart::load(&session).await;
    let cart = build_cart_view(&state, &cart).await;

    CartShowTemplate { ctx, cart }
}

/// Add one of a menu entry to the cart (HTMX).
///
/// Returns the count badge with an `HX-Trigger` so cart fragments on the
/// page refresh themselves.
#[instrument(skip(session))]
pub async fn add(session: Session, Form(form): Form<AddForm>) -> Result<Response> {
    let key = cart_key(OutletId::new(form.outlet_id), MenuEntryId::new(form.entry_id));

    let mut cart = Cart::load(&session).await;
    cart.add(&key);
    cart.save(&session).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.total_items(),
        },
    )
        .into_response())
}

/// Set a cart line's quantity (HTMX). Zero or negative deletes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateForm>,
) -> Result<Response> {
    let mut cart = Cart::load(&session).await;
    cart.set_quantity(&form.key, clamp_quantity(form.quantity));
    cart.save(&session).await?;

    let cart = build_cart_view(&state, &cart).await;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response())
}

/// Decrement a cart line (HTMX); the line disappears at zero.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveForm>,
) -> Result<Response> {
    let mut cart = Cart::load(&session).await;
    cart.remove(&form.key);
    cart.save(&session).await?;

    let cart = build_cart_view(&state, &cart).await;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response())
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut cart = Cart::load(&session).await;
    cart.clear();
    cart.save(&session).await?;

    let cart = build_cart_view(&state, &cart).await;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response())
}

/// Cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = Cart::load(&session).await;
    CartCountTemplate {
        count: cart.total_items(),
    }
}

/// Submit the cart as orders.
///
/// The backend takes one menu entry per order, so each cart line becomes
/// its own order. Lines that fail stay in the cart; successful ones are
/// removed, so a partial failure can simply be retried.
#[instrument(skip(state, session, user))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    if user.is_owner() {
        push_flash(
            &session,
            Flash::warning("Owner accounts cannot place orders"),
        )
        .await;
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut cart = Cart::load(&session).await;
    if cart.is_empty() {
        push_flash(&session, Flash::info("Your cart is empty")).await;
        return Ok(Redirect::to("/cart").into_response());
    }

    let customer_id = CustomerId::new(user.id);
    let pending: Vec<(String, u32)> = cart
        .entries()
        .map(|(key, quantity)| (key.to_string(), quantity))
        .collect();

    let mut placed = 0u32;
    let mut failed = 0u32;
    for (key, quantity) in pending {
        let Some((_, entry_id)) = parse_cart_key(&key) else {
            cart.set_quantity(&key, 0);
            continue;
        };

        let request = CreateOrderRequest {
            customer_id,
            menu_outlet_item_id: entry_id,
            quantity,
        };
        match state.backend().create_order(&request, &user.token).await {
            Ok(order) => {
                tracing::info!(order_id = %order.id, "Order placed");
                cart.set_quantity(&key, 0);
                placed += 1;
            }
            Err(e) => {
                tracing::warn!(key, "Order failed: {e}");
                failed += 1;
            }
        }
    }
    cart.save(&session).await?;

    if placed > 0 {
        let noun = if placed == 1 { "order" } else { "orders" };
        push_flash(&session, Flash::success(format!("Placed {placed} {noun}"))).await;
    }
    if failed > 0 {
        push_flash(
            &session,
            Flash::error(format!(
                "{failed} item(s) could not be ordered and stayed in your cart"
            )),
        )
        .await;
    }

    if placed > 0 {
        Ok(Redirect::to("/orders").into_response())
    } else {
        Ok(Redirect::to("/cart").into_response())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_key_round_trip() {
        let key = cart_key(OutletId::new(3), MenuEntryId::new(311));
        assert_eq!(key, "3:311");
        assert_eq!(
            parse_cart_key(&key).unwrap(),
            (OutletId::new(3), MenuEntryId::new(311))
        );
    }

    #[test]
    fn test_malformed_cart_keys_are_rejected() {
        assert!(parse_cart_key("311").is_none());
        assert!(parse_cart_key("a:b").is_none());
        assert!(parse_cart_key(":").is_none());
        assert!(parse_cart_key("").is_none());
    }

    #[test]
    fn test_posted_quantities_clamp_instead_of_vanishing() {
        assert_eq!(clamp_quantity(-5), 0);
        assert_eq!(clamp_quantity(0), 0);
        assert_eq!(clamp_quantity(7), 7);
        // An absurdly large value saturates; only zero and below delete
        assert_eq!(clamp_quantity(i64::from(u32::MAX) + 1), u32::MAX);
        assert_eq!(clamp_quantity(i64::MAX), u32::MAX);
    }
}
