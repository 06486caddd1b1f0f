//! Customer order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use nextgen_core::CustomerId;

use crate::api::types::Order;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::{PageContext, image_src};
use crate::state::AppState;

/// One order line ready for display.
#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub image_url: String,
}

/// An order ready for display.
#[derive(Clone)]
pub struct OrderView {
    pub id: i32,
    pub outlet_name: String,
    pub customer_name: String,
    pub status_label: &'static str,
    pub is_active: bool,
    pub placed_at: String,
    pub total: String,
    pub lines: Vec<OrderLineView>,
}

impl OrderView {
    /// Build the view for one order.
    #[must_use]
    pub fn from_order(state: &AppState, order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            outlet_name: order.outlet_name.clone(),
            customer_name: order.customer_name.clone().unwrap_or_default(),
            status_label: order.status.label(),
            is_active: order.status.is_active(),
            placed_at: order
                .created_at
                .map(|t| t.format("%-d %b %Y, %H:%M").to_string())
                .unwrap_or_default(),
            total: order.total.to_string(),
            lines: order
                .items
                .iter()
                .map(|line| OrderLineView {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    price: line.price.to_string(),
                    image_url: image_src(state, &line.image_path),
                })
                .collect(),
        }
    }
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<OrderView>,
}

/// Display the signed-in customer's orders, newest first.
#[instrument(skip(state, session, user))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::build(&session).await;

    let mut orders = state
        .backend()
        .customer_orders(CustomerId::new(user.id), &user.token)
        .await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let orders = orders
        .iter()
        .map(|order| OrderView::from_order(&state, order))
        .collect();

    Ok(OrdersTemplate { ctx, orders })
}
