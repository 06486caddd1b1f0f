//! Outlet directory and menu pages.
//!
//! Both pages degrade to the bundled showcase fixtures when the backend
//! is unreachable, so the catalog stays browsable through an outage.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use nextgen_core::OutletId;

use crate::api::types::{Outlet, OutletMenuResponse};
use crate::content::{mock_menu, mock_outlets};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Cart;
use crate::routes::{DishCard, OutletCard, PageContext};
use crate::state::AppState;

/// Query parameters for the outlet directory.
#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    /// Cuisine filter; absent or `all` shows everything.
    pub cuisine: Option<String>,
}

/// Outlet directory template.
#[derive(Template, WebTemplate)]
#[template(path = "outlets/index.html")]
pub struct OutletIndexTemplate {
    pub ctx: PageContext,
    pub outlets: Vec<OutletCard>,
    pub cuisines: Vec<String>,
    pub active_cuisine: String,
}

/// Outlet menu template.
#[derive(Template, WebTemplate)]
#[template(path = "outlets/show.html")]
pub struct OutletShowTemplate {
    pub ctx: PageContext,
    pub outlet_id: i32,
    pub outlet_name: String,
    pub dishes: Vec<DishCard>,
}

/// Fetch the outlet directory, or the showcase fixtures on outage.
async fn directory(state: &AppState) -> Vec<Outlet> {
    match state.backend().outlets().await {
        Ok(outlets) => outlets.as_ref().clone(),
        Err(e) => {
            tracing::warn!("Falling back to showcase outlets: {e}");
            mock_outlets()
        }
    }
}

/// Fetch one outlet's menu; outages fall back to fixtures, other errors
/// propagate (an unknown id is a real 404).
pub(super) async fn menu_for(state: &AppState, outlet_id: OutletId) -> Result<OutletMenuResponse> {
    match state.backend().outlet_menu(outlet_id).await {
        Ok(menu) => Ok(menu.as_ref().clone()),
        Err(e) if e.is_unavailable() => {
            tracing::warn!(outlet_id = %outlet_id, "Falling back to showcase menu: {e}");
            mock_menu(outlet_id).ok_or_else(|| AppError::NotFound(format!("outlet {outlet_id}")))
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the outlet directory.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DirectoryQuery>,
) -> impl IntoResponse {
    let ctx = PageContext::build(&session).await;
    let all = directory(&state).await;

    // Distinct cuisines for the filter pills, in first-seen order
    let mut cuisines: Vec<String> = Vec::new();
    for outlet in &all {
        let cuisine = outlet.cuisine().to_string();
        if !cuisines.contains(&cuisine) {
            cuisines.push(cuisine);
        }
    }

    let active_cuisine = query
        .cuisine
        .filter(|c| !c.is_empty() && c != "all")
        .unwrap_or_else(|| "all".to_string());

    let outlets = all
        .iter()
        .filter(|outlet| active_cuisine == "all" || outlet.cuisine() == active_cuisine)
        .map(|outlet| OutletCard::from_outlet(&state, outlet))
        .collect();

    OutletIndexTemplate {
        ctx,
        outlets,
        cuisines,
        active_cuisine,
    }
}

/// Display one outlet's menu.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let ctx = PageContext::build(&session).await;
    let outlet_id = OutletId::new(id);
    let cart = Cart::load(&session).await;

    let menu = menu_for(&state, outlet_id).await?;

    let dishes = menu
        .menu
        .iter()
        .map(|entry| {
            let key = super::cart::cart_key(outlet_id, entry.id);
            DishCard::from_entry(&state, id, entry, cart.quantity(&key))
        })
        .collect();

    Ok(OutletShowTemplate {
        ctx,
        outlet_id: id,
        outlet_name: menu.outlet,
        dishes,
    })
}
