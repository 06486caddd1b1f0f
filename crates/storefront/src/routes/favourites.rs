//! Favourite heart toggle (HTMX fragment).

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use nextgen_core::ItemId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Favourite button fragment template.
///
/// Also rendered inline by menu pages for the initial state.
#[derive(Template, WebTemplate)]
#[template(path = "partials/favourite_button.html")]
pub struct FavouriteButtonTemplate {
    pub item_id: i32,
    pub favourited: bool,
    pub favourite_count: u32,
}

/// Toggle a dish on or off the customer's favourites and return the
/// refreshed button.
#[instrument(skip(state, user))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<i32>,
) -> Result<FavouriteButtonTemplate> {
    let result = state
        .backend()
        .toggle_favourite(ItemId::new(item_id), &user.token)
        .await?;

    Ok(FavouriteButtonTemplate {
        item_id,
        favourited: result.favourited,
        favourite_count: result.favourite_count,
    })
}
