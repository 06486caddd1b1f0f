//! Home page route handler.
//!
//! Shows the hero carousel, the outlet grid, a strip of popular dishes
//! drawn from the first outlets' menus, and customer testimonials. When
//! the backend is unreachable the page renders from the bundled showcase
//! fixtures instead of failing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::Testimonial;
use crate::content::{HeroConfig, mock_menu, mock_outlets};
use crate::filters;
use crate::models::Cart;
use crate::routes::{DishCard, OutletCard, PageContext};
use crate::state::AppState;

/// Outlets shown on the home grid.
const FEATURED_OUTLETS: usize = 4;

/// Dishes shown in the popular strip.
const POPULAR_DISHES: usize = 6;

/// A testimonial ready for display.
#[derive(Clone)]
pub struct TestimonialView {
    pub customer_name: String,
    pub rating: u8,
    pub review_text: String,
}

impl From<&Testimonial> for TestimonialView {
    fn from(t: &Testimonial) -> Self {
        Self {
            customer_name: t.customer_name.clone(),
            rating: t.rating.min(5),
            review_text: t.review_text.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub hero: HeroConfig,
    pub outlets: Vec<OutletCard>,
    pub popular: Vec<DishCard>,
    pub testimonials: Vec<TestimonialView>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let ctx = PageContext::build(&session).await;
    let cart = Cart::load(&session).await;

    // Outlet grid, falling back to the showcase fixtures when the backend
    // is down
    let outlets = match state.backend().outlets().await {
        Ok(outlets) => outlets.as_ref().clone(),
        Err(e) => {
            tracing::warn!("Falling back to showcase outlets: {e}");
            mock_outlets()
        }
    };

    // Popular strip: the first dishes of the first couple of outlets
    let mut popular = Vec::new();
    for outlet in outlets.iter().take(2) {
        let menu = match state.backend().outlet_menu(outlet.id).await {
            Ok(menu) => Some(menu.as_ref().clone()),
            Err(e) if e.is_unavailable() => mock_menu(outlet.id),
            Err(e) => {
                tracing::warn!(outlet_id = %outlet.id, "Failed to fetch menu: {e}");
                None
            }
        };
        if let Some(menu) = menu {
            for entry in menu.menu.iter().take(3) {
                let key = super::cart::cart_key(outlet.id, entry.id);
                popular.push(DishCard::from_entry(
                    &state,
                    outlet.id.as_i32(),
                    entry,
                    cart.quantity(&key),
                ));
            }
        }
        if popular.len() >= POPULAR_DISHES {
            break;
        }
    }
    popular.truncate(POPULAR_DISHES);

    let testimonials = state.backend().testimonials().await.map_or_else(
        |e| {
            tracing::debug!("No testimonials: {e}");
            Vec::new()
        },
        |list| list.iter().map(TestimonialView::from).collect(),
    );

    let outlets = outlets
        .iter()
        .take(FEATURED_OUTLETS)
        .map(|outlet| OutletCard::from_outlet(&state, outlet))
        .collect();

    HomeTemplate {
        ctx,
        hero: HeroConfig::default(),
        outlets,
        popular,
        testimonials,
    }
}
