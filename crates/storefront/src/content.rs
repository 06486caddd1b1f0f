//! Static content: hero carousel slides and mock catalog fixtures.
//!
//! The mock fixtures mirror the backend's wire types so catalog pages can
//! render them through the same view code when the backend is unreachable.
//! Images referenced here ship with the storefront under `/static`.

use nextgen_core::{ItemId, MenuEntryId, OutletId, Price};

use crate::api::types::{MenuEntry, Outlet, OutletMenuResponse};

// =============================================================================
// Hero carousel
// =============================================================================

/// A single slide in the home page hero carousel.
#[derive(Clone)]
pub struct HeroSlide {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub image_path: String,
    pub image_alt: String,
}

/// Hero carousel configuration.
#[derive(Clone)]
pub struct HeroConfig {
    pub slides: Vec<HeroSlide>,
    pub autoplay_ms: Option<u32>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            autoplay_ms: Some(6000),
            slides: vec![
                HeroSlide {
                    title: Some("Taste the Continent".to_string()),
                    subtitle: Some(
                        "Twenty kitchens, one court. From injera to jollof, fresh every day."
                            .to_string(),
                    ),
                    button_text: Some("Browse Outlets".to_string()),
                    button_url: Some("/outlets".to_string()),
                    image_path: "/static/images/hero/hero-court.svg".to_string(),
                    image_alt: "The food court at lunch time".to_string(),
                },
                HeroSlide {
                    title: Some("Order Ahead, Skip the Queue".to_string()),
                    subtitle: Some(
                        "Build your tray from any outlet and pick it up when it's ready."
                            .to_string(),
                    ),
                    button_text: Some("Start an Order".to_string()),
                    button_url: Some("/outlets".to_string()),
                    image_path: "/static/images/hero/hero-grill.svg".to_string(),
                    image_alt: "Suya skewers on the grill".to_string(),
                },
                HeroSlide {
                    title: None,
                    subtitle: None,
                    button_text: Some("See What's Popular".to_string()),
                    button_url: Some("/#popular".to_string()),
                    image_path: "/static/images/hero/hero-platter.svg".to_string(),
                    image_alt: "A shared platter".to_string(),
                },
            ],
        }
    }
}

// =============================================================================
// Mock catalog fixtures
// =============================================================================

struct OutletTemplate {
    name: &'static str,
    cuisine: &'static str,
    description: &'static str,
    items: &'static [(&'static str, f64, &'static str)],
}

const OUTLET_TEMPLATES: &[OutletTemplate] = &[
    OutletTemplate {
        name: "Addis Kitchen",
        cuisine: "Ethiopian",
        description: "Authentic Ethiopian cuisine with traditional injera and aromatic spices.",
        items: &[
            (
                "Doro Wat",
                14.99,
                "Spicy chicken stew simmered in berbere sauce with boiled eggs",
            ),
            (
                "Injera Platter",
                12.5,
                "Assorted lentils and vegetables served on traditional injera",
            ),
            ("Kitfo", 16.99, "Minced beef seasoned with butter and spices"),
            ("Tibs", 15.99, "Sautéed beef with onions and peppers"),
        ],
    },
    OutletTemplate {
        name: "Lagos Grill",
        cuisine: "Nigerian",
        description: "Vibrant Nigerian flavors with signature jollof and grilled specialties.",
        items: &[
            (
                "Jollof Rice",
                11.99,
                "Smoky Nigerian jollof with grilled chicken and plantains",
            ),
            (
                "Suya Skewers",
                9.5,
                "Spiced grilled beef with peanut seasoning and onions",
            ),
            ("Egusi Soup", 10.99, "Melon seed soup with assorted meat and fish"),
            ("Pounded Yam", 12.99, "Smooth pounded yam with rich vegetable soup"),
        ],
    },
    OutletTemplate {
        name: "Cairo Eats",
        cuisine: "Egyptian",
        description: "Egyptian comfort food, from koshari to slow-roasted shawarma.",
        items: &[
            (
                "Koshari",
                8.99,
                "Egyptian comfort food with rice, lentils, and pasta",
            ),
            (
                "Shawarma",
                10.5,
                "Slow-roasted meat with tahini and pickles in pita",
            ),
            ("Falafel", 9.99, "Crispy chickpea fritters with tahini sauce"),
            ("Molokhia", 11.99, "Jute leaf soup with rabbit and rice"),
        ],
    },
    OutletTemplate {
        name: "Nairobi Flame",
        cuisine: "Kenyan",
        description: "Traditional Kenyan grilled meats cooked over charcoal, fresh and smoky.",
        items: &[
            ("Nyama Choma", 15.99, "Charcoal-grilled goat served with kachumbari"),
            ("Ugali & Sukuma", 8.5, "Maize meal with sautéed collard greens"),
            ("Samaki Fry", 13.99, "Whole fried tilapia with lemon and chilli"),
            ("Mandazi", 4.99, "Lightly sweetened coconut doughnuts"),
        ],
    },
];

/// Mock outlet directory used when the backend is unreachable.
#[must_use]
pub fn mock_outlets() -> Vec<Outlet> {
    OUTLET_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, template)| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let id = index as i32 + 1;
            Outlet {
                id: OutletId::new(id),
                name: template.name.to_string(),
                category_name: Some(template.cuisine.to_string()),
                owner_id: None,
                image_path: format!("/static/images/outlets/outlet-showcase-{id}.svg"),
                description: Some(template.description.to_string()),
                rating: Some(4.5),
                reviews: Some(80),
                is_open: true,
                today_orders: 0,
                today_revenue: 0.0,
                total_orders: 0,
            }
        })
        .collect()
}

/// Mock menu for one outlet, or `None` for ids outside the fixture range.
#[must_use]
pub fn mock_menu(outlet_id: OutletId) -> Option<OutletMenuResponse> {
    let index = usize::try_from(outlet_id.as_i32().checked_sub(1)?).ok()?;
    let template = OUTLET_TEMPLATES.get(index)?;

    let menu = template
        .items
        .iter()
        .enumerate()
        .map(|(item_index, (name, price, _description))| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let n = item_index as i32 + 1;
            MenuEntry {
                id: MenuEntryId::new(outlet_id.as_i32() * 100 + n),
                item_id: ItemId::new(outlet_id.as_i32() * 10 + n),
                item_name: (*name).to_string(),
                price: Price::from_f64(*price),
                image: Some(format!(
                    "/static/images/food/outlet-{}-dish-{n}.svg",
                    outlet_id.as_i32()
                )),
            }
        })
        .collect();

    Some(OutletMenuResponse {
        outlet: template.name.to_string(),
        menu,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_outlets_are_renderable() {
        let outlets = mock_outlets();
        assert_eq!(outlets.len(), 4);
        assert!(outlets.iter().all(|outlet| outlet.is_open));
        assert_eq!(outlets[1].cuisine(), "Nigerian");
    }

    #[test]
    fn test_mock_menu_bounds() {
        let menu = mock_menu(OutletId::new(1)).unwrap();
        assert_eq!(menu.outlet, "Addis Kitchen");
        assert_eq!(menu.menu.len(), 4);
        assert_eq!(menu.menu[0].price.to_string(), "$14.99");

        assert!(mock_menu(OutletId::new(0)).is_none());
        assert!(mock_menu(OutletId::new(99)).is_none());
    }

    #[test]
    fn test_fixture_images_are_bundled() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));

        let mut paths: Vec<String> = HeroConfig::default()
            .slides
            .iter()
            .map(|slide| slide.image_path.clone())
            .collect();
        for outlet in mock_outlets() {
            paths.push(outlet.image_path.clone());
            let menu = mock_menu(outlet.id).unwrap();
            paths.extend(menu.menu.iter().filter_map(|entry| entry.image.clone()));
        }

        for path in paths {
            let on_disk = root.join(path.trim_start_matches('/'));
            assert!(on_disk.is_file(), "{path} is referenced but not bundled");
        }
    }

    #[test]
    fn test_mock_menu_ids_are_distinct_across_outlets() {
        let first = mock_menu(OutletId::new(1)).unwrap();
        let second = mock_menu(OutletId::new(2)).unwrap();
        assert!(
            first
                .menu
                .iter()
                .all(|a| second.menu.iter().all(|b| a.id != b.id))
        );
    }
}
