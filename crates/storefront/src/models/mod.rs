//! Session-held state: the logged-in identity and the cart.

pub mod cart;
pub mod session;

pub use cart::Cart;
pub use session::{CurrentUser, session_keys};
