//! Core types for Nextgen Food Court.
//!
//! Type-safe wrappers for the domain concepts shared across the storefront.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::{OrderStatus, Role};
