//! Nextgen Core - Shared types library.
//!
//! Common types used by the Nextgen Food Court storefront. The core crate
//! contains only types - no I/O, no HTTP clients - so it can be used from
//! any component without dragging in a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles
//!   and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
