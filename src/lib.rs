//! # Fresh Bites
//!
//! Client-local food ordering storefront. A fixed menu catalog, a cart
//! ledger with derived pricing, a favorites list, and a delivery checkout
//! flow. Single user, single process, no backend.
//!
//! ## Layout
//!
//! - [`catalog`]: the compiled-in menu plus category/term search
//! - [`cart`]: quantity-per-item ledger and subtotal/tax/total derivation
//! - [`favorites`]: persisted list of favorite item ids
//! - [`checkout`]: delivery form validation and order placement
//! - [`storage`]: key-value persistence behind the [`storage::Store`] seam
//! - [`config`]: environment-driven settings and named behavior policies
//!
//! ## State
//!
//! Cart and favorites are the only mutable state. Both live in explicitly
//! owned ledger objects that persist themselves after every mutation;
//! everything the views consume (lines, totals, filtered menus) is derived
//! on read from the raw counts plus the static catalog, so a stored total
//! can never drift out of sync with its lines.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod favorites;
pub mod storage;
pub mod utils;
