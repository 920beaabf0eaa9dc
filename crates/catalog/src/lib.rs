//! Product catalog.
//!
//! Builds the static, deterministic set of priced SKUs the synthesizer draws
//! from: single products, size variants, promotion accessories and the
//! bundle SKUs reachable only through bundle conversion.

pub mod catalog;
pub mod product;
pub mod promotion;

pub use catalog::{Catalog, CatalogBuilder};
pub use product::{Category, Product};
pub use promotion::BundlePromotion;
