//! `lamoon-core`: shared building blocks for the analytics engine.
//!
//! This crate contains **pure domain** primitives (ids, money, errors) with no
//! knowledge of the catalog, synthesis or aggregation.

pub mod channel;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use channel::Channel;
pub use entity::{Entity, index_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{OrderId, ProductId};
pub use money::Money;
