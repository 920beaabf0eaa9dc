//! Synthetic sales.
//!
//! Turns the catalog into a reproducible set of orders and order items:
//! weighted channel/category/customer draws, capped geometric baskets and
//! channel-gated bundle conversion. All randomness flows through one
//! explicitly seeded generator.

pub mod basket;
pub mod bundle;
pub mod order;
pub mod records;
pub mod synthesizer;
pub mod weights;

pub use basket::{Basket, BasketEntry};
pub use bundle::convert_bundles;
pub use order::{CustomerStatus, Order, OrderItem, dominant_category};
pub use records::RecordSet;
pub use synthesizer::{MAX_BASKET_UNITS, MAX_ORDER_COUNT, SynthesisConfig, synthesize};
pub use weights::{WeightTable, WeightedChoice};
