//! Strongly-typed identifiers used across the engine.
//!
//! Identifiers are short, human-readable codes (`P001`, `B003`, `ORD10042`)
//! minted sequentially, so two runs of the same construction produce the same
//! ids.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog product (regular SKU or bundle SKU).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a synthesized order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

/// First sequential order number (`ORD10001`).
const FIRST_ORDER_NUMBER: u64 = 10_001;

impl ProductId {
    /// Id of the `n`-th registered product (1-based): `P001`, `P002`, ...
    pub fn registered(n: u32) -> Self {
        Self(format!("P{n:03}"))
    }

    /// Id of the `n`-th bundle SKU (1-based): `B001`, `B002`, ...
    pub fn bundle(n: u32) -> Self {
        Self(format!("B{n:03}"))
    }

    pub fn is_bundle(&self) -> bool {
        self.0.starts_with('B')
    }
}

impl OrderId {
    /// Id of the order at zero-based `index` in a synthesis run.
    pub fn sequential(index: u64) -> Self {
        Self(format!("ORD{}", FIRST_ORDER_NUMBER + index))
    }
}

macro_rules! impl_code_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let valid = !s.is_empty()
                    && s.starts_with(|c: char| c.is_ascii_uppercase())
                    && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
                if !valid {
                    return Err(DomainError::invalid_id(format!("{}: {:?}", $name, s)));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_code_newtype!(ProductId, "ProductId");
impl_code_newtype!(OrderId, "OrderId");
