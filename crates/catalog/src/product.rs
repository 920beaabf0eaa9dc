use core::str::FromStr;
use serde::{Deserialize, Serialize};

use lamoon_core::{DomainError, Entity, Money, ProductId};

/// Product grouping used for catalog organization and reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Skincare,
    Haircare,
    Supplements,
    Accessories,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Skincare,
        Category::Haircare,
        Category::Supplements,
        Category::Accessories,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Skincare => "Skincare",
            Category::Haircare => "Haircare",
            Category::Supplements => "Supplements",
            Category::Accessories => "Accessories",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::invalid_id(format!("Category: {s:?}")))
    }
}

/// A priced SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: Category,
    price: Money,
    /// Volume in milliliters; `None` for non-sized products.
    size_ml: Option<u32>,
    base_name: String,
    /// Bundle SKUs are not selectable; they are reached through conversion only.
    selectable: bool,
}

impl Product {
    pub(crate) fn new(
        id: ProductId,
        name: impl Into<String>,
        category: Category,
        price: Money,
        size_ml: Option<u32>,
        base_name: impl Into<String>,
        selectable: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            price,
            size_ml,
            base_name: base_name.into(),
            selectable,
        }
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn size_ml(&self) -> Option<u32> {
        self.size_ml
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn is_bundle(&self) -> bool {
        self.id.is_bundle()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
