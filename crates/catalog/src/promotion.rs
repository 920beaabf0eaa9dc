use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lamoon_core::{Channel, ProductId};

/// A channel-gated bundle promotion: eligible base item + accessory → bundle SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlePromotion {
    name: String,
    accessory: ProductId,
    /// Eligible (largest-size) base product → bundle SKU replacing it.
    pairings: BTreeMap<ProductId, ProductId>,
    channels: BTreeSet<Channel>,
}

impl BundlePromotion {
    pub(crate) fn new(
        name: impl Into<String>,
        accessory: ProductId,
        pairings: BTreeMap<ProductId, ProductId>,
        channels: BTreeSet<Channel>,
    ) -> Self {
        Self {
            name: name.into(),
            accessory,
            pairings,
            channels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accessory(&self) -> &ProductId {
        &self.accessory
    }

    /// Whether orders placed through `channel` are eligible for this promotion.
    pub fn applies_to(&self, channel: Channel) -> bool {
        self.channels.contains(&channel)
    }

    /// Bundle SKU that replaces one unit of `base` plus one accessory unit.
    pub fn bundle_for(&self, base: &ProductId) -> Option<&ProductId> {
        self.pairings.get(base)
    }

    pub fn pairings(&self) -> impl Iterator<Item = (&ProductId, &ProductId)> {
        self.pairings.iter()
    }
}
