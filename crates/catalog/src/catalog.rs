use std::collections::{BTreeMap, BTreeSet, HashMap};

use lamoon_core::{Channel, Money, ProductId, index_by_id};

use crate::product::{Category, Product};
use crate::promotion::BundlePromotion;

/// Channels on which the standard bundle promotions run.
const PROMOTION_CHANNELS: [Channel; 3] = [Channel::Shopee, Channel::Lazada, Channel::Tiktok];

/// Immutable product catalog.
///
/// Construction is pure: the same builder calls always yield the same ids,
/// prices and promotions.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    promotions: Vec<BundlePromotion>,
}

impl Catalog {
    /// The storefront's standard catalog.
    pub fn standard() -> Self {
        CatalogBuilder::new()
            .sized(
                "Glow Serum",
                Category::Skincare,
                &[(15, Money::baht(590)), (30, Money::baht(990)), (50, Money::baht(1_490))],
            )
            .sized(
                "Hydra Cream",
                Category::Skincare,
                &[(30, Money::baht(790)), (50, Money::baht(1_190))],
            )
            .single("Silk Mist", Category::Skincare, Money::baht(450))
            .sized(
                "Silk Shampoo",
                Category::Haircare,
                &[(250, Money::baht(390)), (500, Money::baht(650))],
            )
            .sized(
                "Repair Conditioner",
                Category::Haircare,
                &[(250, Money::baht(420)), (500, Money::baht(690))],
            )
            .single("Silk Mist", Category::Haircare, Money::baht(380))
            .single("Vitamin C", Category::Supplements, Money::baht(350))
            .single("Collagen Plus", Category::Supplements, Money::baht(890))
            .single("Travel Pouch", Category::Accessories, Money::baht(250))
            .single("Silk Headband", Category::Accessories, Money::baht(190))
            .promotion(
                "Serum & Cream Duo",
                &["Glow Serum", "Hydra Cream"],
                "Mini Spatula",
                Money::baht(90),
                &PROMOTION_CHANNELS,
            )
            .promotion(
                "Salon Hair Duo",
                &["Silk Shampoo", "Repair Conditioner"],
                "Shower Cap",
                Money::baht(120),
                &PROMOTION_CHANNELS,
            )
            .build()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&i| &self.products[i])
    }

    pub fn promotions(&self) -> &[BundlePromotion] {
        &self.promotions
    }

    /// Directly selectable products of `category`, in catalog order.
    pub fn selectable_in(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_selectable() && p.category() == category)
            .collect()
    }

    /// Categories in first-seen catalog order.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category()) {
                seen.push(product.category());
            }
        }
        seen
    }

    /// Largest size variant registered under `base_name` (bundles excluded).
    ///
    /// Non-sized products count as their own largest variant. Ties keep the
    /// first registered product.
    pub fn largest_variant(&self, base_name: &str) -> Option<&Product> {
        largest_of(&self.products, base_name)
    }

    /// Base names carried by products of more than one category.
    pub fn ambiguous_base_names(&self) -> BTreeSet<String> {
        let mut categories: BTreeMap<&str, BTreeSet<Category>> = BTreeMap::new();
        for product in &self.products {
            categories
                .entry(product.base_name())
                .or_default()
                .insert(product.category());
        }
        categories
            .into_iter()
            .filter(|(_, cats)| cats.len() > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// A promotion group as declared, resolved into products at `build()`.
#[derive(Debug, Clone)]
struct PromotionDecl {
    name: String,
    eligible: Vec<String>,
    accessory_name: String,
    accessory_price: Money,
    channels: BTreeSet<Channel>,
}

/// Builder for [`Catalog`].
///
/// Product lines are registered first, then (at `build()`) one accessory per
/// promotion group, then one bundle SKU per (eligible base item, accessory)
/// pairing.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    products: Vec<Product>,
    promotions: Vec<PromotionDecl>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a non-sized product line.
    pub fn single(mut self, name: &str, category: Category, price: Money) -> Self {
        let id = self.next_product_id();
        self.products
            .push(Product::new(id, name, category, price, None, name, true));
        self
    }

    /// Register one product per `(size_ml, price)` variant.
    pub fn sized(mut self, base_name: &str, category: Category, variants: &[(u32, Money)]) -> Self {
        for &(size_ml, price) in variants {
            let id = self.next_product_id();
            self.products.push(Product::new(
                id,
                format!("{base_name} {size_ml}ml"),
                category,
                price,
                Some(size_ml),
                base_name,
                true,
            ));
        }
        self
    }

    /// Declare a bundle promotion over the largest variants of `eligible`.
    pub fn promotion(
        mut self,
        name: &str,
        eligible: &[&str],
        accessory_name: &str,
        accessory_price: Money,
        channels: &[Channel],
    ) -> Self {
        self.promotions.push(PromotionDecl {
            name: name.to_string(),
            eligible: eligible.iter().map(|s| s.to_string()).collect(),
            accessory_name: accessory_name.to_string(),
            accessory_price,
            channels: channels.iter().copied().collect(),
        });
        self
    }

    pub fn build(mut self) -> Catalog {
        let decls = std::mem::take(&mut self.promotions);

        let mut accessories = Vec::with_capacity(decls.len());
        for decl in &decls {
            let id = self.next_product_id();
            self.products.push(Product::new(
                id.clone(),
                decl.accessory_name.as_str(),
                Category::Accessories,
                decl.accessory_price,
                None,
                decl.accessory_name.as_str(),
                true,
            ));
            accessories.push(id);
        }

        let mut next_bundle = 1;
        let mut promotions = Vec::with_capacity(decls.len());
        for (decl, accessory_id) in decls.iter().zip(accessories) {
            let mut pairings = BTreeMap::new();
            for base_name in &decl.eligible {
                let Some(base) = largest_of(&self.products, base_name).cloned() else {
                    tracing::warn!(
                        promotion = %decl.name,
                        base_name = %base_name,
                        "promotion references unknown base product; no bundle registered"
                    );
                    continue;
                };
                let bundle_id = ProductId::bundle(next_bundle);
                next_bundle += 1;
                let bundle = Product::new(
                    bundle_id.clone(),
                    format!("{} + {}", base.name(), decl.accessory_name),
                    base.category(),
                    base.price() + decl.accessory_price,
                    base.size_ml(),
                    base.base_name(),
                    false,
                );
                pairings.insert(base.id_typed().clone(), bundle_id);
                self.products.push(bundle);
            }
            promotions.push(BundlePromotion::new(
                decl.name.as_str(),
                accessory_id,
                pairings,
                decl.channels.clone(),
            ));
        }

        let index = index_by_id(&self.products);

        Catalog {
            products: self.products,
            index,
            promotions,
        }
    }

    fn next_product_id(&self) -> ProductId {
        let registered = self.products.iter().filter(|p| !p.is_bundle()).count();
        ProductId::registered(registered as u32 + 1)
    }
}

fn largest_of<'a>(products: &'a [Product], base_name: &str) -> Option<&'a Product> {
    let mut best: Option<&Product> = None;
    for product in products
        .iter()
        .filter(|p| !p.is_bundle() && p.base_name() == base_name)
    {
        let size = product.size_ml().unwrap_or(0);
        if best.is_none_or(|b| size > b.size_ml().unwrap_or(0)) {
            best = Some(product);
        }
    }
    best
}
