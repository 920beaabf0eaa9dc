//! Order synthesis.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use lamoon_catalog::{Catalog, Category, Product};
use lamoon_core::{Channel, DomainError, DomainResult, OrderId};

use crate::basket::Basket;
use crate::bundle::convert_bundles;
use crate::order::{CustomerStatus, Order};
use crate::records::RecordSet;
use crate::weights::{WeightTable, WeightedChoice};

/// Hard cap on units drawn into one basket.
pub const MAX_BASKET_UNITS: u32 = 10;

/// Largest order count one synthesis run accepts. Order numbers stay
/// within eight digits (`ORD10001` .. `ORD10010000`).
pub const MAX_ORDER_COUNT: usize = 10_000_000;

/// Continuation probability lost per unit already in the basket.
const CONTINUE_DECAY: f64 = 0.1;

/// Order hours are drawn from 08:00 to 21:00 inclusive.
const FIRST_HOUR: u32 = 8;
const LAST_HOUR: u32 = 21;

/// Everything synthesis depends on besides the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub order_count: usize,
    pub seed: u64,
    /// Latest possible order date.
    pub reference_date: NaiveDate,
    /// Orders are spread uniformly over `reference_date - lookback_days ..= reference_date`.
    pub lookback_days: u32,
    pub channel_weights: WeightTable<Channel>,
    pub category_weights: WeightTable<Category>,
    pub customer_weights: WeightTable<CustomerStatus>,
}

impl SynthesisConfig {
    pub fn new(order_count: usize, seed: u64, reference_date: NaiveDate) -> Self {
        Self {
            order_count,
            seed,
            reference_date,
            lookback_days: 120,
            channel_weights: WeightTable::new([
                (Channel::Shopee, 0.30),
                (Channel::Lazada, 0.20),
                (Channel::Tiktok, 0.20),
                (Channel::LineOA, 0.10),
                (Channel::Facebook, 0.10),
                (Channel::LineShopping, 0.10),
            ]),
            category_weights: WeightTable::new([
                (Category::Skincare, 0.40),
                (Category::Haircare, 0.30),
                (Category::Supplements, 0.15),
                (Category::Accessories, 0.15),
            ]),
            customer_weights: WeightTable::new([
                (CustomerStatus::New, 0.45),
                (CustomerStatus::Returning, 0.55),
            ]),
        }
    }

    pub fn with_channel_weights(mut self, weights: WeightTable<Channel>) -> Self {
        self.channel_weights = weights;
        self
    }

    pub fn with_category_weights(mut self, weights: WeightTable<Category>) -> Self {
        self.category_weights = weights;
        self
    }

    pub fn with_lookback_days(mut self, lookback_days: u32) -> Self {
        self.lookback_days = lookback_days;
        self
    }
}

/// Synthesize `config.order_count` orders and their items.
///
/// All configuration is validated before the first draw, so an invalid
/// weight table fails even for a zero-order request. The same catalog and
/// config always produce identical records.
pub fn synthesize(catalog: &Catalog, config: &SynthesisConfig) -> DomainResult<RecordSet> {
    if config.order_count > MAX_ORDER_COUNT {
        return Err(DomainError::invalid_configuration(format!(
            "order count {} exceeds the maximum of {MAX_ORDER_COUNT}",
            config.order_count
        )));
    }
    let draws = Draws::prepare(catalog, config)?;
    let first_day = config
        .reference_date
        .checked_sub_signed(Duration::days(i64::from(config.lookback_days)))
        .ok_or_else(|| DomainError::invalid_configuration("lookback window out of date range"))?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut orders = Vec::with_capacity(config.order_count);
    let mut items = Vec::new();

    for index in 0..config.order_count {
        let timestamp = draw_timestamp(&mut rng, first_day, config.lookback_days)?;
        let channel = draws.channels.draw(&mut rng);
        let customer_status = draws.statuses.draw(&mut rng);
        let basket = draws.basket(&mut rng)?;
        let basket = convert_bundles(basket, channel, catalog, &mut rng);

        let (order, order_items) = Order::from_basket(
            OrderId::sequential(index as u64),
            timestamp,
            channel,
            customer_status,
            &basket,
            catalog,
        )?;
        orders.push(order);
        items.extend(order_items);
    }

    let bundle_units: u32 = items
        .iter()
        .filter(|i| i.product_id.is_bundle())
        .map(|i| i.quantity)
        .sum();
    tracing::info!(
        orders = orders.len(),
        items = items.len(),
        bundle_units,
        seed = config.seed,
        "synthesized order records"
    );

    Ok(RecordSet::new(orders, items).with_ambiguous_base_names(catalog.ambiguous_base_names()))
}

/// Validated samplers plus the per-category product pools.
struct Draws<'c> {
    channels: WeightedChoice<Channel>,
    statuses: WeightedChoice<CustomerStatus>,
    categories: WeightedChoice<Category>,
    pools: HashMap<Category, Vec<&'c Product>>,
}

impl<'c> Draws<'c> {
    fn prepare(catalog: &'c Catalog, config: &SynthesisConfig) -> DomainResult<Self> {
        let channels = config.channel_weights.sampler("channel")?;
        let statuses = config.customer_weights.sampler("customer status")?;
        let categories = config.category_weights.sampler("category")?;

        let mut pools = HashMap::new();
        for category in config.category_weights.drawable() {
            let pool = catalog.selectable_in(category);
            if pool.is_empty() {
                return Err(DomainError::invalid_configuration(format!(
                    "category {category} has weight but no selectable products"
                )));
            }
            pools.insert(category, pool);
        }

        tracing::debug!(categories = pools.len(), "synthesis draws prepared");
        Ok(Self {
            channels,
            statuses,
            categories,
            pools,
        })
    }

    /// Draw one basket: weighted category, then a uniform product in it,
    /// one unit at a time, until the cap or the decaying continuation draw
    /// stops it.
    fn basket<R: Rng + ?Sized>(&self, rng: &mut R) -> DomainResult<Basket> {
        let mut basket = Basket::new();
        let mut units = 0u32;
        loop {
            let category = self.categories.draw(rng);
            let pool = self.pools.get(&category).ok_or_else(|| {
                DomainError::invalid_configuration(format!("no product pool for {category}"))
            })?;
            let product = pool[rng.gen_range(0..pool.len())];
            basket.add(product.id_typed().clone(), product.price(), 1);
            units += 1;

            if units >= MAX_BASKET_UNITS {
                break;
            }
            let keep_going = (1.0 - CONTINUE_DECAY * f64::from(units)).clamp(0.0, 1.0);
            if !rng.gen_bool(keep_going) {
                break;
            }
        }
        Ok(basket)
    }
}

fn draw_timestamp<R: Rng + ?Sized>(
    rng: &mut R,
    first_day: NaiveDate,
    lookback_days: u32,
) -> DomainResult<NaiveDateTime> {
    let offset = rng.gen_range(0..=lookback_days);
    let hour = rng.gen_range(FIRST_HOUR..=LAST_HOUR);
    let date = first_day
        .checked_add_signed(Duration::days(i64::from(offset)))
        .ok_or_else(|| DomainError::invalid_configuration("order date out of range"))?;
    let time = NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| DomainError::invalid_configuration(format!("invalid order hour {hour}")))?;
    Ok(date.and_time(time))
}
