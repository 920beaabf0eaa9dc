use serde::{Deserialize, Serialize};

use lamoon_catalog::Category;
use lamoon_core::{Channel, Money};
use lamoon_sales::{Order, OrderItem, RecordSet};

use crate::breakdown::{BreakdownRow, category_series, channel_series};
use crate::calendar;
use crate::comparison::MonthlyComparisons;
use crate::filter::Filters;
use crate::kpi::{KpiCards, Kpis};
use crate::period::{MixPoint, PeriodAxis, SeriesPoint};
use crate::rollup::ProductRollups;

/// Everything a dashboard renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub kpis: Kpis,
    pub kpi_cards: KpiCards,
    /// Previous calendar month before the reference date.
    pub reference_kpis: Kpis,
    pub reference_kpi_cards: KpiCards,
    pub period_series: Vec<SeriesPoint<Money>>,
    pub customer_mix: Vec<MixPoint>,
    pub channel_series: Vec<BreakdownRow<Channel>>,
    pub category_series: Vec<BreakdownRow<Category>>,
    pub product_rollups: ProductRollups,
    pub monthly_comparisons: MonthlyComparisons,
}

impl DashboardView {
    /// All KPIs not applicable, every series empty.
    pub fn no_data() -> Self {
        let kpis = Kpis::not_applicable();
        let cards = KpiCards::from(&kpis);
        Self {
            kpi_cards: cards.clone(),
            reference_kpi_cards: cards,
            reference_kpis: kpis.clone(),
            kpis,
            period_series: Vec::new(),
            customer_mix: Vec::new(),
            channel_series: Vec::new(),
            category_series: Vec::new(),
            product_rollups: ProductRollups::default(),
            monthly_comparisons: MonthlyComparisons::default(),
        }
    }

    /// Whether this is the no-data view.
    pub fn is_no_data(&self) -> bool {
        self.kpis.total_sales.is_none()
    }
}

/// Run one aggregation request against `records`.
///
/// An empty channel or category selection returns [`DashboardView::no_data`]
/// instead of falling back to "everything".
pub fn aggregate(records: &RecordSet, filters: &Filters) -> DashboardView {
    if filters.selects_nothing() {
        tracing::debug!("empty channel or category selection, returning no-data view");
        return DashboardView::no_data();
    }

    let orders: Vec<&Order> = records.orders().iter().filter(|o| filters.admits(o)).collect();
    let items: Vec<(&Order, &OrderItem)> = records
        .items()
        .iter()
        .filter_map(|item| {
            let order = records.order(&item.order_id)?;
            filters.admits(order).then_some((order, item))
        })
        .collect();
    tracing::debug!(
        orders = orders.len(),
        items = items.len(),
        start = %filters.start_date,
        end = %filters.end_date,
        "filtered records"
    );

    let kpis = Kpis::compute(&orders);
    let reference_kpis = reference_kpis(records, filters);

    let axis = PeriodAxis::for_orders(filters, &orders);
    let period_series = axis.series(&orders, |o| o.sales);
    let customer_mix = axis.customer_mix(&orders);

    let item_refs: Vec<&OrderItem> = items.iter().map(|(_, item)| *item).collect();
    let product_rollups = ProductRollups::compute(&item_refs, records.ambiguous_base_names());
    let monthly_comparisons = MonthlyComparisons::compute(&filters.months(), &orders, &items);

    tracing::debug!(periods = axis.labels().len(), "aggregation complete");

    DashboardView {
        kpi_cards: KpiCards::from(&kpis),
        reference_kpi_cards: KpiCards::from(&reference_kpis),
        kpis,
        reference_kpis,
        period_series,
        customer_mix,
        channel_series: channel_series(&orders),
        category_series: category_series(&orders),
        product_rollups,
        monthly_comparisons,
    }
}

/// KPIs for the calendar month before `filters.reference_date`, keeping
/// the channel and category selection but not the date range.
fn reference_kpis(records: &RecordSet, filters: &Filters) -> Kpis {
    let Some((first, last)) = calendar::previous_month(filters.reference_date) else {
        return Kpis::not_applicable();
    };
    let orders: Vec<&Order> = records
        .orders()
        .iter()
        .filter(|o| (first..=last).contains(&o.date()) && filters.admits_segment(o))
        .collect();
    Kpis::compute(&orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use lamoon_core::{OrderId, ProductId};
    use lamoon_sales::CustomerStatus;

    use crate::calendar::Month;
    use crate::filter::PeriodMode;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    struct Fixture {
        orders: Vec<Order>,
        items: Vec<OrderItem>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                orders: Vec::new(),
                items: Vec::new(),
            }
        }

        fn order(
            mut self,
            date: NaiveDate,
            channel: Channel,
            status: CustomerStatus,
            lines: &[(&str, Category, u32, u64)],
        ) -> Self {
            let order_id = OrderId::sequential(self.orders.len() as u64);
            let mut sales = Money::ZERO;
            for (name, category, quantity, baht) in lines {
                sales += Money::baht(*baht);
                self.items.push(OrderItem {
                    order_id: order_id.clone(),
                    product_id: ProductId::registered(self.items.len() as u32 + 1),
                    product_name: name.to_string(),
                    base_name: name.to_string(),
                    category: *category,
                    quantity: *quantity,
                    item_sales: Money::baht(*baht),
                });
            }
            self.orders.push(Order {
                order_id,
                timestamp: date.and_hms_opt(10, 0, 0).unwrap(),
                channel,
                customer_status: status,
                sales,
                dominant_category: lines[0].1,
            });
            self
        }

        fn build(self) -> RecordSet {
            RecordSet::new(self.orders, self.items)
        }
    }

    fn records() -> RecordSet {
        Fixture::new()
            .order(
                d(2026, 9, 8),
                Channel::Shopee,
                CustomerStatus::New,
                &[("Glow Serum", Category::Skincare, 1, 990)],
            )
            .order(
                d(2026, 10, 20),
                Channel::Shopee,
                CustomerStatus::Returning,
                &[
                    ("Silk Shampoo", Category::Haircare, 2, 780),
                    ("Travel Pouch", Category::Accessories, 1, 250),
                ],
            )
            .order(
                d(2026, 10, 22),
                Channel::Lazada,
                CustomerStatus::New,
                &[("Vitamin C", Category::Supplements, 1, 350)],
            )
            .build()
    }

    #[test]
    fn empty_channel_selection_gives_no_data() {
        let filters =
            Filters::custom(d(2026, 1, 1), d(2026, 12, 31), d(2026, 10, 31)).with_channels([]);
        let view = aggregate(&records(), &filters);
        assert!(view.is_no_data());
        assert_eq!(view.kpis, Kpis::not_applicable());
        assert_eq!(view.reference_kpis, Kpis::not_applicable());
        assert_eq!(view.kpi_cards.total_sales, "N/A");
        assert!(view.period_series.is_empty());
        assert!(view.customer_mix.is_empty());
        assert!(view.channel_series.is_empty());
        assert!(view.category_series.is_empty());
        assert!(view.product_rollups.top_by_sales.is_empty());
        assert!(view.monthly_comparisons.customers.is_empty());
        assert!(view.monthly_comparisons.categories.is_empty());
    }

    #[test]
    fn empty_category_selection_gives_no_data() {
        let filters =
            Filters::custom(d(2026, 1, 1), d(2026, 12, 31), d(2026, 10, 31)).with_categories([]);
        assert_eq!(aggregate(&records(), &filters), DashboardView::no_data());
    }

    #[test]
    fn daily_view_of_one_week() {
        let filters = Filters::latest_week(d(2026, 10, 22), 0, d(2026, 10, 31))
            .with_channels([Channel::Shopee]);
        let view = aggregate(&records(), &filters);

        assert_eq!(view.kpis.total_sales, Some(Money::baht(1030)));
        assert_eq!(view.kpis.order_count, Some(1));
        assert_eq!(view.period_series.len(), 7);
        assert_eq!(view.period_series[1].label, "Tue");
        assert_eq!(view.period_series[1].value, Money::baht(1030));
        assert_eq!(view.customer_mix.len(), 14);

        // Items of the kept order, including the non-dominant category.
        let keys: BTreeSet<&str> = view
            .product_rollups
            .top_by_sales
            .iter()
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(keys, ["Silk Shampoo", "Travel Pouch"].into_iter().collect());
    }

    #[test]
    fn reference_kpis_cover_the_previous_month_only() {
        let filters = Filters::latest_week(d(2026, 10, 22), 0, d(2026, 10, 19));
        let view = aggregate(&records(), &filters);
        assert_eq!(view.reference_kpis.total_sales, Some(Money::baht(990)));
        assert_eq!(view.reference_kpi_cards.total_sales, "THB 990");
        assert_eq!(view.reference_kpis.new_customer_share, Some(100.0));
    }

    #[test]
    fn monthly_mode_uses_selected_months() {
        let months: BTreeSet<Month> = [Month::Oct, Month::Sep].into_iter().collect();
        let filters = Filters::calendar_year(2026, Some(months), d(2026, 10, 31)).unwrap();
        assert_eq!(filters.period_mode, PeriodMode::Monthly);
        let view = aggregate(&records(), &filters);

        let labels: Vec<&str> = view.period_series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Sep", "Oct"]);
        assert_eq!(view.period_series[1].value, Money::baht(1380));
        assert_eq!(view.monthly_comparisons.customers.len(), 4);
        assert_eq!(view.channel_series[0].key, Channel::Shopee);
        assert_eq!(view.channel_series[0].sales, Money::baht(2020));
        // Sep 990 / 1 and Oct 1380 / 2 average to 840.
        assert_eq!(view.kpis.average_order_value, Some(Money::baht(840)));
    }

    #[test]
    fn view_serializes_to_json() {
        let filters = Filters::custom(d(2026, 9, 1), d(2026, 10, 31), d(2026, 11, 1));
        let view = aggregate(&records(), &filters);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kpi_cards"]["order_count"], "3");
        assert_eq!(json["period_series"].as_array().unwrap().len(), 3);
    }
}
