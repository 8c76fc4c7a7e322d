//! Commission Reporting Engine
//!
//! Pure, deterministic folds over an order ledger slice. Revenue and
//! commission count delivered orders only, matching the hotel counter
//! accrual, since the partner is owed nothing for orders that never arrived.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::models::{Hotel, Order, OrderStatus, StatusVocabulary};

/// Per-hotel commission aggregate
#[derive(Debug, Clone, Serialize)]
pub struct HotelCommissionReport {
    pub hotel_slug: String,
    pub hotel_name: String,
    pub total_orders: usize,
    pub delivered_orders: usize,
    /// Delivered orders only
    pub total_revenue: f64,
    /// Delivered orders only
    pub total_commission: f64,
    /// Average delivered order value; 0 when none delivered
    pub avg_order_value: f64,
    /// delivered / total as a percentage, two decimals
    pub conversion_rate: f64,
}

/// Ledger-wide aggregate across all visible hotels
#[derive(Debug, Clone, Serialize)]
pub struct OrdersSummary {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
    pub total_revenue: f64,
    pub total_commission: f64,
    pub avg_order_value: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Default)]
struct Accumulator {
    total: usize,
    delivered: usize,
    pending: usize,
    revenue: f64,
    commission: f64,
}

impl Accumulator {
    fn add(&mut self, order: &Order, terminal: OrderStatus) {
        self.total += 1;
        if order.status == OrderStatus::Pending {
            self.pending += 1;
        }
        if order.status == terminal {
            self.delivered += 1;
            self.revenue += order.order_value;
            self.commission += order.commission.amount;
        }
    }

    fn avg_order_value(&self) -> f64 {
        if self.delivered == 0 {
            0.0
        } else {
            self.revenue / self.delivered as f64
        }
    }

    fn conversion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            round2(self.delivered as f64 / self.total as f64 * 100.0)
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Group the ledger by hotel slug
///
/// Output is sorted by slug for stable responses. `hotels` supplies
/// display names; a slug with no registry entry (historical orders for a
/// removed hotel) still reports, with an empty name.
pub fn per_hotel(
    orders: &[Order],
    vocabulary: StatusVocabulary,
    hotels: &[Hotel],
) -> Vec<HotelCommissionReport> {
    let terminal = vocabulary.terminal_success();
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for order in orders {
        groups
            .entry(order.hotel_slug.as_str())
            .or_default()
            .add(order, terminal);
    }

    groups
        .into_iter()
        .map(|(slug, acc)| HotelCommissionReport {
            hotel_slug: slug.to_string(),
            hotel_name: hotels
                .iter()
                .find(|h| h.slug == slug)
                .map(|h| h.name.clone())
                .unwrap_or_default(),
            total_orders: acc.total,
            delivered_orders: acc.delivered,
            total_revenue: acc.revenue,
            total_commission: acc.commission,
            avg_order_value: acc.avg_order_value(),
            conversion_rate: acc.conversion_rate(),
        })
        .collect()
}

/// Aggregate the ledger without grouping
pub fn summary(orders: &[Order], vocabulary: StatusVocabulary) -> OrdersSummary {
    let terminal = vocabulary.terminal_success();
    let mut acc = Accumulator::default();
    for order in orders {
        acc.add(order, terminal);
    }

    OrdersSummary {
        total_orders: acc.total,
        pending_orders: acc.pending,
        delivered_orders: acc.delivered,
        total_revenue: acc.revenue,
        total_commission: acc.commission,
        avg_order_value: acc.avg_order_value(),
        conversion_rate: acc.conversion_rate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Analytics, Category, Commission, Customer, OrderTimestamps, ProductSnapshot};
    use crate::utils::DeviceInfo;
    use axum::http::HeaderMap;

    fn order(slug: &str, status: OrderStatus, value: f64, rate: f64) -> Order {
        Order {
            id: None,
            hotel_slug: slug.to_string(),
            hotel_id: ("hotels", slug).into(),
            product_id: ("products", "p1").into(),
            product: ProductSnapshot {
                name: "Marble Taj Mahal Replica".into(),
                price: value,
                category: Category::Marble,
                artisan: "Rafiq".into(),
            },
            customer: Customer::default(),
            status,
            order_value: value,
            commission: Commission::compute(value, rate),
            whatsapp_message: None,
            delivery_notes: None,
            device: DeviceInfo::collect("203.0.113.1", &HeaderMap::new()),
            analytics: Analytics::default(),
            timestamps: OrderTimestamps::at("2026-08-01T10:00:00.000Z".into()),
            created_at: "2026-08-01T10:00:00.000Z".into(),
        }
    }

    #[test]
    fn per_hotel_report_matches_delivered_only_semantics() {
        // 2 orders, 1 delivered, value 1000 each, rate 10%
        let orders = vec![
            order("pearl-hotel", OrderStatus::Delivered, 1000.0, 10.0),
            order("pearl-hotel", OrderStatus::Pending, 1000.0, 10.0),
        ];

        let report = per_hotel(&orders, StatusVocabulary::Delivery, &[]);
        assert_eq!(report.len(), 1);
        let row = &report[0];
        assert_eq!(row.hotel_slug, "pearl-hotel");
        assert_eq!(row.total_orders, 2);
        assert_eq!(row.delivered_orders, 1);
        assert_eq!(row.total_revenue, 1000.0);
        assert_eq!(row.total_commission, 100.0);
        assert_eq!(row.avg_order_value, 1000.0);
        assert_eq!(row.conversion_rate, 50.0);
    }

    #[test]
    fn groups_are_sorted_and_independent() {
        let orders = vec![
            order("zamzam-inn", OrderStatus::Delivered, 500.0, 20.0),
            order("agra-gate", OrderStatus::Cancelled, 700.0, 10.0),
            order("zamzam-inn", OrderStatus::Delivered, 300.0, 20.0),
        ];

        let report = per_hotel(&orders, StatusVocabulary::Delivery, &[]);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].hotel_slug, "agra-gate");
        assert_eq!(report[0].delivered_orders, 0);
        assert_eq!(report[0].total_revenue, 0.0);
        assert_eq!(report[0].conversion_rate, 0.0);
        assert_eq!(report[1].hotel_slug, "zamzam-inn");
        assert_eq!(report[1].total_revenue, 800.0);
        assert_eq!(report[1].total_commission, 160.0);
        assert_eq!(report[1].avg_order_value, 400.0);
        assert_eq!(report[1].conversion_rate, 100.0);
    }

    #[test]
    fn conversion_rate_rounds_to_two_decimals() {
        let mut orders = vec![order("pearl-hotel", OrderStatus::Delivered, 100.0, 10.0)];
        orders.push(order("pearl-hotel", OrderStatus::Pending, 100.0, 10.0));
        orders.push(order("pearl-hotel", OrderStatus::Pending, 100.0, 10.0));
        // 1/3 = 33.333... -> 33.33
        let report = per_hotel(&orders, StatusVocabulary::Delivery, &[]);
        assert_eq!(report[0].conversion_rate, 33.33);
    }

    #[test]
    fn summary_counts_pending_and_handles_empty_ledger() {
        let empty = summary(&[], StatusVocabulary::Delivery);
        assert_eq!(empty.total_orders, 0);
        assert_eq!(empty.conversion_rate, 0.0);
        assert_eq!(empty.avg_order_value, 0.0);

        let orders = vec![
            order("pearl-hotel", OrderStatus::Pending, 1000.0, 10.0),
            order("agra-gate", OrderStatus::Fulfilled, 400.0, 15.0),
        ];
        let s = summary(&orders, StatusVocabulary::Simple);
        assert_eq!(s.total_orders, 2);
        assert_eq!(s.pending_orders, 1);
        assert_eq!(s.delivered_orders, 1);
        assert_eq!(s.total_revenue, 400.0);
        assert_eq!(s.total_commission, 60.0);
        assert_eq!(s.conversion_rate, 50.0);
    }

    #[test]
    fn report_keeps_orphaned_slugs() {
        let orders = vec![order("ghost-hotel", OrderStatus::Delivered, 100.0, 10.0)];
        let report = per_hotel(&orders, StatusVocabulary::Delivery, &[]);
        assert_eq!(report[0].hotel_slug, "ghost-hotel");
        assert_eq!(report[0].hotel_name, "");
    }
}
