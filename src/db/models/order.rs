//! Order Model
//!
//! An order is an append-mostly ledger row: it snapshots the product and
//! hotel state at placement time so later catalog or registry edits never
//! corrupt history. The status vocabulary is configurable: the full
//! delivery pipeline for the back-office profile, or a collapsed
//! pending/fulfilled pair for the lightweight storefront profile, over
//! the same entity.

use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use super::{Category, Hotel, Product};
use crate::utils::DeviceInfo;

pub type OrderId = RecordId;

/// Minutes quoted to the guest for hotel delivery
pub const ESTIMATED_DELIVERY_MINUTES: i64 = 30;

// =============================================================================
// Status machine
// =============================================================================

/// Order status across both vocabularies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Delivering,
    Delivered,
    Fulfilled,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "delivering" => Ok(OrderStatus::Delivering),
            "delivered" => Ok(OrderStatus::Delivered),
            "fulfilled" => Ok(OrderStatus::Fulfilled),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Configured status vocabulary
///
/// `Delivery` is the full pipeline; `Simple` collapses everything between
/// placement and handover into a single `fulfilled` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusVocabulary {
    Delivery,
    Simple,
}

impl StatusVocabulary {
    /// The forward chain, in rank order (cancelled sits outside the chain)
    pub fn chain(&self) -> &'static [OrderStatus] {
        match self {
            StatusVocabulary::Delivery => &[
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Delivering,
                OrderStatus::Delivered,
            ],
            StatusVocabulary::Simple => &[OrderStatus::Pending, OrderStatus::Fulfilled],
        }
    }

    /// Whether `status` belongs to this vocabulary
    pub fn contains(&self, status: OrderStatus) -> bool {
        status == OrderStatus::Cancelled || self.chain().contains(&status)
    }

    /// Terminal success state: reaching it credits the hotel
    pub fn terminal_success(&self) -> OrderStatus {
        match self {
            StatusVocabulary::Delivery => OrderStatus::Delivered,
            StatusVocabulary::Simple => OrderStatus::Fulfilled,
        }
    }

    /// Position of `status` in the forward chain
    pub fn rank(&self, status: OrderStatus) -> Option<usize> {
        self.chain().iter().position(|s| *s == status)
    }

    /// Statuses an order may currently hold for a transition to `target`
    ///
    /// Forward jumps are allowed (pending may go straight to delivered);
    /// backward moves and terminal re-entry are not. Cancellation is open
    /// to every non-terminal state. The returned set is the guard of the
    /// conditional update that makes commission accrual fire at most once.
    pub fn prior_states(&self, target: OrderStatus) -> Vec<OrderStatus> {
        if target == OrderStatus::Cancelled {
            return self
                .chain()
                .iter()
                .copied()
                .filter(|s| *s != self.terminal_success())
                .collect();
        }
        match self.rank(target) {
            Some(rank) => self.chain()[..rank].to_vec(),
            None => Vec::new(),
        }
    }
}

impl FromStr for StatusVocabulary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(StatusVocabulary::Delivery),
            "simple" => Ok(StatusVocabulary::Simple),
            other => Err(format!("unknown status vocabulary: {}", other)),
        }
    }
}

// =============================================================================
// Sub-records
// =============================================================================

/// Guest contact details, all optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

/// Product state captured at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub artisan: String,
}

/// Commission owed to the referring hotel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commission {
    /// Hotel's rate at order time, percent
    pub rate: f64,
    pub amount: f64,
}

impl Commission {
    /// The only constructor: keeps `amount == order_value * rate / 100`
    pub fn compute(order_value: f64, rate: f64) -> Self {
        Self {
            rate,
            amount: order_value * rate / 100.0,
        }
    }
}

/// Acquisition metadata reported by the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    /// qr_code | direct_link | referral
    #[serde(default = "default_source")]
    pub source: String,
    /// Seconds on site before ordering
    #[serde(default)]
    pub session_duration: u32,
    #[serde(default = "default_pages_viewed")]
    pub pages_viewed: u32,
    #[serde(default)]
    pub previous_orders: u32,
}

fn default_source() -> String {
    "qr_code".to_string()
}

fn default_pages_viewed() -> u32 {
    1
}

impl Default for Analytics {
    fn default() -> Self {
        Self {
            source: default_source(),
            session_duration: 0,
            pages_viewed: default_pages_viewed(),
            previous_orders: 0,
        }
    }
}

/// Per-state timestamps, stamped as each transition lands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTimestamps {
    pub ordered: String,
    #[serde(default)]
    pub confirmed: Option<String>,
    #[serde(default)]
    pub preparing: Option<String>,
    #[serde(default)]
    pub delivering: Option<String>,
    #[serde(default)]
    pub delivered: Option<String>,
    #[serde(default)]
    pub fulfilled: Option<String>,
    #[serde(default)]
    pub cancelled: Option<String>,
}

impl OrderTimestamps {
    pub fn at(ordered: String) -> Self {
        Self {
            ordered,
            confirmed: None,
            preparing: None,
            delivering: None,
            delivered: None,
            fulfilled: None,
            cancelled: None,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// Order ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Denormalized referral tag; survives hotel renames
    pub hotel_slug: String,
    #[serde(with = "serde_helpers::record_id")]
    pub hotel_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product_id: RecordId,
    pub product: ProductSnapshot,
    #[serde(default)]
    pub customer: Customer,
    pub status: OrderStatus,
    /// Product price at order time
    pub order_value: f64,
    pub commission: Commission,
    #[serde(default)]
    pub whatsapp_message: Option<String>,
    #[serde(default)]
    pub delivery_notes: Option<String>,
    pub device: DeviceInfo,
    #[serde(default)]
    pub analytics: Analytics,
    pub timestamps: OrderTimestamps,
    pub created_at: String,
}

impl Order {
    /// Assemble a pending order from live product/hotel records
    ///
    /// The caller has already verified the references exist and the
    /// product is orderable; this only snapshots and computes.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        product_id: RecordId,
        hotel_id: RecordId,
        product: &Product,
        hotel: &Hotel,
        customer: Customer,
        delivery_notes: Option<String>,
        analytics: Analytics,
        device: DeviceInfo,
        whatsapp_message: String,
        now: DateTime<Utc>,
    ) -> Self {
        let ordered = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        Self {
            id: None,
            hotel_slug: hotel.slug.clone(),
            hotel_id,
            product_id,
            product: ProductSnapshot {
                name: product.name.clone(),
                price: product.price,
                category: product.category,
                artisan: product.artisan.name.clone(),
            },
            customer,
            status: OrderStatus::Pending,
            order_value: product.price,
            commission: Commission::compute(product.price, hotel.commission_rate),
            whatsapp_message: Some(whatsapp_message),
            delivery_notes,
            device,
            analytics,
            timestamps: OrderTimestamps::at(ordered.clone()),
            created_at: ordered,
        }
    }

    /// Delivery estimate quoted to the guest, pending orders only
    pub fn estimated_delivery(&self) -> Option<String> {
        if self.status != OrderStatus::Pending {
            return None;
        }
        DateTime::parse_from_rfc3339(&self.timestamps.ordered)
            .ok()
            .map(|ordered| {
                (ordered.with_timezone(&Utc) + Duration::minutes(ESTIMATED_DELIVERY_MINUTES))
                    .to_rfc3339_opts(SecondsFormat::Millis, true)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_invariant_holds() {
        let c = Commission::compute(1000.0, 10.0);
        assert_eq!(c.amount, 100.0);
        let c = Commission::compute(2499.0, 12.5);
        assert!((c.amount - 2499.0 * 12.5 / 100.0).abs() < f64::EPSILON);
        // recompute after a rate change goes through the constructor again
        let c = Commission::compute(1000.0, 15.0);
        assert_eq!(c.amount, 150.0);
    }

    #[test]
    fn delivery_vocabulary_orders_states() {
        let v = StatusVocabulary::Delivery;
        assert_eq!(v.terminal_success(), OrderStatus::Delivered);
        assert!(v.contains(OrderStatus::Preparing));
        assert!(v.contains(OrderStatus::Cancelled));
        assert!(!v.contains(OrderStatus::Fulfilled));
        assert!(v.rank(OrderStatus::Pending) < v.rank(OrderStatus::Delivered));
    }

    #[test]
    fn simple_vocabulary_rejects_pipeline_states() {
        let v = StatusVocabulary::Simple;
        assert_eq!(v.terminal_success(), OrderStatus::Fulfilled);
        assert!(!v.contains(OrderStatus::Confirmed));
        assert!(!v.contains(OrderStatus::Delivered));
        assert!(v.contains(OrderStatus::Fulfilled));
        assert!(v.contains(OrderStatus::Cancelled));
    }

    #[test]
    fn prior_states_allow_forward_jumps_only() {
        let v = StatusVocabulary::Delivery;
        let prior = v.prior_states(OrderStatus::Delivered);
        assert_eq!(
            prior,
            vec![
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Delivering,
            ]
        );
        // terminal state never re-enters itself
        assert!(!prior.contains(&OrderStatus::Delivered));
        // backward move: preparing is not reachable from delivering
        assert!(!v.prior_states(OrderStatus::Preparing).contains(&OrderStatus::Delivering));
    }

    #[test]
    fn cancellation_is_open_to_non_terminal_states() {
        let v = StatusVocabulary::Delivery;
        let prior = v.prior_states(OrderStatus::Cancelled);
        assert!(prior.contains(&OrderStatus::Pending));
        assert!(prior.contains(&OrderStatus::Delivering));
        assert!(!prior.contains(&OrderStatus::Delivered));
        assert!(!prior.contains(&OrderStatus::Cancelled));
    }

    #[test]
    fn vocabulary_parses_from_config_strings() {
        assert_eq!(
            "delivery".parse::<StatusVocabulary>().unwrap(),
            StatusVocabulary::Delivery
        );
        assert_eq!(
            "simple".parse::<StatusVocabulary>().unwrap(),
            StatusVocabulary::Simple
        );
        assert!("grand".parse::<StatusVocabulary>().is_err());
    }
}
