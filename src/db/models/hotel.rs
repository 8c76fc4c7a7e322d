//! Hotel Model
//!
//! Partner hotels refer guests to the storefront via a tracking link and
//! earn a commission on delivered orders. The slug doubles as the referral
//! tag and the storefront personalization key, and is immutable once
//! orders reference it.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

pub type HotelId = RecordId;

/// Default commission rate in percent
pub const DEFAULT_COMMISSION_RATE: f64 = 10.0;

/// Hotel-side contact for order coordination
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactPerson {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
}

/// Hotel model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<HotelId>,
    /// Unique, lowercase, URL-safe referral tag
    pub slug: String,
    pub name: String,
    pub location: String,
    pub contact_person: ContactPerson,
    /// Percentage of order value owed to the hotel (0-100)
    pub commission_rate: f64,
    /// Storefront link encoded into the hotel's QR poster
    pub tracking_url: String,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_commission: f64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

/// Slug charset: lowercase alphanumerics separated by single hyphens
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Storefront URL carrying the hotel referral tag
pub fn tracking_url(base_url: &str, slug: &str) -> String {
    format!("{}/?hotel={}", base_url.trim_end_matches('/'), slug)
}

/// Create hotel payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HotelCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub slug: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(nested)]
    pub contact_person: ContactPerson,
    #[validate(range(min = 0.0, max = 100.0))]
    pub commission_rate: Option<f64>,
}

/// Update hotel payload; the slug is not updatable
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HotelUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub location: Option<String>,
    #[validate(nested)]
    pub contact_person: Option<ContactPerson>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub commission_rate: Option<f64>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_charset_is_enforced() {
        assert!(is_valid_slug("pearl-hotel"));
        assert!(is_valid_slug("taj21"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Pearl-Hotel"));
        assert!(!is_valid_slug("pearl hotel"));
        assert!(!is_valid_slug("pearl_hotel"));
        assert!(!is_valid_slug("-pearl"));
        assert!(!is_valid_slug("pearl-"));
        assert!(!is_valid_slug("pearl--hotel"));
    }

    #[test]
    fn tracking_url_embeds_slug() {
        assert_eq!(
            tracking_url("https://tajbyhand.example", "pearl-hotel"),
            "https://tajbyhand.example/?hotel=pearl-hotel"
        );
        // trailing slash on the base does not double up
        assert_eq!(
            tracking_url("https://tajbyhand.example/", "pearl-hotel"),
            "https://tajbyhand.example/?hotel=pearl-hotel"
        );
    }
}
