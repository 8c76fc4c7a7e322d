//! Product Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

pub type ProductId = RecordId;

/// Handicraft category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Marble,
    Wood,
    Textiles,
    Leather,
    Brass,
    Jewelry,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Marble => "marble",
            Category::Wood => "wood",
            Category::Textiles => "textiles",
            Category::Leather => "leather",
            Category::Brass => "brass",
            Category::Jewelry => "jewelry",
            Category::Other => "other",
        }
    }
}

/// Product image reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// Artisan attribution shown on the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artisan {
    pub name: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default = "default_artisan_location")]
    pub location: String,
}

fn default_artisan_location() -> String {
    "Agra".to_string()
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Direct-from-artisan price
    pub price: f64,
    /// Comparison price charged in tourist shops
    pub tourist_price: f64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub stock: u32,
    pub artisan: Artisan,
    #[serde(default)]
    pub tags: Vec<String>,
    /// e.g. "2-3 days"
    #[serde(default)]
    pub crafting_time: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Savings versus the tourist-shop price, as a whole percentage
    pub fn discount_percent(&self) -> u8 {
        discount_percent(self.tourist_price, self.price)
    }

    /// True when the product can currently be ordered
    pub fn is_orderable(&self) -> bool {
        self.is_active && self.stock > 0
    }
}

/// Percentage saved buying at `price` instead of `tourist_price`
///
/// 0 when there is no markup; always within [0, 100].
pub fn discount_percent(tourist_price: f64, price: f64) -> u8 {
    if tourist_price <= price || tourist_price <= 0.0 {
        return 0;
    }
    let pct = ((tourist_price - price) / tourist_price * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Create product payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub category: Category,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub tourist_price: f64,
    pub images: Option<Vec<ProductImage>>,
    pub stock: Option<u32>,
    pub artisan: Artisan,
    pub tags: Option<Vec<String>>,
    pub crafting_time: Option<String>,
    pub is_featured: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub tourist_price: Option<f64>,
    pub images: Option<Vec<ProductImage>>,
    pub stock: Option<u32>,
    pub artisan: Option<Artisan>,
    pub tags: Option<Vec<String>>,
    pub crafting_time: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_is_zero_without_markup() {
        assert_eq!(discount_percent(1000.0, 1000.0), 0);
        assert_eq!(discount_percent(800.0, 1000.0), 0);
        assert_eq!(discount_percent(0.0, 0.0), 0);
    }

    #[test]
    fn discount_rounds_to_whole_percent() {
        // 2500 -> 1500 is a 40% saving
        assert_eq!(discount_percent(2500.0, 1500.0), 40);
        // 2999 -> 1999 is 33.34%, rounds to 33
        assert_eq!(discount_percent(2999.0, 1999.0), 33);
    }

    #[test]
    fn discount_stays_within_bounds() {
        assert_eq!(discount_percent(1000.0, 0.0), 100);
        for (tourist, price) in [(1.0, 0.5), (5000.0, 4999.0), (100.0, 1.0)] {
            let pct = discount_percent(tourist, price);
            assert!(pct <= 100);
        }
    }
}
