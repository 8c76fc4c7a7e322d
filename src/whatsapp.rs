//! WhatsApp deep-link generation
//!
//! Pure string assembly: a prefilled chat message, URL-encoded into a
//! `https://wa.me/<number>?text=...` link. The business number comes from
//! configuration; nothing here talks to WhatsApp.
//!
//! Two template families exist. The storefront buttons use the short
//! one-line messages; order placement sends the full order-intent message
//! with price, hotel and delivery expectations.

use crate::db::models::{Customer, Hotel, Product};

/// Sentinel subject for the generic help message
pub const GENERAL_INQUIRY: &str = "general inquiry";

/// Build a `wa.me` link for a prefilled message
pub fn link(number: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", number, urlencoding::encode(message))
}

/// Short storefront message: help request or one-line order intent
pub fn storefront_message(subject: &str, hotel_name: &str) -> String {
    if subject == GENERAL_INQUIRY {
        format!(
            "Hi, I need help with ordering handicrafts. I'm staying at {}.",
            hotel_name
        )
    } else {
        format!("Hi, I'd like to order the {}. I'm staying at {}.", subject, hotel_name)
    }
}

/// Short storefront link
pub fn storefront_link(number: &str, subject: &str, hotel_name: &str) -> String {
    link(number, &storefront_message(subject, hotel_name))
}

/// Full order-intent message sent when an order is placed
pub fn order_message(product: &Product, hotel: &Hotel, customer: &Customer) -> String {
    let mut message = String::from("Hello! I would like to order:\n\n");
    message.push_str(&format!("📦 *{}*\n", product.name));
    message.push_str(&format!("💰 Price: ₹{}\n", format_inr(product.price)));
    message.push_str(&format!("🎨 Category: {}\n", product.category.as_str()));
    message.push_str(&format!("🏨 Hotel: {}\n", hotel.name));
    message.push_str(&format!("📍 Location: {}\n", hotel.location));

    if let Some(room) = customer.room_number.as_deref().filter(|r| !r.is_empty()) {
        message.push_str(&format!("🚪 Room: {}\n", room));
    }

    message.push_str("\n⏰ Please deliver within 30-60 minutes.\n");
    message.push_str("✅ I confirm this order and will pay cash on delivery.\n\n");
    message.push_str("Thank you! 🙏");
    message
}

/// Full order-intent link
pub fn order_link(number: &str, product: &Product, hotel: &Hotel, customer: &Customer) -> String {
    link(number, &order_message(product, hotel, customer))
}

/// Whole-rupee amount with thousands separators
fn format_inr(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Artisan, Category, ContactPerson};

    const NUMBER: &str = "919876543210";

    fn product() -> Product {
        Product {
            id: None,
            name: "Marble Taj Mahal Replica".into(),
            description: "Hand-carved marble inlay".into(),
            category: Category::Marble,
            price: 2499.0,
            tourist_price: 4500.0,
            images: vec![],
            stock: 5,
            artisan: Artisan {
                name: "Rafiq".into(),
                experience: "20 years".into(),
                location: "Agra".into(),
            },
            tags: vec![],
            crafting_time: String::new(),
            is_featured: true,
            is_active: true,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    fn hotel() -> Hotel {
        Hotel {
            id: None,
            slug: "pearl-hotel".into(),
            name: "Pearl Hotel".into(),
            location: "Fatehabad Road, Agra".into(),
            contact_person: ContactPerson {
                name: "Manager".into(),
                phone: "+91 11111".into(),
                email: "desk@pearl.example".into(),
            },
            commission_rate: 10.0,
            tracking_url: "https://tajbyhand.example/?hotel=pearl-hotel".into(),
            total_orders: 0,
            total_revenue: 0.0,
            total_commission: 0.0,
            is_active: true,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn inquiry_link_mentions_help_and_hotel() {
        let url = storefront_link(NUMBER, GENERAL_INQUIRY, "Pearl Hotel");
        assert!(url.starts_with(&format!("https://wa.me/{}?text=", NUMBER)));
        assert!(url.contains("need%20help"));
        assert!(url.contains("Pearl%20Hotel"));
    }

    #[test]
    fn product_subject_switches_to_order_intent() {
        let url = storefront_link(NUMBER, "Marble Taj Mahal Replica", "Pearl Hotel");
        let decoded = urlencoding::decode(url.split("text=").nth(1).unwrap()).unwrap();
        assert!(decoded.contains("Marble Taj Mahal Replica"));
        assert!(decoded.contains("Pearl Hotel"));
        assert!(!decoded.contains("need help"));
    }

    #[test]
    fn order_message_carries_price_hotel_and_room() {
        let mut customer = Customer::default();
        customer.room_number = Some("204".into());

        let message = order_message(&product(), &hotel(), &customer);
        assert!(message.contains("Marble Taj Mahal Replica"));
        assert!(message.contains("₹2,499"));
        assert!(message.contains("Category: marble"));
        assert!(message.contains("Hotel: Pearl Hotel"));
        assert!(message.contains("Room: 204"));
        assert!(message.contains("deliver within 30-60 minutes"));
    }

    #[test]
    fn order_message_omits_missing_room() {
        let message = order_message(&product(), &hotel(), &Customer::default());
        assert!(!message.contains("Room:"));
    }

    #[test]
    fn order_link_is_fully_encoded() {
        let url = order_link(NUMBER, &product(), &hotel(), &Customer::default());
        // the raw message contains newlines and spaces, none may survive
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));
        let decoded = urlencoding::decode(url.split("text=").nth(1).unwrap()).unwrap();
        assert!(decoded.contains("Pearl Hotel"));
        assert!(decoded.contains("Marble Taj Mahal Replica"));
    }

    #[test]
    fn inr_grouping() {
        assert_eq!(format_inr(999.0), "999");
        assert_eq!(format_inr(2499.0), "2,499");
        assert_eq!(format_inr(1234567.0), "1,234,567");
    }
}
