//! Shared test fixtures: in-memory server state and seeded records
#![allow(dead_code)]

use tajbyhand_server::core::{Config, ServerState};
use tajbyhand_server::db::models::{
    Artisan, Category, ContactPerson, Hotel, HotelCreate, Product, ProductCreate,
    StatusVocabulary,
};
use tajbyhand_server::db::repository::{HotelRepository, ProductRepository};

/// Fresh state over the in-memory engine
pub async fn test_state() -> ServerState {
    state_with_vocabulary(StatusVocabulary::Delivery).await
}

pub async fn state_with_vocabulary(vocabulary: StatusVocabulary) -> ServerState {
    let mut config = Config::for_tests("/tmp/tajbyhand-tests");
    config.status_vocabulary = vocabulary;
    ServerState::initialize(&config)
        .await
        .expect("state initialization failed")
}

pub async fn seed_hotel(state: &ServerState, slug: &str, commission_rate: f64) -> Hotel {
    HotelRepository::new(state.get_db())
        .create(
            HotelCreate {
                name: format!("{} (test)", slug),
                slug: slug.to_string(),
                location: "Fatehabad Road, Agra".to_string(),
                contact_person: ContactPerson {
                    name: "Front Desk".to_string(),
                    phone: "+91 99999 00000".to_string(),
                    email: format!("desk@{}.example", slug),
                },
                commission_rate: Some(commission_rate),
            },
            &state.config.base_url,
        )
        .await
        .expect("hotel seed failed")
}

pub async fn seed_product(state: &ServerState, name: &str, price: f64, stock: u32) -> Product {
    ProductRepository::new(state.get_db())
        .create(ProductCreate {
            name: name.to_string(),
            description: "Hand-carved marble inlay work".to_string(),
            category: Category::Marble,
            price,
            tourist_price: price * 1.8,
            images: None,
            stock: Some(stock),
            artisan: Artisan {
                name: "Rafiq Ahmed".to_string(),
                experience: "20 years".to_string(),
                location: "Agra".to_string(),
            },
            tags: None,
            crafting_time: None,
            is_featured: None,
        })
        .await
        .expect("product seed failed")
}

/// Record id as the "table:key" string handlers accept
pub fn id_of(opt: &Option<surrealdb::RecordId>) -> String {
    opt.as_ref().expect("record without id").to_string()
}
