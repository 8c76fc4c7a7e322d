//! Catalog and registry integration tests

mod common;

use axum::Json;
use axum::extract::{Path, Query, State};

use common::{id_of, seed_hotel, seed_product, test_state};
use tajbyhand_server::AppError;
use tajbyhand_server::api::products::handler::{self as products, ProductListQuery};
use tajbyhand_server::db::models::{
    Artisan, Category, ContactPerson, HotelCreate, HotelUpdate, ProductCreate,
};
use tajbyhand_server::db::repository::{HotelRepository, ProductFilter, ProductRepository, RepoError};

#[tokio::test]
async fn deactivated_products_disappear_from_the_storefront() {
    let state = test_state().await;
    let product = seed_product(&state, "Marble Plate", 700.0, 3).await;
    let id = id_of(&product.id);

    let Json(listed) = products::list(
        State(state.clone()),
        Query(ProductListQuery {
            category: None,
            featured: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);

    let Json(deactivated) = products::delete(State(state.clone()), Path(id.clone()))
        .await
        .unwrap();
    assert!(!deactivated.is_active);

    // gone from the public list, still addressable by id
    let Json(listed) = products::list(
        State(state.clone()),
        Query(ProductListQuery {
            category: None,
            featured: None,
        }),
    )
    .await
    .unwrap();
    assert!(listed.is_empty());

    let Json(fetched) = products::get_by_id(State(state.clone()), Path(id)).await.unwrap();
    assert!(!fetched.is_active);
}

#[tokio::test]
async fn category_filter_narrows_the_list() {
    let state = test_state().await;
    seed_product(&state, "Marble Plate", 700.0, 3).await;

    let repo = ProductRepository::new(state.get_db());
    repo.create(ProductCreate {
        name: "Sandalwood Elephant".to_string(),
        description: "Carved elephant figure".to_string(),
        category: Category::Wood,
        price: 450.0,
        tourist_price: 900.0,
        images: None,
        stock: Some(4),
        artisan: Artisan {
            name: "Mohan Lal".to_string(),
            experience: String::new(),
            location: "Agra".to_string(),
        },
        tags: None,
        crafting_time: None,
        is_featured: None,
    })
    .await
    .unwrap();

    let marble = repo
        .find_all(ProductFilter {
            category: Some(Category::Marble),
            featured: None,
        })
        .await
        .unwrap();
    assert_eq!(marble.len(), 1);
    assert_eq!(marble[0].category, Category::Marble);
}

#[tokio::test]
async fn product_validation_rejects_bad_payloads() {
    let state = test_state().await;

    let err = products::create(
        State(state.clone()),
        Json(ProductCreate {
            name: String::new(),
            description: "x".to_string(),
            category: Category::Other,
            price: -5.0,
            tourist_price: 100.0,
            images: None,
            stock: None,
            artisan: Artisan {
                name: "A".to_string(),
                experience: String::new(),
                location: "Agra".to_string(),
            },
            tags: None,
            crafting_time: None,
            is_featured: None,
        }),
    )
    .await
    .expect_err("empty name and negative price must fail validation");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn hotel_slugs_are_unique_and_immutable() {
    let state = test_state().await;
    let hotel = seed_hotel(&state, "pearl-hotel", 10.0).await;
    assert_eq!(
        hotel.tracking_url,
        format!("{}/?hotel=pearl-hotel", state.config.base_url)
    );

    let repo = HotelRepository::new(state.get_db());

    // duplicate slug conflicts, case-insensitively
    let err = repo
        .create(
            HotelCreate {
                name: "Pearl Again".to_string(),
                slug: "PEARL-HOTEL".to_string(),
                location: "Agra".to_string(),
                contact_person: ContactPerson {
                    name: "Desk".to_string(),
                    phone: "1".to_string(),
                    email: "desk@pearl.example".to_string(),
                },
                commission_rate: None,
            },
            &state.config.base_url,
        )
        .await
        .expect_err("duplicate slug must conflict");
    assert!(matches!(err, RepoError::Duplicate(_)));

    // updates touch the name but the update payload has no slug field;
    // the record keeps its original referral tag
    let updated = repo
        .update(
            "pearl-hotel",
            HotelUpdate {
                name: Some("Pearl Palace".to_string()),
                location: None,
                contact_person: None,
                commission_rate: Some(15.0),
                is_active: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.slug, "pearl-hotel");
    assert_eq!(updated.name, "Pearl Palace");
    assert_eq!(updated.commission_rate, 15.0);
}

#[tokio::test]
async fn invalid_slugs_are_rejected() {
    let state = test_state().await;
    let repo = HotelRepository::new(state.get_db());

    for bad in ["pearl hotel", "pearl_hotel", "-pearl", ""] {
        let err = repo
            .create(
                HotelCreate {
                    name: "Bad Slug Inn".to_string(),
                    slug: bad.to_string(),
                    location: "Agra".to_string(),
                    contact_person: ContactPerson {
                        name: "Desk".to_string(),
                        phone: "1".to_string(),
                        email: "desk@inn.example".to_string(),
                    },
                    commission_rate: None,
                },
                &state.config.base_url,
            )
            .await
            .expect_err("invalid slug must be rejected");
        assert!(matches!(err, RepoError::Validation(_)));
    }
}

#[tokio::test]
async fn deactivated_hotels_vanish_from_the_storefront_lookup() {
    let state = test_state().await;
    seed_hotel(&state, "pearl-hotel", 10.0).await;

    let repo = HotelRepository::new(state.get_db());
    assert!(repo.find_active_by_slug("pearl-hotel").await.unwrap().is_some());

    repo.deactivate("pearl-hotel").await.unwrap();

    assert!(repo.find_active_by_slug("pearl-hotel").await.unwrap().is_none());
    // but the registry still has the row
    assert!(repo.find_by_slug("pearl-hotel").await.unwrap().is_some());
}
