//! Persistent-engine tests
//!
//! The same repositories run over the RocksDB engine; data survives a
//! reopen, and a randomized ledger produces the same report numbers as
//! an independent in-process fold.

mod common;

use rand::Rng;
use tempfile::TempDir;

use tajbyhand_server::core::{Config, DatabaseConfig, ServerState};
use tajbyhand_server::db::models::{OrderStatus, StatusVocabulary};
use tajbyhand_server::db::repository::{
    HotelRepository, OrderRepository, ProductRepository, report,
};

async fn rocksdb_state(dir: &TempDir) -> ServerState {
    let mut config = Config::for_tests(dir.path().to_string_lossy().to_string());
    config.database = DatabaseConfig::RocksDb(dir.path().join("database"));
    ServerState::initialize(&config)
        .await
        .expect("state initialization failed")
}

#[tokio::test]
async fn catalog_survives_a_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let state = rocksdb_state(&dir).await;
        common::seed_hotel(&state, "pearl-hotel", 10.0).await;
        common::seed_product(&state, "Marble Plate", 700.0, 3).await;
        // handle dropped here, database closed
    }

    let state = rocksdb_state(&dir).await;
    let hotel = HotelRepository::new(state.get_db())
        .find_by_slug("pearl-hotel")
        .await
        .unwrap();
    assert!(hotel.is_some());

    let products = ProductRepository::new(state.get_db())
        .find_all(Default::default())
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Marble Plate");
}

#[tokio::test]
async fn randomized_ledger_agrees_with_an_independent_fold() {
    let dir = TempDir::new().unwrap();
    let state = rocksdb_state(&dir).await;

    let hotel = common::seed_hotel(&state, "pearl-hotel", 10.0).await;
    let product = common::seed_product(&state, "Inlay Plate", 100.0, 1000).await;

    let repo = OrderRepository::new(state.get_db());
    let mut rng = rand::thread_rng();

    let mut expected_delivered = 0usize;
    let mut expected_revenue = 0.0f64;
    let total = 40usize;

    for _ in 0..total {
        let order = tajbyhand_server::db::models::Order::place(
            product.id.clone().unwrap(),
            hotel.id.clone().unwrap(),
            &product,
            &hotel,
            Default::default(),
            None,
            Default::default(),
            tajbyhand_server::utils::DeviceInfo::collect(
                "203.0.113.7",
                &axum::http::HeaderMap::new(),
            ),
            "order".to_string(),
            chrono::Utc::now(),
        );
        let created = repo.create(order).await.unwrap();
        let id = created.id.unwrap().to_string();

        if rng.gen_bool(0.5) {
            repo.transition(&id, OrderStatus::Delivered, StatusVocabulary::Delivery)
                .await
                .unwrap();
            expected_delivered += 1;
            expected_revenue += created.order_value;
        }
    }

    let orders = repo.find_for_report(None, None, None).await.unwrap();
    let rows = report::per_hotel(&orders, StatusVocabulary::Delivery, &[]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_orders, total);
    assert_eq!(rows[0].delivered_orders, expected_delivered);
    assert_eq!(rows[0].total_revenue, expected_revenue);

    // the hotel counters accrued the same totals, one order at a time
    let hotel = HotelRepository::new(state.get_db())
        .find_by_slug("pearl-hotel")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hotel.total_orders as usize, expected_delivered);
    assert_eq!(hotel.total_revenue, expected_revenue);
}
