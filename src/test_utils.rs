//! Shared test utilities for `trolley`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating catalog fixtures with sensible defaults.

use crate::{
    entities::{
        product::{self, PriceList, ProductPrice},
        store::{self, LocationList, StoreLocation},
    },
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds an available price entry for a store.
pub fn offer(store_id: &str, store_name: &str, price: f64) -> ProductPrice {
    ProductPrice {
        store_id: store_id.to_string(),
        store_name: store_name.to_string(),
        price,
        unit: "each".to_string(),
        availability: true,
        promotion: None,
    }
}

/// Builds a price entry flagged as unavailable.
pub fn unavailable_offer(store_id: &str, store_name: &str, price: f64) -> ProductPrice {
    ProductPrice {
        availability: false,
        ..offer(store_id, store_name, price)
    }
}

/// Inserts a catalog product with the given price list.
/// The average price is derived from the entries, as ingestion does.
pub async fn create_test_product(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
    category: &str,
    prices: Vec<ProductPrice>,
) -> Result<product::Model> {
    let average_price = if prices.is_empty() {
        None
    } else {
        #[allow(clippy::cast_precision_loss)]
        Some(crate::core::round2(
            prices.iter().map(|p| p.price).sum::<f64>() / prices.len() as f64,
        ))
    };

    let model = product::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        category: Set(category.to_string()),
        brand: Set(None),
        description: Set(None),
        prices: Set(PriceList(prices)),
        average_price: Set(average_price),
        created_at: Set(chrono::Utc::now().naive_utc()),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Inserts a store with a single location in the given city.
pub async fn create_test_store(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
    store_type: &str,
    delivery_available: bool,
    city: &str,
) -> Result<store::Model> {
    let model = store::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        brand: Set(name.to_string()),
        store_type: Set(store_type.to_string()),
        description: Set(None),
        delivery_available: Set(delivery_available),
        click_collect_available: Set(false),
        price_tier: Set("medium".to_string()),
        locations: Set(LocationList(vec![StoreLocation {
            address: format!("1 High Street, {city}"),
            city: city.to_string(),
            postcode: "AB1 2CD".to_string(),
            latitude: None,
            longitude: None,
        }])),
        created_at: Set(chrono::Utc::now().naive_utc()),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Sets up a database holding the standard two-store milk fixture:
/// "Milk" at £1.40 in store `s1` and £1.20 (available) in store `s2`.
/// Returns (db, milk) for basket engine tests.
pub async fn setup_two_store_milk() -> Result<(DatabaseConnection, product::Model)> {
    let db = setup_test_db().await?;
    let milk = create_test_product(
        &db,
        "p-milk",
        "Milk",
        "Dairy & Eggs",
        vec![offer("s1", "Shop One", 1.40), offer("s2", "Shop Two", 1.20)],
    )
    .await?;
    Ok((db, milk))
}
