//! Catalog ingestion from a TOML seed file.
//!
//! Stores and products enter the system through a `catalog.toml` file
//! loaded at startup when the corresponding tables are empty. Price
//! entries reference stores by id; their display names are resolved from
//! the ingested stores, and each product's average price is derived from
//! its entries.

use crate::{
    entities::{
        Product, Store,
        product::{self, PriceList, ProductPrice},
        store::{self, LocationList, StoreLocation},
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// The entire catalog seed file.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Stores to ingest
    #[serde(default)]
    pub stores: Vec<StoreConfig>,
    /// Products to ingest
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// One `[[stores]]` table.
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Stable store id referenced by product price entries
    pub id: String,
    /// Display name
    pub name: String,
    /// Chain brand
    pub brand: String,
    /// "supermarket", "convenience", or "online"
    #[serde(default = "default_store_type")]
    pub store_type: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether the store delivers
    #[serde(default)]
    pub delivery_available: bool,
    /// Whether click & collect is offered
    #[serde(default)]
    pub click_collect_available: bool,
    /// "budget", "medium", or "premium"
    #[serde(default = "default_price_tier")]
    pub price_tier: String,
    /// Locations of this store
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

/// One location within a `[[stores]]` table.
#[derive(Debug, Deserialize)]
pub struct LocationConfig {
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Postcode
    pub postcode: String,
    /// Optional latitude
    pub latitude: Option<f64>,
    /// Optional longitude
    pub longitude: Option<f64>,
}

/// One `[[products]]` table.
#[derive(Debug, Deserialize)]
pub struct ProductConfig {
    /// Optional stable id; generated when absent
    pub id: Option<String>,
    /// Display name
    pub name: String,
    /// Category
    pub category: String,
    /// Optional brand
    pub brand: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Per-store prices
    #[serde(default)]
    pub prices: Vec<PriceConfig>,
}

/// One price entry within a `[[products]]` table.
#[derive(Debug, Deserialize)]
pub struct PriceConfig {
    /// Id of an ingested store
    pub store_id: String,
    /// Unit price
    pub price: f64,
    /// Unit of measure
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Purchasable right now
    #[serde(default = "default_true")]
    pub availability: bool,
    /// Optional promotion label
    pub promotion: Option<String>,
}

fn default_store_type() -> String {
    "supermarket".to_string()
}

fn default_price_tier() -> String {
    "medium".to_string()
}

fn default_unit() -> String {
    "each".to_string()
}

const fn default_true() -> bool {
    true
}

/// Loads a catalog seed file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog file: {e}"),
    })
}

/// Ingests the catalog into empty tables; existing data is left untouched.
///
/// # Errors
/// Returns [`Error::Config`] when a price entry references a store id the
/// file does not define.
pub async fn seed_catalog(
    db: &sea_orm::DatabaseConnection,
    catalog: &CatalogConfig,
) -> Result<()> {
    if Store::find().count(db).await? > 0 || Product::find().count(db).await? > 0 {
        info!("Catalog tables already populated, skipping ingestion");
        return Ok(());
    }

    let now = chrono::Utc::now().naive_utc();
    let mut store_names: HashMap<&str, &str> = HashMap::new();

    for entry in &catalog.stores {
        store_names.insert(entry.id.as_str(), entry.name.as_str());
        let model = store::ActiveModel {
            id: Set(entry.id.clone()),
            name: Set(entry.name.clone()),
            brand: Set(entry.brand.clone()),
            store_type: Set(entry.store_type.clone()),
            description: Set(entry.description.clone()),
            delivery_available: Set(entry.delivery_available),
            click_collect_available: Set(entry.click_collect_available),
            price_tier: Set(entry.price_tier.clone()),
            locations: Set(LocationList(
                entry
                    .locations
                    .iter()
                    .map(|loc| StoreLocation {
                        address: loc.address.clone(),
                        city: loc.city.clone(),
                        postcode: loc.postcode.clone(),
                        latitude: loc.latitude,
                        longitude: loc.longitude,
                    })
                    .collect(),
            )),
            created_at: Set(now),
        };
        model.insert(db).await?;
    }

    for entry in &catalog.products {
        let mut prices = Vec::with_capacity(entry.prices.len());
        for price in &entry.prices {
            let store_name =
                store_names
                    .get(price.store_id.as_str())
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Product '{}' prices unknown store '{}'",
                            entry.name, price.store_id
                        ),
                    })?;
            prices.push(ProductPrice {
                store_id: price.store_id.clone(),
                store_name: (*store_name).to_string(),
                price: price.price,
                unit: price.unit.clone(),
                availability: price.availability,
                promotion: price.promotion.clone(),
            });
        }

        let average_price = if prices.is_empty() {
            None
        } else {
            #[allow(clippy::cast_precision_loss)]
            Some(crate::core::round2(
                prices.iter().map(|p| p.price).sum::<f64>() / prices.len() as f64,
            ))
        };

        let model = product::ActiveModel {
            id: Set(entry
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string())),
            name: Set(entry.name.clone()),
            category: Set(entry.category.clone()),
            brand: Set(entry.brand.clone()),
            description: Set(entry.description.clone()),
            prices: Set(PriceList(prices)),
            average_price: Set(average_price),
            created_at: Set(now),
        };
        model.insert(db).await?;
    }

    info!(
        stores = catalog.stores.len(),
        products = catalog.products.len(),
        "Catalog ingested"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::setup_test_db;

    const SAMPLE: &str = r#"
        [[stores]]
        id = "s1"
        name = "Shop One"
        brand = "One"
        delivery_available = true

        [[stores.locations]]
        address = "1 High Street"
        city = "London"
        postcode = "E1 1AA"

        [[stores]]
        id = "s2"
        name = "Shop Two"
        brand = "Two"
        store_type = "convenience"

        [[products]]
        id = "p-milk"
        name = "Milk"
        category = "Dairy & Eggs"

        [[products.prices]]
        store_id = "s1"
        price = 1.40

        [[products.prices]]
        store_id = "s2"
        price = 1.20
        availability = false
        promotion = "2 for £2"
    "#;

    #[test]
    fn test_parse_catalog_config() {
        let catalog: CatalogConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(catalog.stores.len(), 2);
        assert_eq!(catalog.stores[0].store_type, "supermarket");
        assert_eq!(catalog.stores[1].store_type, "convenience");
        assert_eq!(catalog.products.len(), 1);

        let prices = &catalog.products[0].prices;
        assert!(prices[0].availability);
        assert_eq!(prices[0].unit, "each");
        assert!(!prices[1].availability);
        assert_eq!(prices[1].promotion.as_deref(), Some("2 for £2"));
    }

    #[tokio::test]
    async fn test_seed_resolves_store_names_and_averages() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let catalog: CatalogConfig = toml::from_str(SAMPLE).unwrap();
        seed_catalog(&db, &catalog).await?;

        let milk = crate::core::catalog::get_product(&db, "p-milk").await?;
        assert_eq!(milk.prices.0[0].store_name, "Shop One");
        assert_eq!(milk.prices.0[1].store_name, "Shop Two");
        assert_eq!(milk.average_price, Some(1.30));

        // Second ingestion is a no-op on populated tables
        seed_catalog(&db, &catalog).await?;
        let stores = crate::core::store::list_stores(
            &db,
            &crate::core::store::StoreFilter::default(),
        )
        .await?;
        assert_eq!(stores.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rejects_unknown_store_reference() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let broken = r#"
            [[products]]
            name = "Milk"
            category = "Dairy & Eggs"

            [[products.prices]]
            store_id = "s-ghost"
            price = 1.40
        "#;
        let catalog: CatalogConfig = toml::from_str(broken).unwrap();

        let result = seed_catalog(&db, &catalog).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        Ok(())
    }
}
