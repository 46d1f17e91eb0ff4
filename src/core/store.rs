//! Store directory business logic - listings and per-store product views.
//!
//! Location filtering is a plain substring match over a store's addresses;
//! there is no distance computation here.

use crate::{
    entities::{Product, Store, product, store},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, prelude::*};
use serde::{Deserialize, Serialize};

/// Filters for the store directory listing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StoreFilter {
    /// Substring matched against address, city, and postcode
    pub location: Option<String>,
    /// Only stores that deliver
    #[serde(default)]
    pub delivery_only: bool,
    /// Restrict to one store type
    pub store_type: Option<String>,
}

/// One page of a store's stocked products, price lists narrowed to that store.
#[derive(Clone, Debug, Serialize)]
pub struct StoreProductPage {
    /// The store the page belongs to
    pub store_id: String,
    /// Products with an available offer at this store
    pub products: Vec<product::Model>,
    /// Total stocked products across all pages
    pub total: u64,
    /// The page that was returned
    pub page: u64,
    /// The page size that was applied
    pub per_page: u64,
}

/// Lists stores matching the filter, sorted by name.
pub async fn list_stores(
    db: &DatabaseConnection,
    filter: &StoreFilter,
) -> Result<Vec<store::Model>> {
    let mut select = Store::find().order_by_asc(store::Column::Name);
    if filter.delivery_only {
        select = select.filter(store::Column::DeliveryAvailable.eq(true));
    }
    if let Some(store_type) = &filter.store_type {
        select = select.filter(store::Column::StoreType.eq(store_type));
    }

    let stores = select.all(db).await?;
    let Some(location) = &filter.location else {
        return Ok(stores);
    };

    let needle = location.trim().to_lowercase();
    Ok(stores
        .into_iter()
        .filter(|s| {
            s.locations.0.iter().any(|loc| {
                loc.city.to_lowercase().contains(&needle)
                    || loc.postcode.to_lowercase().contains(&needle)
                    || loc.address.to_lowercase().contains(&needle)
            })
        })
        .collect())
}

/// Retrieves a store by id, failing with [`Error::StoreNotFound`] if absent.
pub async fn get_store(db: &DatabaseConnection, store_id: &str) -> Result<store::Model> {
    Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::StoreNotFound {
            id: store_id.to_string(),
        })
}

/// Pages through the products purchasable at one store.
///
/// A product counts as stocked when it has an *available* offer at the
/// store; each returned product's price list is narrowed to that single
/// offer so callers see only the prices that apply.
pub async fn store_products(
    db: &DatabaseConnection,
    store_id: &str,
    category: Option<&str>,
    page: u64,
    per_page: u64,
) -> Result<StoreProductPage> {
    // 404 before an empty page for an unknown store
    let found = get_store(db, store_id).await?;

    let mut select = Product::find().order_by_asc(product::Column::Name);
    if let Some(category) = category {
        select = select.filter(product::Column::Category.eq(category));
    }

    let mut stocked: Vec<product::Model> = select
        .all(db)
        .await?
        .into_iter()
        .filter(|p| {
            p.price_at(&found.id)
                .is_some_and(|entry| entry.availability)
        })
        .collect();
    for item in &mut stocked {
        item.prices.0.retain(|entry| entry.store_id == found.id);
    }

    let total = u64::try_from(stocked.len()).unwrap_or(u64::MAX);
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let start = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
    let products: Vec<product::Model> = stocked
        .into_iter()
        .skip(start)
        .take(usize::try_from(per_page).unwrap_or(100))
        .collect();

    Ok(StoreProductPage {
        store_id: found.id,
        products,
        total,
        page,
        per_page,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        create_test_product, create_test_store, offer, setup_test_db, unavailable_offer,
    };

    #[tokio::test]
    async fn test_list_stores_filters() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_store(&db, "s1", "Shop One", "supermarket", true, "London").await?;
        create_test_store(&db, "s2", "Shop Two", "convenience", false, "Leeds").await?;

        let all = list_stores(&db, &StoreFilter::default()).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Shop One"); // name-sorted

        let delivery = list_stores(
            &db,
            &StoreFilter {
                delivery_only: true,
                ..StoreFilter::default()
            },
        )
        .await?;
        assert_eq!(delivery.len(), 1);
        assert_eq!(delivery[0].id, "s1");

        let in_leeds = list_stores(
            &db,
            &StoreFilter {
                location: Some("leeds".to_string()),
                ..StoreFilter::default()
            },
        )
        .await?;
        assert_eq!(in_leeds.len(), 1);
        assert_eq!(in_leeds[0].id, "s2");

        let convenience = list_stores(
            &db,
            &StoreFilter {
                store_type: Some("convenience".to_string()),
                ..StoreFilter::default()
            },
        )
        .await?;
        assert_eq!(convenience.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_store_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_store(&db, "nope").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::StoreNotFound { id } if id == "nope"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_store_products_narrows_prices_and_skips_unavailable() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_store(&db, "s1", "Shop One", "supermarket", true, "London").await?;
        create_test_product(
            &db,
            "p1",
            "Milk",
            "Dairy & Eggs",
            vec![offer("s1", "Shop One", 1.40), offer("s2", "Shop Two", 1.20)],
        )
        .await?;
        create_test_product(
            &db,
            "p2",
            "Bread",
            "Bakery",
            vec![unavailable_offer("s1", "Shop One", 1.00)],
        )
        .await?;
        create_test_product(&db, "p3", "Jam", "Pantry", vec![offer("s2", "Shop Two", 2.00)])
            .await?;

        let stocked = store_products(&db, "s1", None, 1, 20).await?;
        assert_eq!(stocked.total, 1);
        assert_eq!(stocked.products[0].id, "p1");
        // Only the s1 offer survives the narrowing
        assert_eq!(stocked.products[0].prices.0.len(), 1);
        assert_eq!(stocked.products[0].prices.0[0].store_id, "s1");

        Ok(())
    }

    #[tokio::test]
    async fn test_store_products_page_beyond_u64_range_is_empty() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_store(&db, "s1", "Shop One", "supermarket", true, "London").await?;
        create_test_product(&db, "p1", "Milk", "Dairy & Eggs", vec![offer("s1", "Shop One", 1.40)])
            .await?;

        let far_out = store_products(&db, "s1", None, u64::MAX, 20).await?;
        assert_eq!(far_out.total, 1);
        assert!(far_out.products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_store_products_unknown_store() -> Result<()> {
        let db = setup_test_db().await?;

        let result = store_products(&db, "nope", None, 1, 20).await;
        assert!(matches!(result.unwrap_err(), Error::StoreNotFound { .. }));

        Ok(())
    }
}
