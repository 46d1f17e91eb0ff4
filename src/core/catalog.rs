//! Catalog business logic - product lookups and search.
//!
//! The pricing engine consumes `get_product` and `get_products_by_ids`;
//! the search surface serves the browsing endpoints. Products are read-only
//! here - they enter the system through catalog ingestion
//! (`config::catalog`), not through these functions.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use serde::{Deserialize, Serialize};

/// How search results are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Best text match first (falls back to name order)
    #[default]
    Relevance,
    /// Cheapest average price first
    PriceLow,
    /// Most expensive average price first
    PriceHigh,
    /// Alphabetical by product name
    Name,
}

/// Search parameters for the catalog.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Text matched against product name and description
    pub query: String,
    /// Restrict to one category
    pub category: Option<String>,
    /// Lower bound on average price
    pub min_price: Option<f64>,
    /// Upper bound on average price
    pub max_price: Option<f64>,
    /// Restrict to products priced at any of these stores
    #[serde(default)]
    pub store_ids: Vec<String>,
    /// Result ordering
    #[serde(default)]
    pub sort: SortOrder,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size (clamped to 1..=50)
    pub per_page: Option<u64>,
}

/// One page of search results.
#[derive(Clone, Debug, Serialize)]
pub struct ProductPage {
    /// Matching products for this page
    pub products: Vec<product::Model>,
    /// Total matches across all pages
    pub total: u64,
    /// The page that was returned
    pub page: u64,
    /// The page size that was applied
    pub per_page: u64,
    /// Distinct categories present in the full match set, sorted
    pub categories: Vec<String>,
}

/// Retrieves a product by id, failing with [`Error::ProductNotFound`] if absent.
pub async fn get_product(db: &DatabaseConnection, product_id: &str) -> Result<product::Model> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            id: product_id.to_string(),
        })
}

/// Batch-fetches products by id in a single query.
///
/// Ids with no matching product are simply absent from the result - a
/// product deleted between basket-add and recompute is not an error here;
/// the pricing engine degrades gracefully instead.
pub async fn get_products_by_ids(
    db: &DatabaseConnection,
    ids: &[String],
) -> Result<Vec<product::Model>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Product::find()
        .filter(product::Column::Id.is_in(ids.iter().map(String::as_str)))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every distinct product category, sorted alphabetically.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<String>> {
    let categories: Vec<String> = Product::find()
        .select_only()
        .column(product::Column::Category)
        .distinct()
        .order_by_asc(product::Column::Category)
        .into_tuple()
        .all(db)
        .await?;
    Ok(categories)
}

/// Searches the catalog with text, category, price-range, and store filters.
///
/// Category and price-range filters are pushed down to SQL; the text and
/// store-id filters run over the fetched rows because price lists live in a
/// JSON column. Results are sorted, then paginated.
pub async fn search_products(
    db: &DatabaseConnection,
    query: &ProductQuery,
) -> Result<ProductPage> {
    let mut select = Product::find();
    if let Some(category) = &query.category {
        select = select.filter(product::Column::Category.eq(category));
    }
    if let Some(min) = query.min_price {
        select = select.filter(product::Column::AveragePrice.gte(min));
    }
    if let Some(max) = query.max_price {
        select = select.filter(product::Column::AveragePrice.lte(max));
    }

    let needle = query.query.trim().to_lowercase();
    let mut matches: Vec<product::Model> = select
        .all(db)
        .await?
        .into_iter()
        .filter(|p| needle.is_empty() || matches_text(p, &needle))
        .filter(|p| {
            query.store_ids.is_empty()
                || p.prices
                    .0
                    .iter()
                    .any(|offer| query.store_ids.contains(&offer.store_id))
        })
        .collect();

    match query.sort {
        SortOrder::PriceLow => matches.sort_by(|a, b| {
            a.average_price
                .unwrap_or(f64::MAX)
                .total_cmp(&b.average_price.unwrap_or(f64::MAX))
        }),
        SortOrder::PriceHigh => matches.sort_by(|a, b| {
            b.average_price
                .unwrap_or(f64::MIN)
                .total_cmp(&a.average_price.unwrap_or(f64::MIN))
        }),
        // Name-prefix matches lead under relevance, then alphabetical
        SortOrder::Relevance => matches.sort_by(|a, b| {
            let a_prefix = a.name.to_lowercase().starts_with(&needle);
            let b_prefix = b.name.to_lowercase().starts_with(&needle);
            b_prefix.cmp(&a_prefix).then_with(|| a.name.cmp(&b.name))
        }),
        SortOrder::Name => matches.sort_by(|a, b| a.name.cmp(&b.name)),
    }

    let mut categories: Vec<String> = matches.iter().map(|p| p.category.clone()).collect();
    categories.sort();
    categories.dedup();

    let total = u64::try_from(matches.len()).unwrap_or(u64::MAX);
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(12).clamp(1, 50);
    let start = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
    let products: Vec<product::Model> = matches
        .into_iter()
        .skip(start)
        .take(usize::try_from(per_page).unwrap_or(50))
        .collect();

    Ok(ProductPage {
        products,
        total,
        page,
        per_page,
        categories,
    })
}

/// Case-insensitive substring match over name, brand, and description.
fn matches_text(product: &product::Model, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product
            .brand
            .as_ref()
            .is_some_and(|b| b.to_lowercase().contains(needle))
        || product
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{create_test_product, offer, setup_test_db};

    #[tokio::test]
    async fn test_get_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_product(&db, "nope").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id } if id == "nope"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_batch_fetch_skips_missing_ids() -> Result<()> {
        let db = setup_test_db().await?;
        let milk = create_test_product(&db, "p-milk", "Milk", "Dairy & Eggs", vec![]).await?;

        let found =
            get_products_by_ids(&db, &["p-milk".to_string(), "p-ghost".to_string()]).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, milk.id);

        let none = get_products_by_ids(&db, &[]).await?;
        assert!(none.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_search_text_and_category_filters() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "p1", "Semi-Skimmed Milk", "Dairy & Eggs", vec![]).await?;
        create_test_product(&db, "p2", "Whole Milk", "Dairy & Eggs", vec![]).await?;
        create_test_product(&db, "p3", "Milk Chocolate", "Snacks", vec![]).await?;

        let all_milk = search_products(
            &db,
            &ProductQuery {
                query: "milk".to_string(),
                ..ProductQuery::default()
            },
        )
        .await?;
        assert_eq!(all_milk.total, 3);
        assert_eq!(
            all_milk.categories,
            vec!["Dairy & Eggs".to_string(), "Snacks".to_string()]
        );

        let dairy_only = search_products(
            &db,
            &ProductQuery {
                query: "milk".to_string(),
                category: Some("Dairy & Eggs".to_string()),
                ..ProductQuery::default()
            },
        )
        .await?;
        assert_eq!(dairy_only.total, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_search_store_filter_and_price_sort() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "p1", "Bread", "Bakery", vec![offer("s1", "Shop One", 1.10)])
            .await?;
        create_test_product(&db, "p2", "Bagels", "Bakery", vec![offer("s2", "Shop Two", 2.50)])
            .await?;

        let at_s1 = search_products(
            &db,
            &ProductQuery {
                query: String::new(),
                store_ids: vec!["s1".to_string()],
                ..ProductQuery::default()
            },
        )
        .await?;
        assert_eq!(at_s1.total, 1);
        assert_eq!(at_s1.products[0].id, "p1");

        let by_price = search_products(
            &db,
            &ProductQuery {
                query: String::new(),
                sort: SortOrder::PriceHigh,
                ..ProductQuery::default()
            },
        )
        .await?;
        assert_eq!(by_price.products[0].id, "p2");

        Ok(())
    }

    #[tokio::test]
    async fn test_search_pagination() -> Result<()> {
        let db = setup_test_db().await?;
        for i in 0..5 {
            create_test_product(&db, &format!("p{i}"), &format!("Item {i}"), "Pantry", vec![])
                .await?;
        }

        let page2 = search_products(
            &db,
            &ProductQuery {
                query: String::new(),
                sort: SortOrder::Name,
                page: Some(2),
                per_page: Some(2),
                ..ProductQuery::default()
            },
        )
        .await?;
        assert_eq!(page2.total, 5);
        assert_eq!(page2.products.len(), 2);
        assert_eq!(page2.products[0].name, "Item 2");

        Ok(())
    }

    #[tokio::test]
    async fn test_search_page_beyond_u64_range_is_empty() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "p1", "Milk", "Dairy & Eggs", vec![]).await?;

        // The start index must saturate rather than wrap back into range
        let far_out = search_products(
            &db,
            &ProductQuery {
                query: String::new(),
                page: Some(u64::MAX),
                per_page: Some(50),
                ..ProductQuery::default()
            },
        )
        .await?;
        assert_eq!(far_out.total, 1);
        assert!(far_out.products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_categories_distinct_sorted() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "p1", "Milk", "Dairy & Eggs", vec![]).await?;
        create_test_product(&db, "p2", "Cheese", "Dairy & Eggs", vec![]).await?;
        create_test_product(&db, "p3", "Bread", "Bakery", vec![]).await?;

        let categories = list_categories(&db).await?;
        assert_eq!(
            categories,
            vec!["Bakery".to_string(), "Dairy & Eggs".to_string()]
        );

        Ok(())
    }
}
