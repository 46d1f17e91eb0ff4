//! Product entity - One catalog entry with its per-store price list.
//!
//! A product carries one `ProductPrice` per store that sells it; the price
//! list is stored as a JSON column so the catalog row is a self-contained
//! document. The catalog upholds "at most one price entry per store" - the
//! pricing engine relies on that and does not deduplicate.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One store's offer for a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ProductPrice {
    /// Store selling the product at this price
    pub store_id: String,
    /// Denormalized store display name
    pub store_name: String,
    /// Unit price in pounds (non-negative)
    pub price: f64,
    /// Unit of measure (e.g., "each", "kg", "2L")
    pub unit: String,
    /// Whether the product can currently be purchased at this store.
    /// Unavailable offers are excluded from alternative-store costing.
    pub availability: bool,
    /// Optional promotion label (display only, not applied to pricing)
    pub promotion: Option<String>,
}

/// JSON-column wrapper for a product's price list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PriceList(pub Vec<ProductPrice>);

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name of the product (e.g., "Semi-Skimmed Milk")
    pub name: String,
    /// Category for search filtering (e.g., "Dairy & Eggs")
    pub category: String,
    /// Optional brand name
    pub brand: Option<String>,
    /// Optional longer description, included in text search
    pub description: Option<String>,
    /// Per-store offers, at most one per store
    #[sea_orm(column_type = "Json")]
    pub prices: PriceList,
    /// Mean of the listed prices, used for price-range filters and sorting
    pub average_price: Option<f64>,
    /// When the product was created
    pub created_at: DateTime,
}

/// Products have no relational links; price entries reference stores by id.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Finds this product's offer at the given store, if any.
    #[must_use]
    pub fn price_at(&self, store_id: &str) -> Option<&ProductPrice> {
        self.prices.0.iter().find(|p| p.store_id == store_id)
    }
}
