//! Basket entity - One per-user basket row, read and written as a whole.
//!
//! Each user owns exactly one basket (the `user_id` unique index enforces
//! this); it is created lazily on first access. The line items and the
//! per-store alternative totals live in JSON columns, so every mutation
//! persists the full recomputed snapshot atomically - the row is never
//! partially updated.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One line item: a product at a chosen store in a chosen quantity.
///
/// Display fields (`product_name`, `store_name`, `unit_price`, `unit`) are
/// captured at add-time and not re-resolved on later mutations. The
/// `line_total` is always recomputed from `unit_price * quantity`, never
/// stored independently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct BasketLine {
    /// Generated line identifier
    pub id: String,
    /// Product this line refers to
    pub product_id: String,
    /// Denormalized product display name
    pub product_name: String,
    /// Store the line was priced at
    pub store_id: String,
    /// Denormalized store display name
    pub store_name: String,
    /// Unit price captured when the line was added
    pub unit_price: f64,
    /// Quantity (positive; fractional for weight-based units)
    pub quantity: f64,
    /// Unit of measure captured when the line was added
    pub unit: String,
    /// `unit_price * quantity`, rounded to 2 decimal places
    pub line_total: f64,
    /// When the line was first added
    pub added_at: chrono::NaiveDateTime,
}

/// JSON-column wrapper for the basket's lines (insertion order).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Lines(pub Vec<BasketLine>);

/// JSON-column wrapper mapping store id to the cost of sourcing the whole
/// basket there instead. A `BTreeMap` keeps iteration order stable so the
/// summary's cheapest-store tie-break is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StoreTotals(pub BTreeMap<String, f64>);

/// Basket database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "baskets")]
pub struct Model {
    /// Unique identifier for the basket
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user - one basket per user
    #[sea_orm(unique)]
    pub user_id: String,
    /// Line items in insertion order
    #[sea_orm(column_type = "Json")]
    pub items: Lines,
    /// Sum of line totals, rounded to 2 decimal places
    pub total_cost: f64,
    /// Sum of quantities, floored to a whole display count
    pub total_items: i64,
    /// Savings against the cheapest alternative store; absent when no
    /// alternative store could be priced
    pub estimated_savings: Option<f64>,
    /// Per-store cost of the same basket bought elsewhere
    #[sea_orm(column_type = "Json")]
    pub alternative_store_totals: StoreTotals,
    /// When the basket was created
    pub created_at: DateTime,
    /// When the basket was last recomputed and persisted
    pub updated_at: DateTime,
}

/// Baskets have no relational links; lines reference products and stores by id.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
