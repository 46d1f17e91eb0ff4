//! Shopping list entity - A named, user-owned list of planned purchases.
//!
//! Unlike basket lines, list items are free-form: they may reference a
//! catalog product but usually just carry a name, quantity, and notes.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One entry in a shopping list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ListItem {
    /// Generated item identifier
    pub id: String,
    /// Optional link to a catalog product
    pub product_id: Option<String>,
    /// Free-form item name
    pub product_name: String,
    /// Planned quantity
    pub quantity: f64,
    /// Unit of measure
    pub unit: String,
    /// Optional category label
    pub category: Option<String>,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// Whether the item has been ticked off
    pub completed: bool,
    /// Optional estimated unit price
    pub estimated_price: Option<f64>,
}

/// JSON-column wrapper for a list's items.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ListItems(pub Vec<ListItem>);

/// Shopping list database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopping_lists")]
pub struct Model {
    /// Unique identifier for the list
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// List name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Items in insertion order
    #[sea_orm(column_type = "Json")]
    pub items: ListItems,
    /// Sum of `estimated_price * quantity` over priced items, 2 dp;
    /// absent when no item carries an estimate
    pub total_estimated_cost: Option<f64>,
    /// When the list was created
    pub created_at: DateTime,
    /// When the list was last modified
    pub updated_at: DateTime,
}

/// Lists have no relational links; ownership is checked in core functions.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
