//! Store entity - One entry in the store directory.
//!
//! Stores are read-only reference data from the basket engine's point of
//! view; products reference them by id from their price lists.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A physical or online location of a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StoreLocation {
    /// Street address
    pub address: String,
    /// City name, matched by the location filter
    pub city: String,
    /// Postcode, matched by the location filter
    pub postcode: String,
    /// Optional latitude
    pub latitude: Option<f64>,
    /// Optional longitude
    pub longitude: Option<f64>,
}

/// JSON-column wrapper for a store's locations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct LocationList(pub Vec<StoreLocation>);

/// Store database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    /// Unique identifier for the store
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name (e.g., "Tesco Extra Shoreditch")
    pub name: String,
    /// Chain brand (e.g., "Tesco")
    pub brand: String,
    /// Store type: "supermarket", "convenience", or "online"
    pub store_type: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether the store delivers
    pub delivery_available: bool,
    /// Whether click & collect is offered
    pub click_collect_available: bool,
    /// Rough price positioning: "budget", "medium", or "premium"
    pub price_tier: String,
    /// Physical/online locations
    #[sea_orm(column_type = "Json")]
    pub locations: LocationList,
    /// When the store was created
    pub created_at: DateTime,
}

/// Stores have no relational links.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
