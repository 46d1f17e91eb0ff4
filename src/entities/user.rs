//! User entity - An account that owns a basket and shopping lists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Login email, unique across accounts
    #[sea_orm(unique)]
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Optional home location (city or postcode), used for store filtering
    pub location: Option<String>,
    /// Salted password digest, never serialized to API responses
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// Whether the account can log in
    pub is_active: bool,
    /// When the account was created
    pub created_at: DateTime,
}

/// Sessions reference users by id; no eager relation is needed.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
