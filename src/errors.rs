//! Unified error types for the whole backend.
//!
//! Core functions return these directly; the API layer maps each variant to
//! an HTTP status. All variants describe caller-input
//! failures except the infrastructure conversions at the bottom, which
//! propagate as fatal.

use thiserror::Error;

/// All errors the backend can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// Referenced product id does not exist in the catalog.
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The product id that was requested
        id: String,
    },

    /// Product exists but has no price entry for the requested store.
    #[error("Product {product_id} is not available at store {store_id}")]
    StoreOfferNotFound {
        /// Product the caller asked to price
        product_id: String,
        /// Store that has no offer for it
        store_id: String,
    },

    /// Referenced store id does not exist.
    #[error("Store not found: {id}")]
    StoreNotFound {
        /// The store id that was requested
        id: String,
    },

    /// Update/remove referenced an unknown basket line id.
    #[error("Item not found in basket: {id}")]
    BasketLineNotFound {
        /// The line id that was requested
        id: String,
    },

    /// Shopping list does not exist or is not owned by the caller.
    #[error("Shopping list not found: {id}")]
    ShoppingListNotFound {
        /// The list id that was requested
        id: String,
    },

    /// Item id not present in the shopping list.
    #[error("Item not found in shopping list: {id}")]
    ListItemNotFound {
        /// The item id that was requested
        id: String,
    },

    /// Non-positive or non-finite quantity supplied.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: f64,
    },

    /// Registration attempted with an email that already has an account.
    #[error("Email already registered: {email}")]
    EmailTaken {
        /// The conflicting email address
        email: String,
    },

    /// Login with a wrong email/password combination.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Missing, unknown, or expired session token.
    #[error("Not authenticated")]
    Unauthorized,

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
