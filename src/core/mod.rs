//! Core business logic - framework-agnostic operations over the database.
//!
//! Every function here takes the `SeaORM` connection by reference; nothing
//! in this layer knows about HTTP. The basket module is the pricing engine;
//! the rest are the CRUD collaborators it works alongside.

/// User accounts and bearer-token sessions
pub mod account;
/// The basket pricing engine: valuation, aggregation, alternative-store costing
pub mod basket;
/// Catalog lookups and product search
pub mod catalog;
/// Shopping list CRUD and item management
pub mod shopping_list;
/// Store directory lookups
pub mod store;

/// Rounds a monetary value to 2 decimal places (currency granularity).
#[must_use]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::round2;

    #[test]
    fn test_round2_currency_granularity() {
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(2.444_9), 2.44);
        // 1.4 * 2.0 accumulates binary noise; rounding restores 2.80
        assert_eq!(round2(1.4 * 2.0), 2.8);
    }
}
