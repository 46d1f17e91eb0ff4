//! Basket pricing engine - valuation, aggregation, and alternative-store costing.
//!
//! Every mutation follows the same shape: resolve the inputs, mutate the
//! line items in memory, recompute all derived fields, and persist the
//! whole basket row. A failed resolution returns before anything is
//! written, so the persisted basket is never partially updated. Concurrent
//! mutations of the same basket race last-write-wins at the database; there
//! is no revision token.

use crate::{
    core::{catalog, round2},
    entities::{
        Basket,
        basket::{self, BasketLine, Lines, StoreTotals},
    },
    errors::{Error, Result},
};
use sea_orm::{IntoActiveModel, Set, prelude::*};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;
use uuid::Uuid;

/// Read-only projection of a basket for the summary endpoint.
///
/// Derived on demand from the persisted basket; never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BasketSummary {
    /// Current basket total, 2 decimal places
    pub total_cost: f64,
    /// Whole-number item count (floored quantity sum)
    pub total_items: i64,
    /// Savings against the cheapest alternative, if one exists
    pub estimated_savings: Option<f64>,
    /// Store with the lowest alternative total; ties resolve to the
    /// lowest store id so responses are reproducible
    pub cheapest_alternative_store: Option<String>,
    /// What switching the whole basket to that store would save
    pub potential_savings: Option<f64>,
}

/// Derived fields recomputed after every mutation.
struct Derived {
    total_cost: f64,
    total_items: i64,
    estimated_savings: Option<f64>,
    alternative_store_totals: BTreeMap<String, f64>,
}

/// Fetches the user's basket, creating an empty one on first access.
pub async fn get_or_create_basket(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<basket::Model> {
    if let Some(existing) = Basket::find()
        .filter(basket::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let now = chrono::Utc::now().naive_utc();
    let empty = basket::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id.to_string()),
        items: Set(Lines::default()),
        total_cost: Set(0.0),
        total_items: Set(0),
        estimated_savings: Set(None),
        alternative_store_totals: Set(StoreTotals::default()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    empty.insert(db).await.map_err(Into::into)
}

/// Adds a product+store+quantity line to the basket, merging into an
/// existing line for the same (product, store) pair.
///
/// The unit price and display metadata are captured from the product's
/// offer at the chosen store. The offer's availability flag does not gate
/// this lookup - it only governs alternative-store costing.
///
/// # Errors
/// Returns an error if:
/// - The quantity is non-positive or non-finite
/// - The product id is unknown
/// - The product has no price entry for the store
pub async fn add_line(
    db: &DatabaseConnection,
    user_id: &str,
    product_id: &str,
    store_id: &str,
    quantity: f64,
) -> Result<basket::Model> {
    validate_quantity(quantity)?;

    let product = catalog::get_product(db, product_id).await?;
    let offer = product
        .price_at(store_id)
        .ok_or_else(|| Error::StoreOfferNotFound {
            product_id: product_id.to_string(),
            store_id: store_id.to_string(),
        })?
        .clone();

    let current = get_or_create_basket(db, user_id).await?;
    let mut lines = current.items.0.clone();

    // A basket never holds two lines for the same (product, store) pair
    if let Some(line) = lines
        .iter_mut()
        .find(|l| l.product_id == product_id && l.store_id == store_id)
    {
        line.quantity += quantity;
        line.line_total = round2(line.unit_price * line.quantity);
    } else {
        lines.push(BasketLine {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            store_id: offer.store_id.clone(),
            store_name: offer.store_name.clone(),
            unit_price: offer.price,
            quantity,
            unit: offer.unit.clone(),
            line_total: round2(offer.price * quantity),
            added_at: chrono::Utc::now().naive_utc(),
        });
    }

    recompute_and_save(db, current, lines).await
}

/// Replaces the quantity of an existing basket line.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for a non-positive quantity and
/// [`Error::BasketLineNotFound`] for an unknown line id; the persisted
/// basket is untouched in both cases.
pub async fn update_line_quantity(
    db: &DatabaseConnection,
    user_id: &str,
    line_id: &str,
    quantity: f64,
) -> Result<basket::Model> {
    validate_quantity(quantity)?;

    let current = get_or_create_basket(db, user_id).await?;
    let mut lines = current.items.0.clone();
    let line = lines
        .iter_mut()
        .find(|l| l.id == line_id)
        .ok_or_else(|| Error::BasketLineNotFound {
            id: line_id.to_string(),
        })?;

    line.quantity = quantity;
    line.line_total = round2(line.unit_price * quantity);

    recompute_and_save(db, current, lines).await
}

/// Removes a line from the basket.
///
/// # Errors
/// Returns [`Error::BasketLineNotFound`] if the line id is not present.
pub async fn remove_line(
    db: &DatabaseConnection,
    user_id: &str,
    line_id: &str,
) -> Result<basket::Model> {
    let current = get_or_create_basket(db, user_id).await?;
    let mut lines = current.items.0.clone();
    let before = lines.len();
    lines.retain(|l| l.id != line_id);
    if lines.len() == before {
        return Err(Error::BasketLineNotFound {
            id: line_id.to_string(),
        });
    }

    recompute_and_save(db, current, lines).await
}

/// Empties the basket and resets all derived fields.
pub async fn clear_basket(db: &DatabaseConnection, user_id: &str) -> Result<basket::Model> {
    let current = get_or_create_basket(db, user_id).await?;
    recompute_and_save(db, current, Vec::new()).await
}

/// Projects a [`BasketSummary`] from a persisted basket.
///
/// Both alternative-store fields are absent when no alternative store
/// could be priced.
#[must_use]
pub fn summarize(current: &basket::Model) -> BasketSummary {
    let best = cheapest(&current.alternative_store_totals.0);
    BasketSummary {
        total_cost: current.total_cost,
        total_items: current.total_items,
        estimated_savings: current.estimated_savings,
        cheapest_alternative_store: best.map(|(store_id, _)| store_id.to_string()),
        potential_savings: best.map(|(_, cost)| round2((current.total_cost - cost).max(0.0))),
    }
}

fn validate_quantity(quantity: f64) -> Result<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(())
}

/// Re-derives every computed field from the new lines and persists the
/// whole basket row.
async fn recompute_and_save(
    db: &DatabaseConnection,
    current: basket::Model,
    lines: Vec<BasketLine>,
) -> Result<basket::Model> {
    let derived = recompute(db, &lines).await?;
    debug!(
        basket_id = %current.id,
        lines = lines.len(),
        total_cost = derived.total_cost,
        alternatives = derived.alternative_store_totals.len(),
        "recomputed basket"
    );

    let mut active = current.into_active_model();
    active.items = Set(Lines(lines));
    active.total_cost = Set(derived.total_cost);
    active.total_items = Set(derived.total_items);
    active.estimated_savings = Set(derived.estimated_savings);
    active.alternative_store_totals = Set(StoreTotals(derived.alternative_store_totals));
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

/// Aggregates basket totals and runs alternative-store costing.
#[allow(clippy::cast_possible_truncation)]
async fn recompute(db: &DatabaseConnection, lines: &[BasketLine]) -> Result<Derived> {
    let total_cost = round2(lines.iter().map(|l| l.line_total).sum());
    let quantity_sum: f64 = lines.iter().map(|l| l.quantity).sum();
    // Fractional quantities (1.5 kg) count toward one whole display unit
    let total_items = quantity_sum.floor() as i64;

    let alternative_store_totals = alternative_totals(db, lines).await?;
    let estimated_savings = cheapest(&alternative_store_totals)
        .map(|(_, cost)| round2((total_cost - cost).max(0.0)));

    Ok(Derived {
        total_cost,
        total_items,
        estimated_savings,
        alternative_store_totals,
    })
}

/// Costs the same basket at every other store that sells any of its products.
///
/// One batch catalog fetch covers the basket's distinct product ids. For
/// each line, every available offer at a store other than the line's own
/// contributes `price * quantity` to that store's bucket. A store therefore
/// appears as soon as it covers a single line - partial coverage is
/// reported as-is, which can understate the true cost of switching.
/// Products missing from the catalog (deleted since the line was added)
/// are skipped rather than failing the recompute.
async fn alternative_totals(
    db: &DatabaseConnection,
    lines: &[BasketLine],
) -> Result<BTreeMap<String, f64>> {
    if lines.is_empty() {
        return Ok(BTreeMap::new());
    }

    let ids: Vec<String> = lines
        .iter()
        .map(|l| l.product_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let products = catalog::get_products_by_ids(db, &ids).await?;
    let by_id: HashMap<&str, &crate::entities::product::Model> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for line in lines {
        let Some(product) = by_id.get(line.product_id.as_str()) else {
            continue;
        };
        for entry in &product.prices.0 {
            if entry.store_id == line.store_id || !entry.availability {
                continue;
            }
            *totals.entry(entry.store_id.clone()).or_insert(0.0) += entry.price * line.quantity;
        }
    }

    for total in totals.values_mut() {
        *total = round2(*total);
    }
    Ok(totals)
}

/// Lowest-cost entry of the alternative map; ties resolve to the first
/// (lowest) store id thanks to `BTreeMap` ordering.
fn cheapest(totals: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (store_id, cost) in totals {
        if best.is_none_or(|(_, best_cost)| *cost < best_cost) {
            best = Some((store_id, *cost));
        }
    }
    best
}
