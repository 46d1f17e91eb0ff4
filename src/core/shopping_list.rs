//! Shopping list business logic - list CRUD and item management.
//!
//! Every operation checks ownership: a list that exists but belongs to
//! another user is reported as not found, never as forbidden, so list ids
//! cannot be probed. Update payloads are explicit structs with named
//! optional fields; unknown fields fail deserialization.

use crate::{
    core::round2,
    entities::{
        ShoppingList,
        shopping_list::{self, ListItem, ListItems},
    },
    errors::{Error, Result},
};
use sea_orm::{IntoActiveModel, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category hint for quick item entry: which category a common grocery
/// keyword belongs to, plus a sensible default unit and quantity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CategorySuggestion {
    /// Category the keyword maps to
    pub category: &'static str,
    /// Default unit of measure for items of this kind
    pub suggested_unit: &'static str,
    /// Default quantity for items of this kind
    pub typical_quantity: f64,
}

/// Keyword-to-suggestion table for common grocery items.
const CATEGORY_SUGGESTIONS: &[(&str, CategorySuggestion)] = &[
    (
        "fruits",
        CategorySuggestion {
            category: "Fruits & Vegetables",
            suggested_unit: "kg",
            typical_quantity: 1.0,
        },
    ),
    (
        "vegetables",
        CategorySuggestion {
            category: "Fruits & Vegetables",
            suggested_unit: "kg",
            typical_quantity: 1.0,
        },
    ),
    (
        "meat",
        CategorySuggestion {
            category: "Meat & Fish",
            suggested_unit: "kg",
            typical_quantity: 0.5,
        },
    ),
    (
        "fish",
        CategorySuggestion {
            category: "Meat & Fish",
            suggested_unit: "kg",
            typical_quantity: 0.5,
        },
    ),
    (
        "milk",
        CategorySuggestion {
            category: "Dairy & Eggs",
            suggested_unit: "2L",
            typical_quantity: 1.0,
        },
    ),
    (
        "cheese",
        CategorySuggestion {
            category: "Dairy & Eggs",
            suggested_unit: "200g",
            typical_quantity: 1.0,
        },
    ),
    (
        "eggs",
        CategorySuggestion {
            category: "Dairy & Eggs",
            suggested_unit: "dozen",
            typical_quantity: 1.0,
        },
    ),
    (
        "bread",
        CategorySuggestion {
            category: "Bakery",
            suggested_unit: "loaf",
            typical_quantity: 1.0,
        },
    ),
    (
        "rice",
        CategorySuggestion {
            category: "Pantry",
            suggested_unit: "kg",
            typical_quantity: 1.0,
        },
    ),
    (
        "pasta",
        CategorySuggestion {
            category: "Pantry",
            suggested_unit: "500g",
            typical_quantity: 1.0,
        },
    ),
];

/// Returns category suggestions, optionally narrowed by a search text.
///
/// The text is matched case-insensitively as a substring of either the
/// keyword or the category name; with no text, the full table is returned.
#[must_use]
pub fn suggest_categories(q: Option<&str>) -> Vec<CategorySuggestion> {
    match q.map(str::to_lowercase) {
        Some(needle) if !needle.is_empty() => CATEGORY_SUGGESTIONS
            .iter()
            .filter(|(keyword, suggestion)| {
                keyword.contains(&needle) || suggestion.category.to_lowercase().contains(&needle)
            })
            .map(|(_, suggestion)| *suggestion)
            .collect(),
        _ => CATEGORY_SUGGESTIONS
            .iter()
            .map(|(_, suggestion)| *suggestion)
            .collect(),
    }
}

/// Payload for creating a list.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewList {
    /// List name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Fields a list update may change.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListUpdate {
    /// New list name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
}

/// Payload for adding an item to a list.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewListItem {
    /// Optional link to a catalog product
    pub product_id: Option<String>,
    /// Free-form item name
    pub product_name: String,
    /// Planned quantity (defaults to 1)
    pub quantity: Option<f64>,
    /// Unit of measure (defaults to "each")
    pub unit: Option<String>,
    /// Optional category label
    pub category: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
    /// Optional estimated unit price
    pub estimated_price: Option<f64>,
}

/// Fields an item update may change.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListItemUpdate {
    /// New item name
    pub product_name: Option<String>,
    /// New quantity
    pub quantity: Option<f64>,
    /// New unit
    pub unit: Option<String>,
    /// New category label
    pub category: Option<String>,
    /// New notes
    pub notes: Option<String>,
    /// Tick or untick the item
    pub completed: Option<bool>,
    /// New estimated unit price
    pub estimated_price: Option<f64>,
}

/// Lists the user's shopping lists, most recently updated first.
pub async fn lists_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<shopping_list::Model>> {
    ShoppingList::find()
        .filter(shopping_list::Column::UserId.eq(user_id))
        .order_by_desc(shopping_list::Column::UpdatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates an empty list for the user.
pub async fn create_list(
    db: &DatabaseConnection,
    user_id: &str,
    new: NewList,
) -> Result<shopping_list::Model> {
    if new.name.trim().is_empty() {
        return Err(Error::Config {
            message: "List name cannot be empty".to_string(),
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let list = shopping_list::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id.to_string()),
        name: Set(new.name.trim().to_string()),
        description: Set(new.description),
        items: Set(ListItems::default()),
        total_estimated_cost: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    list.insert(db).await.map_err(Into::into)
}

/// Fetches one of the user's lists by id.
pub async fn get_list(
    db: &DatabaseConnection,
    user_id: &str,
    list_id: &str,
) -> Result<shopping_list::Model> {
    ShoppingList::find_by_id(list_id)
        .filter(shopping_list::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::ShoppingListNotFound {
            id: list_id.to_string(),
        })
}

/// Updates a list's name and/or description.
pub async fn update_list(
    db: &DatabaseConnection,
    user_id: &str,
    list_id: &str,
    update: ListUpdate,
) -> Result<shopping_list::Model> {
    let mut list = get_list(db, user_id, list_id).await?.into_active_model();
    if let Some(name) = update.name {
        list.name = Set(name.trim().to_string());
    }
    if let Some(description) = update.description {
        list.description = Set(Some(description));
    }
    list.updated_at = Set(chrono::Utc::now().naive_utc());
    list.update(db).await.map_err(Into::into)
}

/// Deletes one of the user's lists.
pub async fn delete_list(db: &DatabaseConnection, user_id: &str, list_id: &str) -> Result<()> {
    let list = get_list(db, user_id, list_id).await?;
    ShoppingList::delete_by_id(list.id).exec(db).await?;
    Ok(())
}

/// Appends an item to a list.
pub async fn add_item(
    db: &DatabaseConnection,
    user_id: &str,
    list_id: &str,
    new: NewListItem,
) -> Result<shopping_list::Model> {
    let list = get_list(db, user_id, list_id).await?;
    let mut items = list.items.0.clone();
    items.push(ListItem {
        id: Uuid::new_v4().to_string(),
        product_id: new.product_id,
        product_name: new.product_name,
        quantity: new.quantity.unwrap_or(1.0),
        unit: new.unit.unwrap_or_else(|| "each".to_string()),
        category: new.category,
        notes: new.notes,
        completed: false,
        estimated_price: new.estimated_price,
    });
    save_items(db, list, items).await
}

/// Applies an item update inside a list.
pub async fn update_item(
    db: &DatabaseConnection,
    user_id: &str,
    list_id: &str,
    item_id: &str,
    update: ListItemUpdate,
) -> Result<shopping_list::Model> {
    let list = get_list(db, user_id, list_id).await?;
    let mut items = list.items.0.clone();
    let item = items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or_else(|| Error::ListItemNotFound {
            id: item_id.to_string(),
        })?;

    if let Some(product_name) = update.product_name {
        item.product_name = product_name;
    }
    if let Some(quantity) = update.quantity {
        item.quantity = quantity;
    }
    if let Some(unit) = update.unit {
        item.unit = unit;
    }
    if let Some(category) = update.category {
        item.category = Some(category);
    }
    if let Some(notes) = update.notes {
        item.notes = Some(notes);
    }
    if let Some(completed) = update.completed {
        item.completed = completed;
    }
    if let Some(estimated_price) = update.estimated_price {
        item.estimated_price = Some(estimated_price);
    }

    save_items(db, list, items).await
}

/// Removes an item from a list.
pub async fn remove_item(
    db: &DatabaseConnection,
    user_id: &str,
    list_id: &str,
    item_id: &str,
) -> Result<shopping_list::Model> {
    let list = get_list(db, user_id, list_id).await?;
    let mut items = list.items.0.clone();
    let before = items.len();
    items.retain(|i| i.id != item_id);
    if items.len() == before {
        return Err(Error::ListItemNotFound {
            id: item_id.to_string(),
        });
    }
    save_items(db, list, items).await
}

/// Persists new items along with the re-derived estimate total.
async fn save_items(
    db: &DatabaseConnection,
    list: shopping_list::Model,
    items: Vec<ListItem>,
) -> Result<shopping_list::Model> {
    let priced: Vec<f64> = items
        .iter()
        .filter_map(|i| i.estimated_price.map(|p| p * i.quantity))
        .collect();
    let total_estimated_cost = if priced.is_empty() {
        None
    } else {
        Some(round2(priced.iter().sum()))
    };

    let mut active = list.into_active_model();
    active.items = Set(ListItems(items));
    active.total_estimated_cost = Set(total_estimated_cost);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}
