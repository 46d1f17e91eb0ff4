//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Aggregates keep their nested collections (price lists, basket lines,
//! list items, store locations) in JSON columns so each row reads and
//! writes as a whole document.

pub mod basket;
pub mod product;
pub mod session;
pub mod shopping_list;
pub mod store;
pub mod user;

// Re-export specific types to avoid conflicts
pub use basket::{Column as BasketColumn, Entity as Basket, Model as BasketModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use shopping_list::{
    Column as ShoppingListColumn, Entity as ShoppingList, Model as ShoppingListModel,
};
pub use store::{Column as StoreColumn, Entity as Store, Model as StoreModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
