//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`'s
//! `Schema::create_table_from_entity`, which generates the SQL from the
//! entity definitions so the schema always matches the Rust structs. The
//! connection is created once at startup and passed by reference into core
//! functions; no module-level handle exists.

use crate::entities::{Basket, Product, Session, ShoppingList, Store, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or a default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/trolley.sqlite".to_string())
}

/// Establishes the database connection.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema.create_table_from_entity(User);
    let session_table = schema.create_table_from_entity(Session);
    let store_table = schema.create_table_from_entity(Store);
    let product_table = schema.create_table_from_entity(Product);
    let list_table = schema.create_table_from_entity(ShoppingList);
    let basket_table = schema.create_table_from_entity(Basket);

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&session_table)).await?;
    db.execute(builder.build(&store_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&list_table)).await?;
    db.execute(builder.build(&basket_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        BasketModel, ProductModel, SessionModel, ShoppingListModel, StoreModel, UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = crate::entities::User::find().limit(1).all(&db).await?;
        let _: Vec<SessionModel> = crate::entities::Session::find().limit(1).all(&db).await?;
        let _: Vec<StoreModel> = crate::entities::Store::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = crate::entities::Product::find().limit(1).all(&db).await?;
        let _: Vec<ShoppingListModel> = crate::entities::ShoppingList::find()
            .limit(1)
            .all(&db)
            .await?;
        let _: Vec<BasketModel> = crate::entities::Basket::find().limit(1).all(&db).await?;

        Ok(())
    }
}
