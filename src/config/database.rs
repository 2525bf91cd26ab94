//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`; the composite `(user_id, ring_number)`
//! uniqueness of birds is added as an explicit index.

use crate::entities::{
    Bird, BirdColorProperty, BirdSplitProperty, Breeder, BreedingCouple, BreedingSeason,
    ColorProperty, Egg, ImportFile, Location, User, bird,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/budgie_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(parent) = sqlite_file_dir(&database_url) {
        std::fs::create_dir_all(parent)?;
    }
    info!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory of the file behind a `sqlite://` URL, if it has one.
fn sqlite_file_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Creates all tables and indexes if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut tables = vec![
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Breeder),
        schema.create_table_from_entity(ColorProperty),
        schema.create_table_from_entity(Bird),
        schema.create_table_from_entity(BirdColorProperty),
        schema.create_table_from_entity(BirdSplitProperty),
        schema.create_table_from_entity(BreedingSeason),
        schema.create_table_from_entity(Location),
        schema.create_table_from_entity(BreedingCouple),
        schema.create_table_from_entity(Egg),
        schema.create_table_from_entity(ImportFile),
    ];
    for table in &mut tables {
        db.execute(builder.build(table.if_not_exists())).await?;
    }

    let ring_index = Index::create()
        .name("idx_birds_user_ring_number")
        .table(Bird)
        .col(bird::Column::UserId)
        .col(bird::Column::RingNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&ring_index)).await?;

    Ok(())
}
