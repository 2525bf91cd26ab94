//! Catalog business logic - Breeders and the color property catalog.
//!
//! Both are tenant-scoped reference data. Color properties are ordered by
//! rank; breeders by last name, case-insensitively.

use crate::{
    core::{
        scope::{self, owner_for_write},
        tenant::Actor,
    },
    entities::{Bird, Breeder, ColorProperty, bird, breeder, color_property},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, Func, SimpleExpr},
};
use tracing::{info, instrument};

/// Fields of a breeder as submitted by a form or command.
#[derive(Debug, Clone, Default)]
pub struct BreederInput {
    /// Owning user requested by the submitter; only honored for superusers
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub breeding_reg_nr: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub notes: String,
}

/// Creates a breeder owned by the actor (or by the submitted user for
/// superusers).
#[instrument(skip(db))]
pub async fn create_breeder<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    input: BreederInput,
) -> Result<breeder::Model> {
    if input.last_name.trim().is_empty() {
        return Err(Error::MissingField {
            field: "last_name".to_string(),
        });
    }

    let breeder = breeder::ActiveModel {
        user_id: Set(owner_for_write(actor, input.user_id)),
        first_name: Set(input.first_name.trim().to_string()),
        last_name: Set(input.last_name.trim().to_string()),
        breeding_reg_nr: Set(input.breeding_reg_nr),
        address: Set(input.address),
        phone_number: Set(input.phone_number),
        notes: Set(input.notes),
        ..Default::default()
    };
    Ok(breeder.insert(db).await?)
}

/// Replaces the editable fields of a visible breeder.
pub async fn update_breeder(
    db: &DatabaseConnection,
    actor: &Actor,
    breeder_id: i64,
    input: BreederInput,
) -> Result<breeder::Model> {
    let existing = scope::find_visible::<Breeder, _>(db, actor, breeder_id).await?;
    if input.last_name.trim().is_empty() {
        return Err(Error::MissingField {
            field: "last_name".to_string(),
        });
    }

    let owner = owner_for_write(actor, input.user_id.or(Some(existing.user_id)));
    let mut breeder: breeder::ActiveModel = existing.into();
    breeder.user_id = Set(owner);
    breeder.first_name = Set(input.first_name.trim().to_string());
    breeder.last_name = Set(input.last_name.trim().to_string());
    breeder.breeding_reg_nr = Set(input.breeding_reg_nr);
    breeder.address = Set(input.address);
    breeder.phone_number = Set(input.phone_number);
    breeder.notes = Set(input.notes);
    Ok(breeder.update(db).await?)
}

/// Fetches a visible breeder.
pub async fn get_breeder<C: ConnectionTrait>(db: &C, actor: &Actor, breeder_id: i64) -> Result<breeder::Model> {
    scope::find_visible::<Breeder, _>(db, actor, breeder_id).await
}

/// Visible breeders ordered by last name, case-insensitively.
pub async fn list_breeders(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<breeder::Model>> {
    scope::scoped_find::<Breeder>(actor)
        .order_by_asc(SimpleExpr::from(Func::lower(Expr::col(breeder::Column::LastName))))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a visible breeder. Birds bred or owned by them keep existing with
/// the reference cleared.
#[instrument(skip(db))]
pub async fn delete_breeder(db: &DatabaseConnection, actor: &Actor, breeder_id: i64) -> Result<()> {
    let breeder = scope::find_visible::<Breeder, _>(db, actor, breeder_id).await?;
    let txn = db.begin().await?;

    Bird::update_many()
        .col_expr(bird::Column::BreederId, Expr::value(Option::<i64>::None))
        .filter(bird::Column::BreederId.eq(breeder.id))
        .exec(&txn)
        .await?;
    Bird::update_many()
        .col_expr(bird::Column::OwnerId, Expr::value(Option::<i64>::None))
        .filter(bird::Column::OwnerId.eq(breeder.id))
        .exec(&txn)
        .await?;
    Breeder::delete_by_id(breeder.id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted breeder {}", breeder.id);
    Ok(())
}

/// Creates a color property owned by the actor (or by the submitted user for
/// superusers).
pub async fn create_color_property<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    user_id: Option<i64>,
    color_name: &str,
    rank: i32,
) -> Result<color_property::Model> {
    if color_name.trim().is_empty() {
        return Err(Error::MissingField {
            field: "color_name".to_string(),
        });
    }

    let property = color_property::ActiveModel {
        user_id: Set(owner_for_write(actor, user_id)),
        color_name: Set(color_name.trim().to_string()),
        rank: Set(rank),
        ..Default::default()
    };
    Ok(property.insert(db).await?)
}

/// Changes the rank of a visible color property.
pub async fn set_color_property_rank<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    property_id: i64,
    rank: i32,
) -> Result<color_property::Model> {
    let existing = scope::find_visible::<ColorProperty, _>(db, actor, property_id).await?;
    let mut property: color_property::ActiveModel = existing.into();
    property.rank = Set(rank);
    Ok(property.update(db).await?)
}

/// Visible color properties ordered by rank.
pub async fn list_color_properties<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
) -> Result<Vec<color_property::Model>> {
    scope::scoped_find::<ColorProperty>(actor)
        .order_by_asc(color_property::Column::Rank)
        .order_by_asc(color_property::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a visible color property by name, case-insensitively.
pub async fn get_color_property_by_name<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    color_name: &str,
) -> Result<Option<color_property::Model>> {
    let wanted = color_name.trim().to_lowercase();
    Ok(list_color_properties(db, actor)
        .await?
        .into_iter()
        .find(|p| p.color_name.to_lowercase() == wanted))
}

/// Deletes a visible color property; the junction rows go with it.
pub async fn delete_color_property(
    db: &DatabaseConnection,
    actor: &Actor,
    property_id: i64,
) -> Result<()> {
    let property = scope::find_visible::<ColorProperty, _>(db, actor, property_id).await?;
    ColorProperty::delete_by_id(property.id).exec(db).await?;
    Ok(())
}
