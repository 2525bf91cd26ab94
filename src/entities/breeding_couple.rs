//! Breeding couple entity - A male and a female paired for one season.
//!
//! Gender of the two birds is only filtered when choosing candidates, it is
//! not enforced by storage.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Breeding couple database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "breeding_couples")]
pub struct Model {
    /// Unique identifier for the couple
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Season this couple breeds in
    pub season_id: i64,
    /// Cock, nulled if the bird is deleted
    pub male_id: Option<i64>,
    /// Hen, nulled if the bird is deleted
    pub female_id: Option<i64>,
    pub start_date: Option<Date>,
    /// Where the couple is housed
    pub location_id: Option<i64>,
    pub notes: String,
}

/// Defines relationships between `BreedingCouple` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Each couple belongs to one season
    #[sea_orm(
        belongs_to = "super::breeding_season::Entity",
        from = "Column::SeasonId",
        to = "super::breeding_season::Column::Id",
        on_delete = "Cascade"
    )]
    Season,
    #[sea_orm(
        belongs_to = "super::bird::Entity",
        from = "Column::MaleId",
        to = "super::bird::Column::Id",
        on_delete = "SetNull"
    )]
    Male,
    #[sea_orm(
        belongs_to = "super::bird::Entity",
        from = "Column::FemaleId",
        to = "super::bird::Column::Id",
        on_delete = "SetNull"
    )]
    Female,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_delete = "SetNull"
    )]
    Location,
    /// One couple has many eggs
    #[sea_orm(has_many = "super::egg::Entity")]
    Eggs,
}

impl Related<super::breeding_season::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Season.def()
    }
}

impl Related<super::egg::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Eggs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
