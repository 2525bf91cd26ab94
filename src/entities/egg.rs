//! Egg entity - A single egg found in a couple's nest.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fertilization status of an egg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EggStatus {
    #[sea_orm(string_value = "fertilized")]
    Fertilized,
    #[default]
    #[sea_orm(string_value = "unfertilized")]
    Unfertilized,
    #[sea_orm(string_value = "died_off")]
    DiedOff,
    #[sea_orm(string_value = "broken")]
    Broken,
}

/// Egg database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "eggs")]
pub struct Model {
    /// Unique identifier for the egg
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Couple that laid the egg
    pub couple_id: i64,
    /// Date the egg was found
    pub date: Date,
    pub status: EggStatus,
}

/// Defines relationships between Egg and other entities
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
    /// Each egg belongs to one couple
    #[sea_orm(
        belongs_to = "super::breeding_couple::Entity",
        from = "Column::CoupleId",
        to = "super::breeding_couple::Column::Id",
        on_delete = "Cascade"
    )]
    Couple,
}

impl Related<super::breeding_couple::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Couple.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
