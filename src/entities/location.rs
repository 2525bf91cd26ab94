//! Location entity - A breeding cage or aviary with at most one current couple.
//!
//! The current couple is a soft pointer: nothing stops the same couple from
//! being current at two locations, and the last assignment wins.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Location database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    pub name: String,
    /// Couple currently breeding here, can be empty
    pub current_couple_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::breeding_couple::Entity",
        from = "Column::CurrentCoupleId",
        to = "super::breeding_couple::Column::Id",
        on_delete = "SetNull"
    )]
    CurrentCouple,
}

impl ActiveModelBehavior for ActiveModel {}
