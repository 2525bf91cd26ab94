//! Color property entity - A named color trait with a curator-defined rank.
//!
//! Lower ranks are more important and are listed first. Ranks are not unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Color property database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "color_properties")]
pub struct Model {
    /// Unique identifier for the color property
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Name as it appears in descriptions, e.g. "Cinnamon"
    pub color_name: String,
    /// Matter of importance: 1 is very important, 1000 is not
    pub rank: i32,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
