//! Visible property junction - Links a bird to the colors a bird visibly expresses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction row between a bird and a color property
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bird_color_properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub bird_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub color_property_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bird::Entity",
        from = "Column::BirdId",
        to = "super::bird::Column::Id",
        on_delete = "Cascade"
    )]
    Bird,
    #[sea_orm(
        belongs_to = "super::color_property::Entity",
        from = "Column::ColorPropertyId",
        to = "super::color_property::Column::Id",
        on_delete = "Cascade"
    )]
    ColorProperty,
}

impl Related<super::bird::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bird.def()
    }
}

impl Related<super::color_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ColorProperty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
