//! Breeder entity - Contacts that bred or currently own a bird.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Breeder database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "breeders")]
pub struct Model {
    /// Unique identifier for the breeder
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Breeding registration number, the first segment of a ring number
    pub breeding_reg_nr: Option<String>,
    /// Home address
    pub address: Option<String>,
    /// Phone number
    pub phone_number: Option<String>,
    /// Free-form notes
    pub notes: String,
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

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {} ({})",
            self.last_name,
            self.first_name,
            self.breeding_reg_nr.as_deref().unwrap_or("-")
        )
    }
}
