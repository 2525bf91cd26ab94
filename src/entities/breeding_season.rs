//! Breeding season entity - A breeding round starting in a given year and month.
//!
//! Several rounds per year are told apart by their starting month and an
//! optional label.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Breeding season database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "breeding_seasons")]
pub struct Model {
    /// Unique identifier for the season
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Starting year, 2000 through 2100
    pub starting_year: i32,
    /// Starting month, 1 through 12
    pub starting_month: i32,
    /// Optional label to find the season quicker
    pub label: Option<String>,
}

/// Defines relationships between `BreedingSeason` and other entities
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
    /// One season has many couples
    #[sea_orm(has_many = "super::breeding_couple::Entity")]
    Couples,
}

impl Related<super::breeding_couple::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Couples.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let month = u8::try_from(self.starting_month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok())
            .map_or("?", |m| m.name());
        write!(f, "Breeding round {}, {month}", self.starting_year)?;
        if let Some(label) = &self.label {
            write!(f, " ({label})")?;
        }
        Ok(())
    }
}
