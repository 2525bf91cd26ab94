//! Bird entity - The central record: identity, lineage, ownership and coloring.
//!
//! A bird is identified by its ring number, unique per owning user. Father and
//! mother are nullable self-references that are nulled when the parent is
//! deleted; the visible and split color properties live in the
//! [`bird_color_property`](super::bird_color_property) and
//! [`bird_split_property`](super::bird_split_property) junction tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Placeholder photo used until a picture is uploaded.
pub const DEFAULT_PHOTO: &str = "birds/default.png";

/// Gender of the bird
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Gender {
    /// Not (yet) determined
    #[default]
    #[sea_orm(string_value = "unknown")]
    Unknown,
    /// Cock
    #[sea_orm(string_value = "male")]
    Male,
    /// Hen
    #[sea_orm(string_value = "female")]
    Female,
}

impl Gender {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Primary color, stored as the category number of the show schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PrimaryColor {
    #[sea_orm(string_value = "18.001.001")]
    LightGreen,
    #[sea_orm(string_value = "18.002.001")]
    DarkGreen,
    #[sea_orm(string_value = "18.002.002")]
    OliveGreen,
    #[sea_orm(string_value = "18.002.003")]
    GreyGreen,
    #[sea_orm(string_value = "18.002.004")]
    VioletGreen,
    #[sea_orm(string_value = "18.004.001")]
    SkyBlue,
    #[sea_orm(string_value = "18.004.002")]
    Mauve,
    #[sea_orm(string_value = "18.004.003")]
    Gray,
    #[sea_orm(string_value = "18.004.004")]
    VioletGrey,
    #[sea_orm(string_value = "18.004.005")]
    VioletBlue,
}

impl PrimaryColor {
    /// Every color in enumeration order; text matching walks this order.
    pub const ALL: [Self; 10] = [
        Self::LightGreen,
        Self::DarkGreen,
        Self::OliveGreen,
        Self::GreyGreen,
        Self::VioletGreen,
        Self::SkyBlue,
        Self::Mauve,
        Self::Gray,
        Self::VioletGrey,
        Self::VioletBlue,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LightGreen => "Light Green",
            Self::DarkGreen => "Dark Green",
            Self::OliveGreen => "Olive Green",
            Self::GreyGreen => "Grey Green",
            Self::VioletGreen => "Violet Green",
            Self::SkyBlue => "Sky Blue",
            Self::Mauve => "Mauve",
            Self::Gray => "Gray",
            Self::VioletGrey => "Violet Grey",
            Self::VioletBlue => "Violet Blue",
        }
    }

    /// Category code, e.g. `18.004.003`.
    #[must_use]
    pub fn code(self) -> String {
        self.to_value()
    }
}

/// Bird database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "birds")]
pub struct Model {
    /// Unique identifier for the bird
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Leg band identifier, unique per owning user
    pub ring_number: String,
    /// Gender, `unknown` by default
    pub gender: Gender,
    /// Primary color category, unset for skeletal records
    pub color: Option<PrimaryColor>,
    pub date_of_birth: Option<Date>,
    pub date_of_death: Option<Date>,
    /// Father, nulled when the father is deleted
    pub father_id: Option<i64>,
    /// Mother, nulled when the mother is deleted
    pub mother_id: Option<i64>,
    /// Breeder who bred the bird
    pub breeder_id: Option<i64>,
    /// Breeder who currently owns the bird
    pub owner_id: Option<i64>,
    /// The user owns this bird (it may still be away, e.g. after a trade)
    pub is_owned: bool,
    pub is_for_sale: bool,
    pub notes: String,
    /// Photo reference, [`DEFAULT_PHOTO`] until one is uploaded
    pub photo: String,
}

/// Defines relationships between Bird and other entities
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
    /// Father bird
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::FatherId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Father,
    /// Mother bird
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::MotherId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Mother,
    /// Breeder of the bird
    #[sea_orm(
        belongs_to = "super::breeder::Entity",
        from = "Column::BreederId",
        to = "super::breeder::Column::Id",
        on_delete = "SetNull"
    )]
    Breeder,
    /// Current owner of the bird
    #[sea_orm(
        belongs_to = "super::breeder::Entity",
        from = "Column::OwnerId",
        to = "super::breeder::Column::Id",
        on_delete = "SetNull"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parent id for the given role.
    #[must_use]
    pub const fn parent_id(&self, role: ParentRole) -> Option<i64> {
        match role {
            ParentRole::Father => self.father_id,
            ParentRole::Mother => self.mother_id,
        }
    }
}

/// Which parent relation is being set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRole {
    Father,
    Mother,
}

impl ParentRole {
    /// Lowercase role name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
        }
    }
}
