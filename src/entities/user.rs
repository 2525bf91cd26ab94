//! User entity - The tenant that owns birds, breeders and the color catalog.
//!
//! Every tenant-scoped table references a user and is hard-deleted with it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the account holder
    #[sea_orm(unique)]
    pub discord_id: String,
    /// Display name at registration time
    pub username: String,
    /// Exempt from tenant isolation
    pub is_superuser: bool,
    /// Deactivated accounts are refused every feature
    pub is_active: bool,
    /// The user's own breeding registration number
    pub breeding_reg_nr: Option<String>,
    /// Free-form notes
    pub notes: String,
    /// When the user first interacted with the bot
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
