//! Import file entity - One uploaded spreadsheet and the outcome of importing it.
//!
//! Written once when the upload arrives and marked completed after the rows
//! have been processed; `notes` records anything special that happened.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Import file database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "import_files")]
pub struct Model {
    /// Unique identifier for the upload
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Original file name of the upload
    pub file_name: String,
    /// When the file was uploaded
    pub uploaded_at: DateTimeUtc,
    /// Whether the import ran to completion
    pub completed: bool,
    /// Information about the import process
    pub notes: Option<String>,
}

/// Defines relationships between `ImportFile` and other entities
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
