//! Core business logic - framework-agnostic breeding records.
//!
//! Nothing in here knows about Discord. Every operation takes the acting
//! user explicitly as an [`tenant::Actor`].

/// Bird registration, lineage and bulk flags
pub mod bird;
/// Seasons, couples, eggs and locations
pub mod breeding;
/// Breeders and the color property catalog
pub mod catalog;
/// CSV export
pub mod export;
/// Color descriptions built from the primary color and properties
pub mod genetics;
/// Spreadsheet import
pub mod import;
/// Ancestor trees and lineage validation
pub mod pedigree;
/// Spreadsheet row readers
pub mod rows;
/// Per-tenant visibility and ownership rules
pub mod scope;
/// The acting user
pub mod tenant;
