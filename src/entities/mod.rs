//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bird;
pub mod bird_color_property;
pub mod bird_split_property;
pub mod breeder;
pub mod breeding_couple;
pub mod breeding_season;
pub mod color_property;
pub mod egg;
pub mod import_file;
pub mod location;
pub mod user;

// Re-export specific types to avoid conflicts
pub use bird::{Entity as Bird, Model as BirdModel};
pub use bird_color_property::Entity as BirdColorProperty;
pub use bird_split_property::Entity as BirdSplitProperty;
pub use breeder::Entity as Breeder;
pub use breeding_couple::Entity as BreedingCouple;
pub use breeding_season::Entity as BreedingSeason;
pub use color_property::Entity as ColorProperty;
pub use egg::{Entity as Egg, Model as EggModel};
pub use import_file::Entity as ImportFile;
pub use location::Entity as Location;
pub use user::{Entity as User, Model as UserModel};
