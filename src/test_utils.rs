//! Shared test utilities for the breeding records.
//!
//! This module provides helpers for setting up an in-memory database and
//! creating users, birds and couples with sensible defaults.

use crate::{
    core::{
        bird as birds, breeding,
        tenant::{self, Actor},
    },
    entities::{bird, bird::Gender, breeding_couple},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a regular user named `name` and returns their actor.
pub async fn create_test_actor(db: &DatabaseConnection, name: &str) -> Result<Actor> {
    let user = tenant::register_user(db, &format!("discord-{name}"), name, false).await?;
    Ok(Actor::from_user(&user))
}

/// Registers a superuser named `name` and returns their actor.
pub async fn create_test_superuser(db: &DatabaseConnection, name: &str) -> Result<Actor> {
    let user = tenant::register_user(db, &format!("discord-{name}"), name, true).await?;
    Ok(Actor::from_user(&user))
}

/// Creates a bird with only a ring number.
pub async fn create_test_bird(
    db: &DatabaseConnection,
    actor: &Actor,
    ring_number: &str,
) -> Result<bird::Model> {
    birds::create_bird(db, actor, birds::BirdInput::with_ring(ring_number)).await
}

/// Creates a bird with a ring number and gender.
pub async fn create_test_bird_with_gender(
    db: &DatabaseConnection,
    actor: &Actor,
    ring_number: &str,
    gender: Gender,
) -> Result<bird::Model> {
    birds::create_bird(
        db,
        actor,
        birds::BirdInput {
            gender,
            ..birds::BirdInput::with_ring(ring_number)
        },
    )
    .await
}

/// Creates a bird with a ring number and birth date.
pub async fn create_test_bird_born(
    db: &DatabaseConnection,
    actor: &Actor,
    ring_number: &str,
    date_of_birth: NaiveDate,
) -> Result<bird::Model> {
    birds::create_bird(
        db,
        actor,
        birds::BirdInput {
            date_of_birth: Some(date_of_birth),
            ..birds::BirdInput::with_ring(ring_number)
        },
    )
    .await
}

/// Creates a couple without birds in a fresh 2024 season.
pub async fn create_test_couple(
    db: &DatabaseConnection,
    actor: &Actor,
) -> Result<breeding_couple::Model> {
    create_test_couple_with(db, actor, None, None).await
}

/// Creates a couple of the given birds in a fresh 2024 season.
pub async fn create_test_couple_with(
    db: &DatabaseConnection,
    actor: &Actor,
    male_id: Option<i64>,
    female_id: Option<i64>,
) -> Result<breeding_couple::Model> {
    let season = breeding::create_season(db, actor, None, 2024, 1, None).await?;
    breeding::create_couple(
        db,
        actor,
        breeding::CoupleInput {
            season_id: season.id,
            male_id,
            female_id,
            ..Default::default()
        },
    )
    .await
}
