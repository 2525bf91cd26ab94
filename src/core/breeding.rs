//! Breeding business logic - Seasons, couples, eggs and locations.
//!
//! Eggs live under a couple and couples under a season; every level is
//! filtered through the access scope, eggs through both their own owner and
//! their couple's owner.

use crate::{
    core::{
        scope::{self, owner_for_write},
        tenant::Actor,
    },
    entities::{
        Bird, BreedingCouple, BreedingSeason, Egg, Location, bird::Gender, breeding_couple,
        breeding_season, egg, egg::EggStatus, location,
    },
    errors::{Error, Result},
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*, sea_query::Expr};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Days between finding a fertilized egg and its expected hatch.
pub const INCUBATION_DAYS: i64 = 18;

/// Earliest and latest accepted starting year of a season.
pub const SEASON_YEARS: std::ops::RangeInclusive<i32> = 2000..=2100;

/// Expected hatch date of an egg; only fertilized eggs hatch.
///
/// Computed on every call so a status change is reflected immediately.
#[must_use]
pub fn expected_hatch_date(egg: &egg::Model) -> Option<NaiveDate> {
    match egg.status {
        EggStatus::Fertilized => Some(egg.date + Duration::days(INCUBATION_DAYS)),
        EggStatus::Unfertilized | EggStatus::DiedOff | EggStatus::Broken => None,
    }
}

/// Creates a breeding season.
#[instrument(skip(db))]
pub async fn create_season<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    user_id: Option<i64>,
    starting_year: i32,
    starting_month: i32,
    label: Option<String>,
) -> Result<breeding_season::Model> {
    if !SEASON_YEARS.contains(&starting_year) {
        return Err(Error::InvalidValue {
            field: "starting_year".to_string(),
            value: starting_year.to_string(),
        });
    }
    if !(1..=12).contains(&starting_month) {
        return Err(Error::InvalidValue {
            field: "starting_month".to_string(),
            value: starting_month.to_string(),
        });
    }
    let label = label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());

    let season = breeding_season::ActiveModel {
        user_id: Set(owner_for_write(actor, user_id)),
        starting_year: Set(starting_year),
        starting_month: Set(starting_month),
        label: Set(label),
        ..Default::default()
    };
    Ok(season.insert(db).await?)
}

/// Visible seasons, newest first, each with its number of couples.
pub async fn list_seasons_with_couple_count<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
) -> Result<Vec<(breeding_season::Model, i64)>> {
    let seasons = scope::scoped_find::<BreedingSeason>(actor)
        .order_by_desc(breeding_season::Column::StartingYear)
        .order_by_desc(breeding_season::Column::StartingMonth)
        .all(db)
        .await?;

    let counts: HashMap<i64, i64> = scope::scoped_find::<BreedingCouple>(actor)
        .select_only()
        .column(breeding_couple::Column::SeasonId)
        .column_as(Expr::col(breeding_couple::Column::Id).count(), "couple_count")
        .group_by(breeding_couple::Column::SeasonId)
        .into_tuple::<(i64, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(seasons
        .into_iter()
        .map(|season| {
            let count = counts.get(&season.id).copied().unwrap_or(0);
            (season, count)
        })
        .collect())
}

/// Fields of a breeding couple as submitted by a form or command.
#[derive(Debug, Clone, Default)]
pub struct CoupleInput {
    /// Owning user requested by the submitter; only honored for superusers
    pub user_id: Option<i64>,
    pub season_id: i64,
    pub male_id: Option<i64>,
    pub female_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub location_id: Option<i64>,
    pub notes: String,
}

/// Creates a couple in a visible season. The male and female must be visible
/// birds of the matching gender.
#[instrument(skip(db))]
pub async fn create_couple<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    input: CoupleInput,
) -> Result<breeding_couple::Model> {
    scope::find_visible::<BreedingSeason, _>(db, actor, input.season_id).await?;
    for (field, id, gender) in [
        ("male", input.male_id, Gender::Male),
        ("female", input.female_id, Gender::Female),
    ] {
        let Some(bird) = scope::find_visible_opt::<Bird, _>(db, actor, id).await? else {
            continue;
        };
        if bird.gender != gender {
            return Err(Error::InvalidValue {
                field: field.to_string(),
                value: bird.ring_number,
            });
        }
    }
    scope::find_visible_opt::<Location, _>(db, actor, input.location_id).await?;

    let couple = breeding_couple::ActiveModel {
        user_id: Set(owner_for_write(actor, input.user_id)),
        season_id: Set(input.season_id),
        male_id: Set(input.male_id),
        female_id: Set(input.female_id),
        start_date: Set(input.start_date),
        location_id: Set(input.location_id),
        notes: Set(input.notes),
        ..Default::default()
    };
    let couple = couple.insert(db).await?;
    info!("Created breeding couple {} in season {}", couple.id, couple.season_id);
    Ok(couple)
}

/// Visible couples of a visible season.
pub async fn list_couples<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    season_id: i64,
) -> Result<Vec<breeding_couple::Model>> {
    let season = scope::find_visible::<BreedingSeason, _>(db, actor, season_id).await?;
    scope::scoped_find::<BreedingCouple>(actor)
        .filter(breeding_couple::Column::SeasonId.eq(season.id))
        .order_by_asc(breeding_couple::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records an egg found in the nest of a visible couple.
pub async fn create_egg<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    user_id: Option<i64>,
    couple_id: i64,
    date: NaiveDate,
    status: EggStatus,
) -> Result<egg::Model> {
    let couple = scope::find_visible::<BreedingCouple, _>(db, actor, couple_id).await?;
    let egg = egg::ActiveModel {
        user_id: Set(owner_for_write(actor, user_id)),
        couple_id: Set(couple.id),
        date: Set(date),
        status: Set(status),
        ..Default::default()
    };
    Ok(egg.insert(db).await?)
}

/// Changes the status of a visible egg.
pub async fn update_egg_status<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    egg_id: i64,
    status: EggStatus,
) -> Result<egg::Model> {
    let existing = scope::find_visible::<Egg, _>(db, actor, egg_id).await?;
    let mut egg: egg::ActiveModel = existing.into();
    egg.status = Set(status);
    Ok(egg.update(db).await?)
}

/// Visible eggs of a visible couple, oldest first.
pub async fn list_eggs_for_couple<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    couple_id: i64,
) -> Result<Vec<egg::Model>> {
    let couple = scope::find_visible::<BreedingCouple, _>(db, actor, couple_id).await?;
    scope::scoped_find::<Egg>(actor)
        .filter(egg::Column::CoupleId.eq(couple.id))
        .order_by_asc(egg::Column::Date)
        .order_by_asc(egg::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds one egg with the same date and status to each listed couple.
///
/// Couples the actor cannot see are skipped without error. Returns how many
/// eggs were created. Without a date the eggs are dated today.
#[instrument(skip(db))]
pub async fn bulk_add_eggs<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    couple_ids: &[i64],
    date: Option<NaiveDate>,
    status: Option<EggStatus>,
) -> Result<u64> {
    let Some(status) = status else {
        return Err(Error::MissingField {
            field: "status".to_string(),
        });
    };
    if couple_ids.is_empty() {
        return Err(Error::MissingField {
            field: "couples".to_string(),
        });
    }
    let date = date.unwrap_or_else(|| Utc::now().date_naive());

    let mut created = 0;
    for couple_id in couple_ids {
        match create_egg(db, actor, None, *couple_id, date, status).await {
            Ok(_) => created += 1,
            Err(Error::NotFound { .. }) => debug!("Skipping couple {couple_id}: not visible"),
            Err(e) => return Err(e),
        }
    }
    info!("Added {created} eggs for {} selected couples", couple_ids.len());
    Ok(created)
}

/// Creates a breeding location.
pub async fn create_location<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    user_id: Option<i64>,
    name: &str,
) -> Result<location::Model> {
    if name.trim().is_empty() {
        return Err(Error::MissingField {
            field: "name".to_string(),
        });
    }
    let location = location::ActiveModel {
        user_id: Set(owner_for_write(actor, user_id)),
        name: Set(name.trim().to_string()),
        current_couple_id: Set(None),
        ..Default::default()
    };
    Ok(location.insert(db).await?)
}

/// Visible locations ordered by name.
pub async fn list_locations<C: ConnectionTrait>(db: &C, actor: &Actor) -> Result<Vec<location::Model>> {
    scope::scoped_find::<Location>(actor)
        .order_by_asc(location::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a couple as the current occupant of a location, or clears it.
///
/// Nothing prevents the same couple from being current at two locations;
/// the last assignment wins.
pub async fn assign_location<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    location_id: i64,
    couple_id: Option<i64>,
) -> Result<location::Model> {
    let existing = scope::find_visible::<Location, _>(db, actor, location_id).await?;
    scope::find_visible_opt::<BreedingCouple, _>(db, actor, couple_id).await?;

    let mut location: location::ActiveModel = existing.into();
    location.current_couple_id = Set(couple_id);
    Ok(location.update(db).await?)
}

/// The couple currently at a visible location, if any and still visible.
pub async fn current_couple<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    location_id: i64,
) -> Result<Option<breeding_couple::Model>> {
    let location = scope::find_visible::<Location, _>(db, actor, location_id).await?;
    match location.current_couple_id {
        Some(id) => Ok(scope::scope_query(actor, BreedingCouple::find_by_id(id))
            .one(db)
            .await?),
        None => Ok(None),
    }
}
