//! Bird business logic - Registering, editing and deleting birds.
//!
//! Every function takes the acting user and goes through the access scope.
//! Lineage changes are validated by the pedigree engine before they are
//! written, and deleting a bird clears the references its children and
//! couples hold instead of cascading.

use crate::{
    core::{
        pedigree,
        scope::{self, owner_for_write},
        tenant::Actor,
    },
    entities::{
        Bird, BirdColorProperty, BirdSplitProperty, Breeder, BreedingCouple, ColorProperty, bird,
        bird::{Gender, ParentRole, PrimaryColor},
        bird_color_property, bird_split_property, breeding_couple,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// Editable fields of a bird as submitted by a form, command or import.
#[derive(Debug, Clone, Default)]
pub struct BirdInput {
    /// Owning user requested by the submitter; only honored for superusers
    pub user_id: Option<i64>,
    pub ring_number: String,
    pub gender: Gender,
    pub color: Option<PrimaryColor>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub breeder_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub is_owned: bool,
    pub is_for_sale: bool,
    pub notes: String,
}

impl BirdInput {
    /// Input with only a ring number, everything else at its default.
    #[must_use]
    pub fn with_ring(ring_number: &str) -> Self {
        Self {
            ring_number: ring_number.to_string(),
            ..Default::default()
        }
    }
}

/// Registers a new bird.
///
/// The ring number must be non-empty and unused by the owning user, the
/// dates must be in order, and breeder/owner must be visible to the actor.
#[instrument(skip(db))]
pub async fn create_bird<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    input: BirdInput,
) -> Result<bird::Model> {
    let ring_number = input.ring_number.trim().to_string();
    if ring_number.is_empty() {
        return Err(Error::MissingField {
            field: "ring_number".to_string(),
        });
    }
    pedigree::validate_dates(input.date_of_birth, input.date_of_death)?;

    let user_id = owner_for_write(actor, input.user_id);
    ensure_ring_available(db, user_id, &ring_number, None).await?;
    scope::find_visible_opt::<Breeder, _>(db, actor, input.breeder_id).await?;
    scope::find_visible_opt::<Breeder, _>(db, actor, input.owner_id).await?;

    let bird = bird::ActiveModel {
        user_id: Set(user_id),
        ring_number: Set(ring_number),
        gender: Set(input.gender),
        color: Set(input.color),
        date_of_birth: Set(input.date_of_birth),
        date_of_death: Set(input.date_of_death),
        father_id: Set(None),
        mother_id: Set(None),
        breeder_id: Set(input.breeder_id),
        owner_id: Set(input.owner_id),
        is_owned: Set(input.is_owned),
        is_for_sale: Set(input.is_for_sale),
        notes: Set(input.notes),
        photo: Set(bird::DEFAULT_PHOTO.to_string()),
        ..Default::default()
    };
    let bird = bird.insert(db).await?;
    info!("Registered bird {} ({})", bird.ring_number, bird.id);
    Ok(bird)
}

async fn ensure_ring_available<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    ring_number: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let mut query = Bird::find()
        .filter(bird::Column::UserId.eq(user_id))
        .filter(bird::Column::RingNumber.eq(ring_number));
    if let Some(id) = except_id {
        query = query.filter(bird::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::DuplicateRingNumber {
            ring_number: ring_number.to_string(),
        });
    }
    Ok(())
}

/// Fetches a visible bird by id.
pub async fn get_bird<C: ConnectionTrait>(db: &C, actor: &Actor, bird_id: i64) -> Result<bird::Model> {
    scope::find_visible::<Bird, _>(db, actor, bird_id).await
}

/// Fetches a visible bird by ring number. A superuser's own bird wins over
/// another tenant's bird with the same ring.
pub async fn get_bird_by_ring<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    ring_number: &str,
) -> Result<bird::Model> {
    let candidates = scope::scoped_find::<Bird>(actor)
        .filter(bird::Column::RingNumber.eq(ring_number.trim()))
        .order_by_asc(bird::Column::Id)
        .all(db)
        .await?;
    let own = candidates.iter().position(|b| b.user_id == actor.user_id);
    let index = own.unwrap_or(0);
    candidates
        .into_iter()
        .nth(index)
        .ok_or_else(|| Error::not_found("bird", ring_number))
}

/// Visible birds ordered by ring number.
pub async fn list_birds<C: ConnectionTrait>(db: &C, actor: &Actor) -> Result<Vec<bird::Model>> {
    scope::scoped_find::<Bird>(actor)
        .order_by_asc(bird::Column::RingNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Checks a bird's birth date against its lifespan, its stored parents and
/// its children. Parents in `replaced` are about to be overwritten and are
/// not checked.
pub(crate) async fn check_birth_date<C: ConnectionTrait>(
    db: &C,
    bird: &bird::Model,
    replaced: &[ParentRole],
) -> Result<()> {
    pedigree::validate_dates(bird.date_of_birth, bird.date_of_death)?;
    if bird.date_of_birth.is_none() {
        return Ok(());
    }

    for role in [ParentRole::Father, ParentRole::Mother] {
        if replaced.contains(&role) {
            continue;
        }
        if let Some(parent_id) = bird.parent_id(role) {
            if let Some(parent) = Bird::find_by_id(parent_id).one(db).await? {
                pedigree::validate_parent_assignment(bird, &parent, role)?;
            }
        }
    }

    let children = Bird::find()
        .filter(
            Condition::any()
                .add(bird::Column::FatherId.eq(bird.id))
                .add(bird::Column::MotherId.eq(bird.id)),
        )
        .all(db)
        .await?;
    for child in &children {
        for role in [ParentRole::Father, ParentRole::Mother] {
            if child.parent_id(role) == Some(bird.id) {
                pedigree::validate_parent_assignment(child, bird, role)?;
            }
        }
    }
    Ok(())
}

/// Replaces the editable fields of a visible bird. Parents and color
/// properties are changed through [`set_parents`] and
/// [`set_color_properties`].
#[instrument(skip(db))]
pub async fn update_bird<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    bird_id: i64,
    input: BirdInput,
) -> Result<bird::Model> {
    let existing = get_bird(db, actor, bird_id).await?;
    let ring_number = input.ring_number.trim().to_string();
    if ring_number.is_empty() {
        return Err(Error::MissingField {
            field: "ring_number".to_string(),
        });
    }
    pedigree::validate_dates(input.date_of_birth, input.date_of_death)?;

    let user_id = owner_for_write(actor, input.user_id.or(Some(existing.user_id)));
    ensure_ring_available(db, user_id, &ring_number, Some(existing.id)).await?;
    scope::find_visible_opt::<Breeder, _>(db, actor, input.breeder_id).await?;
    scope::find_visible_opt::<Breeder, _>(db, actor, input.owner_id).await?;

    let mut candidate = existing.clone();
    candidate.date_of_birth = input.date_of_birth;
    candidate.date_of_death = input.date_of_death;
    check_birth_date(db, &candidate, &[]).await?;

    let mut bird: bird::ActiveModel = existing.into();
    bird.user_id = Set(user_id);
    bird.ring_number = Set(ring_number);
    bird.gender = Set(input.gender);
    bird.color = Set(input.color);
    bird.date_of_birth = Set(input.date_of_birth);
    bird.date_of_death = Set(input.date_of_death);
    bird.breeder_id = Set(input.breeder_id);
    bird.owner_id = Set(input.owner_id);
    bird.is_owned = Set(input.is_owned);
    bird.is_for_sale = Set(input.is_for_sale);
    bird.notes = Set(input.notes);
    Ok(bird.update(db).await?)
}

/// Sets (or clears, with `None`) both parents of a visible bird.
///
/// Each parent must be visible to the actor and pass
/// [`pedigree::validate_parent_assignment`]; nothing is written if either
/// fails.
#[instrument(skip(db))]
pub async fn set_parents<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    bird_id: i64,
    father_id: Option<i64>,
    mother_id: Option<i64>,
) -> Result<bird::Model> {
    let bird = get_bird(db, actor, bird_id).await?;

    for (role, parent_id) in [(ParentRole::Father, father_id), (ParentRole::Mother, mother_id)] {
        let Some(parent_id) = parent_id else { continue };
        if parent_id == bird.id {
            return Err(Error::SelfParent {
                role: role.as_str().to_string(),
            });
        }
        let parent = get_bird(db, actor, parent_id).await?;
        pedigree::validate_parent_assignment(&bird, &parent, role)?;
    }

    let mut active: bird::ActiveModel = bird.into();
    active.father_id = Set(father_id);
    active.mother_id = Set(mother_id);
    Ok(active.update(db).await?)
}

/// Sets the date of death of a visible bird.
pub async fn set_date_of_death<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    bird_id: i64,
    date_of_death: Option<NaiveDate>,
) -> Result<bird::Model> {
    let mut bird = get_bird(db, actor, bird_id).await?;
    bird.date_of_death = date_of_death;
    pedigree::validate_lifespan(&bird)?;

    let mut active: bird::ActiveModel = bird.into();
    active.date_of_death = Set(date_of_death);
    Ok(active.update(db).await?)
}

/// Replaces the visible and split color properties of a visible bird.
/// Every property must be visible to the actor.
pub async fn set_color_properties<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    bird_id: i64,
    visible_ids: &[i64],
    split_ids: &[i64],
) -> Result<()> {
    let bird = get_bird(db, actor, bird_id).await?;
    for id in visible_ids.iter().chain(split_ids) {
        scope::find_visible::<ColorProperty, _>(db, actor, *id).await?;
    }

    BirdColorProperty::delete_many()
        .filter(bird_color_property::Column::BirdId.eq(bird.id))
        .exec(db)
        .await?;
    BirdSplitProperty::delete_many()
        .filter(bird_split_property::Column::BirdId.eq(bird.id))
        .exec(db)
        .await?;

    for id in dedup(visible_ids) {
        add_color_property(db, bird.id, id).await?;
    }
    for id in dedup(split_ids) {
        bird_split_property::ActiveModel {
            bird_id: Set(bird.id),
            color_property_id: Set(id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

fn dedup(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Attaches a visible color property unless it is already attached.
pub(crate) async fn add_color_property<C: ConnectionTrait>(
    db: &C,
    bird_id: i64,
    color_property_id: i64,
) -> Result<()> {
    let existing = BirdColorProperty::find_by_id((bird_id, color_property_id))
        .one(db)
        .await?;
    if existing.is_none() {
        bird_color_property::ActiveModel {
            bird_id: Set(bird_id),
            color_property_id: Set(color_property_id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Deletes a visible bird. Children lose their father/mother reference and
/// couples lose the male/female reference; nothing else is deleted.
#[instrument(skip(db))]
pub async fn delete_bird(db: &DatabaseConnection, actor: &Actor, bird_id: i64) -> Result<()> {
    let bird = get_bird(db, actor, bird_id).await?;
    let txn = db.begin().await?;

    for column in [bird::Column::FatherId, bird::Column::MotherId] {
        Bird::update_many()
            .col_expr(column, Expr::value(Option::<i64>::None))
            .filter(column.eq(bird.id))
            .exec(&txn)
            .await?;
    }
    for column in [
        breeding_couple::Column::MaleId,
        breeding_couple::Column::FemaleId,
    ] {
        BreedingCouple::update_many()
            .col_expr(column, Expr::value(Option::<i64>::None))
            .filter(column.eq(bird.id))
            .exec(&txn)
            .await?;
    }
    Bird::delete_by_id(bird.id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted bird {} ({})", bird.ring_number, bird.id);
    Ok(())
}

/// Ids among `ids` that the actor can see.
async fn visible_bird_ids<C: ConnectionTrait>(db: &C, actor: &Actor, ids: &[i64]) -> Result<Vec<i64>> {
    Ok(scope::scoped_find::<Bird>(actor)
        .filter(bird::Column::Id.is_in(ids.to_vec()))
        .select_only()
        .column(bird::Column::Id)
        .into_tuple::<i64>()
        .all(db)
        .await?)
}

async fn set_flag_for_selected<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    ids: &[i64],
    column: bird::Column,
) -> Result<u64> {
    let visible = visible_bird_ids(db, actor, ids).await?;
    if visible.is_empty() {
        return Ok(0);
    }
    let result = Bird::update_many()
        .col_expr(column, Expr::value(true))
        .filter(bird::Column::Id.is_in(visible))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Marks every selected bird the actor can see as owned. Returns the number
/// of birds updated.
pub async fn mark_owned<C: ConnectionTrait>(db: &C, actor: &Actor, ids: &[i64]) -> Result<u64> {
    set_flag_for_selected(db, actor, ids, bird::Column::IsOwned).await
}

/// Marks every selected bird the actor can see as for sale. Returns the
/// number of birds updated.
pub async fn mark_for_sale<C: ConnectionTrait>(db: &C, actor: &Actor, ids: &[i64]) -> Result<u64> {
    set_flag_for_selected(db, actor, ids, bird::Column::IsForSale).await
}

/// Gets the bird with this ring number for `user_id`, creating a skeletal
/// record with `gender` if there is none. Returns whether it was created.
pub(crate) async fn get_or_create_by_ring<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    ring_number: &str,
    gender: Gender,
) -> Result<(bird::Model, bool)> {
    let existing = Bird::find()
        .filter(bird::Column::UserId.eq(user_id))
        .filter(bird::Column::RingNumber.eq(ring_number))
        .one(db)
        .await?;
    if let Some(bird) = existing {
        return Ok((bird, false));
    }

    let bird = bird::ActiveModel {
        user_id: Set(user_id),
        ring_number: Set(ring_number.to_string()),
        gender: Set(gender),
        color: Set(None),
        date_of_birth: Set(None),
        date_of_death: Set(None),
        father_id: Set(None),
        mother_id: Set(None),
        breeder_id: Set(None),
        owner_id: Set(None),
        is_owned: Set(false),
        is_for_sale: Set(false),
        notes: Set(String::new()),
        photo: Set(bird::DEFAULT_PHOTO.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((bird, true))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::catalog;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_default_gender_and_photo() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let bird = create_test_bird(&db, &actor, "5TJJ-81-2018").await?;
        assert_eq!(bird.gender, Gender::Unknown);
        assert_eq!(bird.photo, bird::DEFAULT_PHOTO);
        assert!(!bird.is_owned);
        Ok(())
    }

    #[tokio::test]
    async fn test_ring_number_unique_per_tenant() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let bob = create_test_actor(&db, "bob").await?;

        create_test_bird(&db, &alice, "5TJJ-12-2018").await?;
        // Another tenant may use the same ring
        create_test_bird(&db, &bob, "5TJJ-12-2018").await?;

        let result = create_test_bird(&db, &alice, "5TJJ-12-2018").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateRingNumber { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_unique_index_backs_ring_check() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let (first, created) = get_or_create_by_ring(&db, alice.user_id, "X-1", Gender::Unknown).await?;
        assert!(created);

        let duplicate = bird::ActiveModel {
            user_id: Set(alice.user_id),
            ring_number: Set("X-1".to_string()),
            gender: Set(Gender::Unknown),
            color: Set(None),
            date_of_birth: Set(None),
            date_of_death: Set(None),
            father_id: Set(None),
            mother_id: Set(None),
            breeder_id: Set(None),
            owner_id: Set(None),
            is_owned: Set(false),
            is_for_sale: Set(false),
            notes: Set(String::new()),
            photo: Set(bird::DEFAULT_PHOTO.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(duplicate.is_err());

        let (again, created) = get_or_create_by_ring(&db, alice.user_id, "X-1", Gender::Female).await?;
        assert!(!created);
        assert_eq!(again.id, first.id);
        assert_eq!(again.gender, Gender::Unknown);
        Ok(())
    }

    #[tokio::test]
    async fn test_owner_spoofing_is_ignored() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let bob = create_test_actor(&db, "bob").await?;
        let bird = create_bird(
            &db,
            &alice,
            BirdInput {
                user_id: Some(bob.user_id),
                ..BirdInput::with_ring("A-1")
            },
        )
        .await?;
        assert_eq!(bird.user_id, alice.user_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_parents_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let child = create_test_bird_born(&db, &actor, "C", date(2021, 4, 1)).await?;
        let father = create_test_bird_born(&db, &actor, "F", date(2019, 4, 1)).await?;
        let young = create_test_bird_born(&db, &actor, "Y", date(2022, 4, 1)).await?;

        let result = set_parents(&db, &actor, child.id, Some(child.id), None).await;
        assert!(matches!(result.unwrap_err(), Error::SelfParent { .. }));
        let result = set_parents(&db, &actor, child.id, None, Some(child.id)).await;
        assert!(matches!(result.unwrap_err(), Error::SelfParent { .. }));

        let result = set_parents(&db, &actor, child.id, Some(father.id), Some(young.id)).await;
        assert!(matches!(result.unwrap_err(), Error::Chronology { .. }));
        // Nothing was written
        assert!(get_bird(&db, &actor, child.id).await?.father_id.is_none());

        let updated = set_parents(&db, &actor, child.id, Some(father.id), None).await?;
        assert_eq!(updated.father_id, Some(father.id));
        assert_eq!(updated.mother_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_parent_of_other_tenant_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let bob = create_test_actor(&db, "bob").await?;
        let child = create_test_bird(&db, &alice, "C").await?;
        let foreign = create_test_bird(&db, &bob, "F").await?;

        let result = set_parents(&db, &alice, child.id, Some(foreign.id), None).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_birth_date_checked_against_parents() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let child = create_test_bird_born(&db, &actor, "C", date(2021, 4, 1)).await?;
        let mother = create_test_bird_born(&db, &actor, "M", date(2019, 4, 1)).await?;
        set_parents(&db, &actor, child.id, None, Some(mother.id)).await?;

        let result = update_bird(
            &db,
            &actor,
            child.id,
            BirdInput {
                date_of_birth: Some(date(2018, 1, 1)),
                ..BirdInput::with_ring("C")
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Chronology { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_birth_date_checked_against_children() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let father = create_test_bird_born(&db, &actor, "F", date(2019, 1, 1)).await?;
        let child = create_test_bird_born(&db, &actor, "C", date(2021, 1, 1)).await?;
        set_parents(&db, &actor, child.id, Some(father.id), None).await?;

        let later = BirdInput {
            date_of_birth: Some(date(2022, 1, 1)),
            ..BirdInput::with_ring("F")
        };
        let result = update_bird(&db, &actor, father.id, later).await;
        assert!(matches!(result.unwrap_err(), Error::Chronology { .. }));
        let stored = get_bird(&db, &actor, father.id).await?;
        assert_eq!(stored.date_of_birth, Some(date(2019, 1, 1)));

        let earlier = BirdInput {
            date_of_birth: Some(date(2018, 6, 1)),
            ..BirdInput::with_ring("F")
        };
        let updated = update_bird(&db, &actor, father.id, earlier).await?;
        assert_eq!(updated.date_of_birth, Some(date(2018, 6, 1)));
        Ok(())
    }

    #[tokio::test]
    async fn test_date_of_death() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let bird = create_test_bird_born(&db, &actor, "B", date(2020, 6, 1)).await?;

        let result = set_date_of_death(&db, &actor, bird.id, Some(date(2020, 5, 1))).await;
        assert!(matches!(result.unwrap_err(), Error::DeathBeforeBirth));

        let updated = set_date_of_death(&db, &actor, bird.id, Some(date(2020, 6, 1))).await?;
        assert_eq!(updated.date_of_death, Some(date(2020, 6, 1)));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_parent_nullifies_children() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let father = create_test_bird_with_gender(&db, &actor, "F", Gender::Male).await?;
        let child = create_test_bird(&db, &actor, "C").await?;
        set_parents(&db, &actor, child.id, Some(father.id), None).await?;
        let couple = create_test_couple_with(&db, &actor, Some(father.id), None).await?;

        delete_bird(&db, &actor, father.id).await?;

        let child = get_bird(&db, &actor, child.id).await?;
        assert!(child.father_id.is_none());
        let couple = BreedingCouple::find_by_id(couple.id).one(&db).await?.unwrap();
        assert!(couple.male_id.is_none());
        assert!(get_bird(&db, &actor, father.id).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_flags_only_touch_visible_birds() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let bob = create_test_actor(&db, "bob").await?;
        let a1 = create_test_bird(&db, &alice, "A-1").await?;
        let a2 = create_test_bird(&db, &alice, "A-2").await?;
        let b1 = create_test_bird(&db, &bob, "B-1").await?;

        let updated = mark_owned(&db, &alice, &[a1.id, a2.id, b1.id]).await?;
        assert_eq!(updated, 2);
        assert!(get_bird(&db, &alice, a1.id).await?.is_owned);
        assert!(!get_bird(&db, &bob, b1.id).await?.is_owned);

        let updated = mark_for_sale(&db, &alice, &[b1.id]).await?;
        assert_eq!(updated, 0);
        assert_eq!(mark_for_sale(&db, &alice, &[a2.id]).await?, 1);
        assert!(get_bird(&db, &alice, a2.id).await?.is_for_sale);
        Ok(())
    }

    #[tokio::test]
    async fn test_color_properties_must_be_visible() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let bob = create_test_actor(&db, "bob").await?;
        let foreign = catalog::create_color_property(&db, &bob, None, "Opaline", 1).await?;
        let bird = create_test_bird(&db, &alice, "A-1").await?;

        let result = set_color_properties(&db, &alice, bird.id, &[foreign.id], &[]).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_bird_by_ring_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let admin = create_test_superuser(&db, "admin").await?;
        let theirs = create_test_bird(&db, &alice, "R-1").await?;
        let own = create_test_bird(&db, &admin, "R-1").await?;

        assert_eq!(get_bird_by_ring(&db, &alice, "R-1").await?.id, theirs.id);
        assert_eq!(get_bird_by_ring(&db, &admin, "R-1").await?.id, own.id);
        assert!(get_bird_by_ring(&db, &alice, "nope").await.is_err());
        Ok(())
    }
}
