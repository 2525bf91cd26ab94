//! Access scope - Per-tenant visibility and ownership rules.
//!
//! Every read, write and choice list goes through this module. Non-superusers
//! only ever see their own rows; a row owned by someone else behaves exactly
//! like a row that does not exist. Superusers see everything.

use crate::{
    core::tenant::Actor,
    entities::{
        Bird, Breeder, BreedingCouple, BreedingSeason, ColorProperty, Location, User, bird,
        breeder, breeding_couple, breeding_season, color_property, egg, import_file, location,
        user,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Select, prelude::*};
use std::collections::HashMap;

/// Name of the owning-user field on every tenant-scoped entity.
pub const OWNER_FIELD: &str = "user";

/// An entity that carries an owning user.
pub trait TenantScoped: EntityTrait {
    /// Entity name used in not-found errors.
    const NAME: &'static str;

    /// Column holding the owning user's id.
    fn owner_column() -> Self::Column;

    /// Narrows a query to rows owned by `user_id`.
    fn restrict(query: Select<Self>, user_id: i64) -> Select<Self> {
        query.filter(Self::owner_column().eq(user_id))
    }
}

macro_rules! tenant_scoped {
    ($($module:ident => $name:literal),* $(,)?) => {
        $(
            impl TenantScoped for $module::Entity {
                const NAME: &'static str = $name;

                fn owner_column() -> Self::Column {
                    $module::Column::UserId
                }
            }
        )*
    };
}

tenant_scoped! {
    bird => "bird",
    breeder => "breeder",
    color_property => "color property",
    breeding_season => "breeding season",
    breeding_couple => "breeding couple",
    location => "location",
    import_file => "import file",
}

// Eggs are edited inline under their couple, so they are also filtered
// through the couple's owner.
impl TenantScoped for egg::Entity {
    const NAME: &'static str = "egg";

    fn owner_column() -> Self::Column {
        egg::Column::UserId
    }

    fn restrict(query: Select<Self>, user_id: i64) -> Select<Self> {
        query
            .filter(egg::Column::UserId.eq(user_id))
            .inner_join(BreedingCouple)
            .filter(breeding_couple::Column::UserId.eq(user_id))
    }
}

/// Returns `query` unchanged for superusers, otherwise only the actor's rows.
#[must_use]
pub fn scope_query<E: TenantScoped>(actor: &Actor, query: Select<E>) -> Select<E> {
    if actor.is_superuser {
        query
    } else {
        E::restrict(query, actor.user_id)
    }
}

/// All rows of `E` visible to the actor.
#[must_use]
pub fn scoped_find<E: TenantScoped>(actor: &Actor) -> Select<E> {
    scope_query(actor, E::find())
}

/// Fetches one row by id, or [`Error::NotFound`] when it is absent or owned
/// by another tenant.
pub async fn find_visible<E, C>(db: &C, actor: &Actor, id: i64) -> Result<E::Model>
where
    E: TenantScoped,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    C: ConnectionTrait,
{
    scope_query(actor, E::find_by_id(id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(E::NAME, id))
}

/// Like [`find_visible`] for an optional reference.
pub async fn find_visible_opt<E, C>(db: &C, actor: &Actor, id: Option<i64>) -> Result<Option<E::Model>>
where
    E: TenantScoped,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    C: ConnectionTrait,
{
    match id {
        Some(id) => find_visible::<E, C>(db, actor, id).await.map(Some),
        None => Ok(None),
    }
}

/// Owning user to store on create or update.
///
/// A non-superuser always writes as themselves, whatever was submitted.
/// Superusers may write on behalf of another user and default to themselves.
#[must_use]
pub const fn owner_for_write(actor: &Actor, submitted: Option<i64>) -> i64 {
    if actor.is_superuser {
        match submitted {
            Some(user_id) => user_id,
            None => actor.user_id,
        }
    } else {
        actor.user_id
    }
}

/// The subset of `fields` the actor may edit; non-superusers never see the
/// owning-user field.
#[must_use]
pub fn editable_fields(actor: &Actor, fields: &[&'static str]) -> Vec<&'static str> {
    fields
        .iter()
        .copied()
        .filter(|field| actor.is_superuser || *field != OWNER_FIELD)
        .collect()
}

/// A relation field whose candidates are offered to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceField {
    Father,
    Mother,
    /// Couple male, limited to male birds
    Male,
    /// Couple female, limited to female birds
    Female,
    Breeder,
    Owner,
    ColorProperty,
    SplitProperty,
    Season,
    Couple,
    Location,
    /// The owning user itself; not narrowed by ownership
    User,
}

/// One selectable candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

/// Candidates for a relation field, narrowed to the actor's rows unless the
/// actor is a superuser.
pub async fn scope_choice_list<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    field: ChoiceField,
) -> Result<Vec<Choice>> {
    let choices = match field {
        ChoiceField::Father | ChoiceField::Mother | ChoiceField::Male | ChoiceField::Female => {
            let mut query = scoped_find::<Bird>(actor).order_by_asc(bird::Column::RingNumber);
            if field == ChoiceField::Male {
                query = query.filter(bird::Column::Gender.eq(bird::Gender::Male));
            } else if field == ChoiceField::Female {
                query = query.filter(bird::Column::Gender.eq(bird::Gender::Female));
            }
            query
                .all(db)
                .await?
                .into_iter()
                .map(|b| Choice {
                    id: b.id,
                    label: b.ring_number,
                })
                .collect()
        }
        ChoiceField::Breeder | ChoiceField::Owner => scoped_find::<Breeder>(actor)
            .order_by_asc(breeder::Column::LastName)
            .all(db)
            .await?
            .into_iter()
            .map(|b| Choice {
                id: b.id,
                label: b.to_string(),
            })
            .collect(),
        ChoiceField::ColorProperty | ChoiceField::SplitProperty => {
            scoped_find::<ColorProperty>(actor)
                .order_by_asc(color_property::Column::Rank)
                .order_by_asc(color_property::Column::Id)
                .all(db)
                .await?
                .into_iter()
                .map(|p| Choice {
                    id: p.id,
                    label: p.color_name,
                })
                .collect()
        }
        ChoiceField::Season => scoped_find::<BreedingSeason>(actor)
            .order_by_desc(breeding_season::Column::StartingYear)
            .order_by_desc(breeding_season::Column::StartingMonth)
            .all(db)
            .await?
            .into_iter()
            .map(|s| Choice {
                id: s.id,
                label: s.to_string(),
            })
            .collect(),
        ChoiceField::Couple => couple_choices(db, actor).await?,
        ChoiceField::Location => scoped_find::<Location>(actor)
            .order_by_asc(location::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(|l| Choice {
                id: l.id,
                label: l.name,
            })
            .collect(),
        ChoiceField::User => User::find()
            .order_by_asc(user::Column::Username)
            .all(db)
            .await?
            .into_iter()
            .map(|u| Choice {
                id: u.id,
                label: u.username,
            })
            .collect(),
    };
    Ok(choices)
}

async fn couple_choices<C: ConnectionTrait>(db: &C, actor: &Actor) -> Result<Vec<Choice>> {
    let couples = scoped_find::<BreedingCouple>(actor)
        .order_by_desc(breeding_couple::Column::Id)
        .all(db)
        .await?;
    let bird_ids: Vec<i64> = couples
        .iter()
        .flat_map(|c| [c.male_id, c.female_id])
        .flatten()
        .collect();
    let rings: HashMap<i64, String> = Bird::find()
        .select_only()
        .column(bird::Column::Id)
        .column(bird::Column::RingNumber)
        .filter(bird::Column::Id.is_in(bird_ids))
        .into_tuple::<(i64, String)>()
        .all(db)
        .await?
        .into_iter()
        .collect();
    let ring = |id: Option<i64>| {
        id.and_then(|id| rings.get(&id).cloned())
            .unwrap_or_else(|| "?".to_string())
    };

    Ok(couples
        .iter()
        .map(|c| Choice {
            id: c.id,
            label: format!(
                "Breeding couple; M: {}, F: {}",
                ring(c.male_id),
                ring(c.female_id)
            ),
        })
        .collect())
}
