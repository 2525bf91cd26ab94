//! CSV export of the actor's records.
//!
//! Each exportable model declares its persisted fields in a static table,
//! in declaration order. Birds also have a richer, human-readable export.

use crate::{
    core::{
        genetics,
        scope::{self, TenantScoped},
        tenant::Actor,
    },
    entities::{Bird, Breeder, bird, breeder, breeding_couple, breeding_season, color_property, egg},
    errors::{Error, Result},
};
use sea_orm::{ActiveEnum, QueryOrder, prelude::*};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One exported column: header and how to render it.
pub type Field<M> = (&'static str, fn(&M) -> String);

/// A model with a static table of exported fields.
pub trait CsvRecord: Sized + 'static {
    /// Persisted fields in declaration order
    const FIELDS: &'static [Field<Self>];

    /// Primary key, used to pick selected rows
    fn id(&self) -> i64;
}

fn opt<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

impl CsvRecord for bird::Model {
    const FIELDS: &'static [Field<Self>] = &[
        ("id", |m| m.id.to_string()),
        ("user", |m| m.user_id.to_string()),
        ("ring_number", |m| m.ring_number.clone()),
        ("gender", |m| m.gender.to_value()),
        ("color", |m| m.color.map(|c| c.to_value()).unwrap_or_default()),
        ("date_of_birth", |m| opt(m.date_of_birth.as_ref())),
        ("date_of_death", |m| opt(m.date_of_death.as_ref())),
        ("father", |m| opt(m.father_id.as_ref())),
        ("mother", |m| opt(m.mother_id.as_ref())),
        ("breeder", |m| opt(m.breeder_id.as_ref())),
        ("owner", |m| opt(m.owner_id.as_ref())),
        ("is_owned", |m| m.is_owned.to_string()),
        ("is_for_sale", |m| m.is_for_sale.to_string()),
        ("notes", |m| m.notes.clone()),
        ("photo", |m| m.photo.clone()),
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

impl CsvRecord for breeder::Model {
    const FIELDS: &'static [Field<Self>] = &[
        ("id", |m| m.id.to_string()),
        ("user", |m| m.user_id.to_string()),
        ("first_name", |m| m.first_name.clone()),
        ("last_name", |m| m.last_name.clone()),
        ("breeding_reg_nr", |m| opt(m.breeding_reg_nr.as_ref())),
        ("address", |m| opt(m.address.as_ref())),
        ("phone_number", |m| opt(m.phone_number.as_ref())),
        ("notes", |m| m.notes.clone()),
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

impl CsvRecord for color_property::Model {
    const FIELDS: &'static [Field<Self>] = &[
        ("id", |m| m.id.to_string()),
        ("user", |m| m.user_id.to_string()),
        ("color_name", |m| m.color_name.clone()),
        ("rank", |m| m.rank.to_string()),
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

impl CsvRecord for breeding_season::Model {
    const FIELDS: &'static [Field<Self>] = &[
        ("id", |m| m.id.to_string()),
        ("user", |m| m.user_id.to_string()),
        ("starting_year", |m| m.starting_year.to_string()),
        ("starting_month", |m| m.starting_month.to_string()),
        ("label", |m| opt(m.label.as_ref())),
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

impl CsvRecord for breeding_couple::Model {
    const FIELDS: &'static [Field<Self>] = &[
        ("id", |m| m.id.to_string()),
        ("user", |m| m.user_id.to_string()),
        ("season", |m| m.season_id.to_string()),
        ("male", |m| opt(m.male_id.as_ref())),
        ("female", |m| opt(m.female_id.as_ref())),
        ("start_date", |m| opt(m.start_date.as_ref())),
        ("location", |m| opt(m.location_id.as_ref())),
        ("notes", |m| m.notes.clone()),
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

impl CsvRecord for egg::Model {
    const FIELDS: &'static [Field<Self>] = &[
        ("id", |m| m.id.to_string()),
        ("user", |m| m.user_id.to_string()),
        ("couple", |m| m.couple_id.to_string()),
        ("date", |m| m.date.to_string()),
        ("status", |m| m.status.to_value()),
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

/// Writes records as CSV with a header row of field names.
pub fn write_csv<M: CsvRecord>(records: &[M]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(M::FIELDS.iter().map(|(name, _)| *name))?;
    for record in records {
        writer.write_record(M::FIELDS.iter().map(|(_, render)| render(record)))?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

/// Exports the actor's rows of `E`, all of them or only the selected ids.
/// Selected ids the actor cannot see are left out.
pub async fn export_csv<E, C>(db: &C, actor: &Actor, selected: Option<&[i64]>) -> Result<Vec<u8>>
where
    E: TenantScoped,
    E::Model: CsvRecord,
    C: ConnectionTrait,
{
    let mut records = scope::scoped_find::<E>(actor).all(db).await?;
    if let Some(ids) = selected {
        let ids: HashSet<i64> = ids.iter().copied().collect();
        records.retain(|r| ids.contains(&r.id()));
    }
    records.sort_by_key(CsvRecord::id);
    debug!("Exporting {} {} rows", records.len(), E::NAME);
    write_csv(&records)
}

/// Columns of the human-readable bird export.
pub const BIRD_OVERVIEW_COLUMNS: [&str; 14] = [
    "Ring number",
    "Color",
    "Color code",
    "Color properties",
    "Split properties",
    "Father",
    "Mother",
    "Date of birth",
    "Breeder",
    "Owner",
    "Sex",
    "Owned",
    "For sale",
    "Notes",
];

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Human-readable export of the actor's birds ordered by ring number, all or
/// only the selected ids.
pub async fn export_birds_overview<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    selected: Option<&[i64]>,
) -> Result<Vec<u8>> {
    let mut birds = scope::scoped_find::<Bird>(actor)
        .order_by_asc(bird::Column::RingNumber)
        .all(db)
        .await?;
    if let Some(ids) = selected {
        let ids: HashSet<i64> = ids.iter().copied().collect();
        birds.retain(|b| ids.contains(&b.id));
    }

    let genetics = genetics::load_genetics_many(db, &birds).await?;
    let parent_ids: Vec<i64> = birds
        .iter()
        .flat_map(|b| [b.father_id, b.mother_id])
        .flatten()
        .collect();
    let rings: HashMap<i64, String> = Bird::find()
        .filter(bird::Column::Id.is_in(parent_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b.ring_number))
        .collect();
    let breeders: HashMap<i64, String> = scope::scoped_find::<Breeder>(actor)
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b.to_string()))
        .collect();
    let lookup = |map: &HashMap<i64, String>, id: Option<i64>| {
        id.and_then(|id| map.get(&id).cloned()).unwrap_or_default()
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(BIRD_OVERVIEW_COLUMNS)?;
    for bird in &birds {
        let genes = genetics.get(&bird.id).cloned().unwrap_or_default();
        writer.write_record([
            bird.ring_number.clone(),
            genes.descriptive_color(),
            bird.color.map(bird::PrimaryColor::code).unwrap_or_default(),
            genes.color_properties_string(),
            genes.split_properties_string(),
            lookup(&rings, bird.father_id),
            lookup(&rings, bird.mother_id),
            bird.date_of_birth
                .map(|d| d.format("%d-%m-%Y").to_string())
                .unwrap_or_default(),
            lookup(&breeders, bird.breeder_id),
            lookup(&breeders, bird.owner_id),
            bird.gender.label().to_string(),
            yes_no(bird.is_owned).to_string(),
            yes_no(bird.is_for_sale).to_string(),
            bird.notes.clone(),
        ])?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{bird as birds, catalog};
    use crate::entities::{Breeder as BreederEntity, ColorProperty};
    use crate::test_utils::*;
    use chrono::NaiveDate;

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_field_tables_follow_declaration_order() {
        let names: Vec<_> = color_property::Model::FIELDS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["id", "user", "color_name", "rank"]);
        assert_eq!(bird::Model::FIELDS.len(), 15);
        assert_eq!(bird::Model::FIELDS[2].0, "ring_number");
    }

    #[test]
    fn test_write_csv_quotes_commas() {
        let property = color_property::Model {
            id: 3,
            user_id: 1,
            color_name: "Spangle, double factor".to_string(),
            rank: 4,
        };
        let out = lines(&write_csv(&[property]).unwrap());
        assert_eq!(out, vec!["id,user,color_name,rank", "3,1,\"Spangle, double factor\",4"]);
    }

    #[tokio::test]
    async fn test_export_is_scoped_and_selectable() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let bob = create_test_actor(&db, "bob").await?;
        let a = catalog::create_color_property(&db, &alice, None, "Opaline", 1).await?;
        catalog::create_color_property(&db, &alice, None, "Ino", 2).await?;
        let foreign = catalog::create_color_property(&db, &bob, None, "Spangle", 1).await?;

        let all = lines(&export_csv::<ColorProperty, _>(&db, &alice, None).await?);
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|l| !l.contains("Spangle")));

        let picked = lines(&export_csv::<ColorProperty, _>(&db, &alice, Some(&[a.id, foreign.id][..])).await?);
        assert_eq!(picked.len(), 2);
        assert!(picked[1].contains("Opaline"));

        let breeders = lines(&export_csv::<BreederEntity, _>(&db, &bob, None).await?);
        assert_eq!(breeders.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_birds_overview_columns() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let opaline = catalog::create_color_property(&db, &actor, None, "Opaline", 1).await?;
        let ino = catalog::create_color_property(&db, &actor, None, "Ino", 2).await?;
        let breeder = catalog::create_breeder(
            &db,
            &actor,
            catalog::BreederInput {
                first_name: "Henk".to_string(),
                last_name: "Vries".to_string(),
                ..Default::default()
            },
        )
        .await?;
        let father = create_test_bird(&db, &actor, "5TJJ-1-2019").await?;
        let bird = birds::create_bird(
            &db,
            &actor,
            birds::BirdInput {
                gender: bird::Gender::Female,
                color: Some(bird::PrimaryColor::SkyBlue),
                date_of_birth: NaiveDate::from_ymd_opt(2021, 4, 21),
                breeder_id: Some(breeder.id),
                is_owned: true,
                ..birds::BirdInput::with_ring("5TJJ-2-2021")
            },
        )
        .await?;
        birds::set_parents(&db, &actor, bird.id, Some(father.id), None).await?;
        birds::set_color_properties(&db, &actor, bird.id, &[opaline.id], &[ino.id]).await?;

        let out = lines(&export_birds_overview(&db, &actor, Some(&[bird.id][..])).await?);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], BIRD_OVERVIEW_COLUMNS.join(","));
        assert_eq!(
            out[1],
            "5TJJ-2-2021,Opaline Sky Blue / Ino,18.004.001,Opaline,Ino,5TJJ-1-2019,,21-04-2021,\"Vries, Henk (-)\",,Female,Yes,No,"
        );
        Ok(())
    }
}
