//! Import pipeline - Maps spreadsheet rows onto birds, breeders and colors.
//!
//! Rows are matched on the Dutch headers used by breeders' own spreadsheets.
//! Every field is applied on its own and best-effort: a field that cannot be
//! understood is left alone, logged, and reported in the row's
//! [`RowOutcome`]. Only an unsupported file format aborts an import, and it
//! does so before anything is written.

use crate::{
    core::{
        bird as birds, pedigree,
        rows::{self, ImportFormat, ImportRow},
        tenant::Actor,
    },
    entities::{
        Breeder, ColorProperty, ImportFile, bird,
        bird::{Gender, ParentRole, PrimaryColor},
        breeder, color_property, import_file,
    },
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::fmt::Write as _;
use tracing::{info, instrument, warn};

/// Header of the ring number column; rows without it are skipped.
pub const RING_NUMBER: &str = "ringnummer";
pub const MOTHER: &str = "moeder";
pub const FATHER: &str = "vader";
pub const GENDER: &str = "geslacht";
pub const BORN: &str = "geboren";
pub const BREEDER: &str = "kweker";
pub const OWNED: &str = "in bezit";
pub const OWNER: &str = "eigenaar";
pub const COLOR: &str = "kleur";

const FEMALE_TOKEN: &str = "pop";
const MALE_TOKEN: &str = "man";
const UNKNOWN_TOKEN: &str = "onbekend";
const YES_TOKEN: &str = "ja";
/// Birth dates are written day-month-year, e.g. `21-04-2018`
const DATE_FORMAT: &str = "%d-%m-%Y";

/// What happened to one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Every field present was applied
    Imported { ring_number: String },
    /// The bird was stored but some fields were left alone
    Partial {
        ring_number: String,
        warnings: Vec<String>,
    },
    /// Nothing was stored for this row
    Skipped { reason: String },
}

/// Result of importing one uploaded file.
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Bookkeeping record of the upload
    pub file: import_file::Model,
    /// One outcome per data row, in file order
    pub outcomes: Vec<RowOutcome>,
}

impl ImportReport {
    #[must_use]
    pub fn imported(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Imported { .. }))
    }

    #[must_use]
    pub fn partial(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Partial { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&RowOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Imports an uploaded `.csv` or `.xlsx` file for the actor.
///
/// The format is checked before anything is written. The upload is recorded
/// as an [`import_file::Model`] whose notes summarize the outcome and which is
/// marked completed once every row has been processed.
#[instrument(skip(db, bytes), fields(size = bytes.len()))]
pub async fn import_file(
    db: &DatabaseConnection,
    actor: &Actor,
    file_name: &str,
    bytes: &[u8],
) -> Result<ImportReport> {
    actor.ensure_active()?;
    let format = ImportFormat::from_file_name(file_name)?;

    let record = import_file::ActiveModel {
        user_id: Set(actor.user_id),
        file_name: Set(file_name.to_string()),
        uploaded_at: Set(Utc::now()),
        completed: Set(false),
        notes: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let data = match rows::read_rows(format, bytes) {
        Ok(data) => data,
        Err(e) => {
            warn!("Could not read {file_name}: {e}");
            let mut failed: import_file::ActiveModel = record.into();
            failed.notes = Set(Some(format!("Could not read file: {e}")));
            failed.update(db).await?;
            return Err(e);
        }
    };

    let outcomes = import_rows(db, actor, &data).await?;

    let mut done: import_file::ActiveModel = record.into();
    done.completed = Set(true);
    done.notes = Set(Some(summarize(&outcomes)));
    let file = done.update(db).await?;

    let report = ImportReport { file, outcomes };
    info!(
        "Imported {file_name}: {} rows, {} partial, {} skipped",
        report.outcomes.len(),
        report.partial(),
        report.skipped()
    );
    Ok(report)
}

fn summarize(outcomes: &[RowOutcome]) -> String {
    let mut imported = 0;
    let mut lines = String::new();
    for outcome in outcomes {
        match outcome {
            RowOutcome::Imported { .. } => imported += 1,
            RowOutcome::Partial {
                ring_number,
                warnings,
            } => {
                imported += 1;
                for warning in warnings {
                    let _ = writeln!(lines, "{ring_number}: {warning}");
                }
            }
            RowOutcome::Skipped { reason } => {
                let _ = writeln!(lines, "skipped row: {reason}");
            }
        }
    }
    format!("{imported} of {} rows imported\n{lines}", outcomes.len())
        .trim_end()
        .to_string()
}

/// Applies every row to the actor's own records.
pub async fn import_rows<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    rows: &[ImportRow],
) -> Result<Vec<RowOutcome>> {
    let mut outcomes = Vec::with_capacity(rows.len());
    for row in rows {
        outcomes.push(import_row(db, actor, row).await?);
    }
    Ok(outcomes)
}

/// Applies one row. Database failures abort; anything about the row's
/// content only ends up as a warning.
pub async fn import_row<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    row: &ImportRow,
) -> Result<RowOutcome> {
    let Some(ring_number) = row.get(RING_NUMBER).map(|r| r.trim()).filter(|r| !r.is_empty())
    else {
        return Ok(RowOutcome::Skipped {
            reason: format!("no {RING_NUMBER}"),
        });
    };
    let user_id = actor.user_id;
    let (bird, _) = birds::get_or_create_by_ring(db, user_id, ring_number, Gender::Unknown).await?;
    let mut warnings = Vec::new();
    let mut active: bird::ActiveModel = bird.clone().into();
    let mut current = bird;

    if let Some(text) = row.get(GENDER) {
        if let Some(gender) = parse_gender(text) {
            active.gender = Set(gender);
            current.gender = gender;
        }
    }

    let previous_birth = current.date_of_birth;
    if let Some(text) = row.get(BORN) {
        match NaiveDate::parse_from_str(text.trim(), DATE_FORMAT) {
            Ok(date) => current.date_of_birth = Some(date),
            Err(e) => note(&mut warnings, ring_number, format!("birth date '{text}' not understood: {e}")),
        }
    }

    // Parents are checked against the birth date from this same row
    let mut assigned = Vec::new();
    for (key, role, gender) in [
        (MOTHER, ParentRole::Mother, Gender::Female),
        (FATHER, ParentRole::Father, Gender::Unknown),
    ] {
        let Some(parent_ring) = row.get(key).map(|r| r.trim()) else {
            continue;
        };
        let (parent, _) = birds::get_or_create_by_ring(db, user_id, parent_ring, gender).await?;
        match pedigree::validate_parent_assignment(&current, &parent, role) {
            Ok(()) => assigned.push((role, parent)),
            Err(e) => note(&mut warnings, ring_number, format!("{} not set: {e}", role.as_str())),
        }
    }

    // A new birth date must also fit the lifespan, the parents this row
    // leaves in place and any children
    if current.date_of_birth != previous_birth {
        let replaced: Vec<ParentRole> = assigned.iter().map(|(role, _)| *role).collect();
        match birds::check_birth_date(db, &current, &replaced).await {
            Ok(()) => active.date_of_birth = Set(current.date_of_birth),
            Err(e) if e.is_validation() => {
                note(&mut warnings, ring_number, format!("birth date not set: {e}"));
                current.date_of_birth = previous_birth;
                assigned.retain(|(role, parent)| {
                    match pedigree::validate_parent_assignment(&current, parent, *role) {
                        Ok(()) => true,
                        Err(e) => {
                            note(&mut warnings, ring_number, format!("{} not set: {e}", role.as_str()));
                            false
                        }
                    }
                });
            }
            Err(e) => return Err(e),
        }
    }
    for (role, parent) in &assigned {
        match role {
            ParentRole::Father => active.father_id = Set(Some(parent.id)),
            ParentRole::Mother => active.mother_id = Set(Some(parent.id)),
        }
    }

    if let Some(text) = row.get(BREEDER) {
        if let Some(breeder) = breeder_for(db, user_id, ring_number, text).await? {
            active.breeder_id = Set(Some(breeder.id));
        }
    }

    if row
        .get(OWNED)
        .is_some_and(|text| text.trim().eq_ignore_ascii_case(YES_TOKEN))
    {
        active.is_owned = Set(true);
    }

    if let Some(text) = row.get(OWNER) {
        let candidates = Breeder::find()
            .filter(breeder::Column::UserId.eq(user_id))
            .all(db)
            .await?;
        match match_owner(&candidates, text) {
            Some(owner) => active.owner_id = Set(Some(owner)),
            None => note(&mut warnings, ring_number, format!("no single owner matches '{text}'")),
        }
    }

    if let Some(text) = row.get(COLOR) {
        let color = match_primary_color(text);
        if color.is_some() {
            active.color = Set(color);
        }
        let properties = ColorProperty::find()
            .filter(color_property::Column::UserId.eq(user_id))
            .order_by_asc(color_property::Column::Rank)
            .all(db)
            .await?;
        let matched = match_color_properties(&properties, text);
        for property in &matched {
            birds::add_color_property(db, current.id, property.id).await?;
        }
        if matched.is_empty() && color.is_none() {
            note(&mut warnings, ring_number, format!("color '{text}' not recognized"));
        }
    }

    if active.is_changed() {
        active.update(db).await?;
    }

    let ring_number = ring_number.to_string();
    Ok(if warnings.is_empty() {
        RowOutcome::Imported { ring_number }
    } else {
        RowOutcome::Partial {
            ring_number,
            warnings,
        }
    })
}

fn note(warnings: &mut Vec<String>, ring_number: &str, warning: String) {
    warn!("Import of {ring_number}: {warning}");
    warnings.push(warning);
}

/// Gender from free text; anything but the two known words is ignored.
fn parse_gender(text: &str) -> Option<Gender> {
    let text = text.trim().to_lowercase();
    if text == FEMALE_TOKEN {
        Some(Gender::Female)
    } else if text == MALE_TOKEN {
        Some(Gender::Male)
    } else {
        None
    }
}

/// Splits `"last, first"`; without a comma everything is the last name.
fn split_name(text: &str) -> (&str, &str) {
    match text.split_once(',') {
        Some((last, first)) => (last.trim(), first.trim()),
        None => (text.trim(), ""),
    }
}

/// Gets or creates the breeder named in `text`, keyed by the registration
/// number that opens the ring number. Names are only used on creation.
async fn breeder_for<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    ring_number: &str,
    text: &str,
) -> Result<Option<breeder::Model>> {
    if text.to_lowercase().contains(UNKNOWN_TOKEN) {
        return Ok(None);
    }
    let registration = ring_number.split('-').next().unwrap_or(ring_number);

    let existing = Breeder::find()
        .filter(breeder::Column::UserId.eq(user_id))
        .filter(breeder::Column::BreedingRegNr.eq(registration))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(existing);
    }

    let (last_name, first_name) = split_name(text);
    let breeder = breeder::ActiveModel {
        user_id: Set(user_id),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        breeding_reg_nr: Set(Some(registration.to_string())),
        address: Set(None),
        phone_number: Set(None),
        notes: Set(String::new()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(Some(breeder))
}

/// Picks the owner named in `text` among `breeders`.
///
/// Breeders whose last name contains the text's last-name part are
/// candidates; several candidates are narrowed by the first-name part. Only a
/// single remaining candidate is a match.
fn match_owner(breeders: &[breeder::Model], text: &str) -> Option<i64> {
    let (last, first) = split_name(text);
    let (last, first) = (last.to_lowercase(), first.to_lowercase());

    let mut candidates: Vec<&breeder::Model> = breeders
        .iter()
        .filter(|b| b.last_name.to_lowercase().contains(&last))
        .collect();
    if candidates.len() > 1 && !first.is_empty() {
        candidates.retain(|b| b.first_name.to_lowercase().contains(&first));
    }
    match candidates.as_slice() {
        [only] => Some(only.id),
        _ => None,
    }
}

/// First primary color whose label occurs in `text`.
fn match_primary_color(text: &str) -> Option<PrimaryColor> {
    let text = text.to_lowercase();
    PrimaryColor::ALL
        .into_iter()
        .find(|color| text.contains(&color.label().to_lowercase()))
}

/// Every property whose name occurs in `text`.
fn match_color_properties<'a>(
    properties: &'a [color_property::Model],
    text: &str,
) -> Vec<&'a color_property::Model> {
    let text = text.to_lowercase();
    properties
        .iter()
        .filter(|p| text.contains(&p.color_name.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::core::{catalog, genetics};
    use crate::entities::Bird;
    use crate::errors::Error;
    use crate::test_utils::*;

    fn row(fields: &[(&str, &str)]) -> ImportRow {
        fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn breeder(id: i64, first: &str, last: &str) -> breeder::Model {
        breeder::Model {
            id,
            user_id: 1,
            first_name: first.to_string(),
            last_name: last.to_string(),
            breeding_reg_nr: None,
            address: None,
            phone_number: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender("Pop"), Some(Gender::Female));
        assert_eq!(parse_gender("MAN"), Some(Gender::Male));
        assert_eq!(parse_gender("onbekend"), None);
    }

    #[test]
    fn test_match_owner_narrows_by_first_name() {
        let breeders = vec![
            breeder(1, "Henk", "de Vries"),
            breeder(2, "Jan", "de Vries"),
            breeder(3, "Piet", "Bakker"),
        ];
        assert_eq!(match_owner(&breeders, "Bakker"), Some(3));
        assert_eq!(match_owner(&breeders, "vries, jan"), Some(2));
        // Two candidates and nothing to narrow with
        assert_eq!(match_owner(&breeders, "de Vries"), None);
        assert_eq!(match_owner(&breeders, "Jansen"), None);
    }

    #[test]
    fn test_primary_color_first_match_wins() {
        assert_eq!(match_primary_color("Opaline Sky Blue"), Some(PrimaryColor::SkyBlue));
        assert_eq!(match_primary_color("dark green split ino"), Some(PrimaryColor::DarkGreen));
        assert_eq!(match_primary_color("Grijs"), None);
    }

    #[tokio::test]
    async fn test_import_attaches_matching_color_property() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let grijs = catalog::create_color_property(&db, &actor, None, "Grijs", 1).await?;
        catalog::create_color_property(&db, &actor, None, "Opaline", 2).await?;

        let outcomes = import_rows(
            &db,
            &actor,
            &[row(&[(RING_NUMBER, "5TJJ-81-2018"), (COLOR, "Grijs")])],
        )
        .await?;
        assert_eq!(
            outcomes,
            vec![RowOutcome::Imported {
                ring_number: "5TJJ-81-2018".to_string()
            }]
        );

        let bird = birds::get_bird_by_ring(&db, &actor, "5TJJ-81-2018").await?;
        let genetics = genetics::load_genetics(&db, &bird).await?;
        assert_eq!(genetics.visible, vec![grijs]);
        assert!(genetics.split.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_import_full_row() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let data = row(&[
            (RING_NUMBER, "5TJJ-81-2018"),
            (MOTHER, "5TJJ-12-2016"),
            (FATHER, "5TJJ-13-2016"),
            (GENDER, "Man"),
            (BORN, "21-04-2018"),
            (BREEDER, "Vries, Henk"),
            (OWNED, "Ja"),
            (OWNER, "Vries"),
        ]);
        let outcomes = import_rows(&db, &actor, &[data]).await?;
        assert!(matches!(outcomes[0], RowOutcome::Imported { .. }));

        let bird = birds::get_bird_by_ring(&db, &actor, "5TJJ-81-2018").await?;
        assert_eq!(bird.gender, Gender::Male);
        assert_eq!(bird.date_of_birth, NaiveDate::from_ymd_opt(2018, 4, 21));
        assert!(bird.is_owned);

        let mother = birds::get_bird(&db, &actor, bird.mother_id.unwrap()).await?;
        assert_eq!(mother.ring_number, "5TJJ-12-2016");
        assert_eq!(mother.gender, Gender::Female);
        let father = birds::get_bird(&db, &actor, bird.father_id.unwrap()).await?;
        assert_eq!(father.gender, Gender::Unknown);

        let breeder = Breeder::find_by_id(bird.breeder_id.unwrap()).one(&db).await?.unwrap();
        assert_eq!(breeder.last_name, "Vries");
        assert_eq!(breeder.first_name, "Henk");
        assert_eq!(breeder.breeding_reg_nr.as_deref(), Some("5TJJ"));
        assert_eq!(bird.owner_id, Some(breeder.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_import_fields_are_best_effort() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let data = row(&[
            (RING_NUMBER, "A-1"),
            (BORN, "2018/04/21"),
            (BREEDER, "Onbekend"),
            (OWNED, "nee"),
            (GENDER, "?"),
        ]);
        let outcomes = import_rows(&db, &actor, &[data, row(&[(MOTHER, "A-2")])]).await?;

        let RowOutcome::Partial { warnings, .. } = &outcomes[0] else {
            panic!("expected a partial import, got {:?}", outcomes[0]);
        };
        assert_eq!(warnings.len(), 1);
        assert!(matches!(outcomes[1], RowOutcome::Skipped { .. }));

        let bird = birds::get_bird_by_ring(&db, &actor, "A-1").await?;
        assert!(bird.date_of_birth.is_none());
        assert!(bird.breeder_id.is_none());
        assert!(!bird.is_owned);
        assert_eq!(bird.gender, Gender::Unknown);
        // The skipped row did not create its mother
        assert!(birds::get_bird_by_ring(&db, &actor, "A-2").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_import_keeps_existing_breeder_name() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        import_rows(&db, &actor, &[row(&[(RING_NUMBER, "NL1-1"), (BREEDER, "Vries, Henk")])]).await?;
        import_rows(&db, &actor, &[row(&[(RING_NUMBER, "NL1-2"), (BREEDER, "Jansen, Jan")])]).await?;

        let breeders = catalog::list_breeders(&db, &actor).await?;
        assert_eq!(breeders.len(), 1);
        assert_eq!(breeders[0].last_name, "Vries");
        Ok(())
    }

    #[tokio::test]
    async fn test_import_rejects_parent_born_later() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        import_rows(&db, &actor, &[row(&[(RING_NUMBER, "M-1"), (BORN, "01-01-2020")])]).await?;

        let outcomes = import_rows(
            &db,
            &actor,
            &[row(&[(RING_NUMBER, "C-1"), (BORN, "01-01-2019"), (MOTHER, "M-1")])],
        )
        .await?;
        assert!(matches!(outcomes[0], RowOutcome::Partial { .. }));
        let child = birds::get_bird_by_ring(&db, &actor, "C-1").await?;
        assert!(child.mother_id.is_none());
        assert_eq!(child.date_of_birth, NaiveDate::from_ymd_opt(2019, 1, 1));
        Ok(())
    }

    #[tokio::test]
    async fn test_import_birth_date_after_death_is_not_stored() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let died = NaiveDate::from_ymd_opt(2019, 1, 1);
        let input = birds::BirdInput {
            date_of_death: died,
            ..birds::BirdInput::with_ring("A-1")
        };
        birds::create_bird(&db, &actor, input).await?;

        let outcomes =
            import_rows(&db, &actor, &[row(&[(RING_NUMBER, "A-1"), (BORN, "01-01-2020")])]).await?;

        let RowOutcome::Partial { warnings, .. } = &outcomes[0] else {
            panic!("expected a warning, got {:?}", outcomes[0]);
        };
        assert!(warnings[0].starts_with("birth date not set"));
        let bird = birds::get_bird_by_ring(&db, &actor, "A-1").await?;
        assert_eq!(bird.date_of_birth, None);
        assert_eq!(bird.date_of_death, died);
        Ok(())
    }

    #[tokio::test]
    async fn test_import_birth_date_checked_against_stored_parent() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let previous = NaiveDate::from_ymd_opt(2021, 1, 1);
        import_rows(
            &db,
            &actor,
            &[
                row(&[(RING_NUMBER, "M-1"), (BORN, "01-01-2020")]),
                row(&[(RING_NUMBER, "C-1"), (BORN, "01-01-2021"), (MOTHER, "M-1")]),
            ],
        )
        .await?;

        let outcomes =
            import_rows(&db, &actor, &[row(&[(RING_NUMBER, "C-1"), (BORN, "01-01-2019")])]).await?;

        assert!(matches!(outcomes[0], RowOutcome::Partial { .. }));
        let child = birds::get_bird_by_ring(&db, &actor, "C-1").await?;
        let mother = birds::get_bird_by_ring(&db, &actor, "M-1").await?;
        assert_eq!(child.mother_id, Some(mother.id));
        assert_eq!(child.date_of_birth, previous);
        Ok(())
    }

    #[tokio::test]
    async fn test_import_new_parent_kept_when_birth_date_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        import_rows(
            &db,
            &actor,
            &[
                row(&[(RING_NUMBER, "F-1"), (BORN, "01-01-2018")]),
                row(&[(RING_NUMBER, "C-1"), (BORN, "01-01-2021")]),
                row(&[(RING_NUMBER, "K-1"), (BORN, "01-01-2022"), (FATHER, "C-1")]),
            ],
        )
        .await?;

        // The later birth date would make C-1 younger than its own child
        let outcomes = import_rows(
            &db,
            &actor,
            &[row(&[(RING_NUMBER, "C-1"), (BORN, "01-01-2023"), (FATHER, "F-1")])],
        )
        .await?;

        assert!(matches!(outcomes[0], RowOutcome::Partial { .. }));
        let bird = birds::get_bird_by_ring(&db, &actor, "C-1").await?;
        let father = birds::get_bird_by_ring(&db, &actor, "F-1").await?;
        assert_eq!(bird.date_of_birth, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(bird.father_id, Some(father.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_import_stays_in_actor_tenant() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let bob = create_test_actor(&db, "bob").await?;
        catalog::create_color_property(&db, &bob, None, "Grijs", 1).await?;
        let existing = create_test_bird(&db, &bob, "5TJJ-81-2018").await?;

        import_rows(&db, &alice, &[row(&[(RING_NUMBER, "5TJJ-81-2018"), (COLOR, "Grijs")])]).await?;

        let imported = birds::get_bird_by_ring(&db, &alice, "5TJJ-81-2018").await?;
        assert_ne!(imported.id, existing.id);
        assert!(genetics::load_genetics(&db, &imported).await?.visible.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_unsupported_format_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let result = import_file(&db, &actor, "birds.ods", b"ringnummer\nA-1\n").await;
        assert!(matches!(result.unwrap_err(), Error::UnsupportedFormat { .. }));

        assert!(ImportFile::find().all(&db).await?.is_empty());
        assert!(Bird::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_import_csv_file_is_recorded() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let csv = "Ringnummer,Geslacht,Geboren\nA-1,pop,01-02-2021\nA-2,man,gisteren\n,pop,\n";

        let report = import_file(&db, &actor, "vogels.csv", csv.as_bytes()).await?;
        assert_eq!(report.imported(), 1);
        assert_eq!(report.partial(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(report.file.completed);
        assert_eq!(report.file.user_id, actor.user_id);
        let notes = report.file.notes.unwrap();
        assert!(notes.starts_with("2 of 3 rows imported"));
        assert!(notes.contains("A-2: birth date 'gisteren'"));
        Ok(())
    }
}
