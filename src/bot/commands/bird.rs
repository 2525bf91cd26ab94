//! Bird commands - registration, lineage, color properties and the pedigree
//! view. Birds are addressed by ring number; lookups go through the access
//! scope so a user can only ever reach their own birds.

use crate::core::pedigree::DisplayNode;
use crate::entities::bird::Gender;
use std::fmt::Write;

/// Parent link after `/bird parents`: a given ring replaces it, `clear`
/// removes it and otherwise the current link stays.
const fn chosen_parent(current: Option<i64>, given: Option<i64>, clear: bool) -> Option<i64> {
    match (given, clear) {
        (Some(id), _) => Some(id),
        (None, true) => None,
        (None, false) => current,
    }
}

const fn gender_symbol(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "♂",
        Gender::Female => "♀",
        Gender::Unknown => "?",
    }
}

fn write_node(out: &mut String, node: &DisplayNode, prefix: &str, depth: usize) -> std::fmt::Result {
    let indent = "  ".repeat(depth);
    let born = node
        .date_of_birth
        .map(|d| format!(" ({})", d.format("%d-%m-%Y")))
        .unwrap_or_default();
    writeln!(
        out,
        "{indent}{prefix}{} **{}** {}{born}",
        gender_symbol(node.gender),
        node.ring_number,
        node.descriptive_color,
    )
}

fn write_generations(
    out: &mut String,
    node: &DisplayNode,
    prefix: &str,
    depth: usize,
    generations: usize,
) -> std::fmt::Result {
    write_node(out, node, prefix, depth)?;
    if depth >= generations {
        return Ok(());
    }
    if let Some(father) = node.father.as_deref() {
        write_generations(out, father, "F: ", depth + 1, generations)?;
    }
    if let Some(mother) = node.mother.as_deref() {
        write_generations(out, mother, "M: ", depth + 1, generations)?;
    }
    Ok(())
}

/// Renders a pedigree as indented lines, the bird first and each parent one
/// level deeper, stopping after `generations` levels of ancestors.
pub(crate) fn render_pedigree(node: &DisplayNode, generations: usize) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_generations(&mut out, node, "", 0, generations)?;
    Ok(out)
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{chosen_parent, render_pedigree};
    use crate::{
        bot::{
            Context, actor,
            commands::{fit_message, format_date, parse_date, parse_optional_date, split_list},
            handlers::autocomplete,
        },
        core::{
            bird::{self as birds, BirdInput},
            catalog, genetics,
            pedigree::{self, Lineage},
            scope,
            tenant::Actor,
        },
        entities::{Bird, Breeder, bird::Gender, bird::PrimaryColor},
        errors::{Error, Result},
    };
    use sea_orm::ConnectionTrait;
    use std::collections::HashSet;
    use std::fmt::Write;
    use tracing::info;

    /// Pedigrees deeper than this do not fit in one message.
    const MAX_GENERATIONS: u8 = 5;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum GenderChoice {
        #[name = "Male"]
        Male,
        #[name = "Female"]
        Female,
        #[name = "Unknown"]
        Unknown,
    }

    impl From<GenderChoice> for Gender {
        fn from(choice: GenderChoice) -> Self {
            match choice {
                GenderChoice::Male => Self::Male,
                GenderChoice::Female => Self::Female,
                GenderChoice::Unknown => Self::Unknown,
            }
        }
    }

    fn parse_color(text: Option<&str>) -> Result<Option<PrimaryColor>> {
        let Some(text) = text else { return Ok(None) };
        PrimaryColor::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(text.trim()) || c.code() == text.trim())
            .map(Some)
            .ok_or_else(|| Error::InvalidValue {
                field: "color".to_string(),
                value: text.to_string(),
            })
    }

    async fn ring_of<C: ConnectionTrait>(db: &C, actor: &Actor, id: Option<i64>) -> Result<String> {
        Ok(scope::find_visible_opt::<Bird, _>(db, actor, id)
            .await?
            .map_or_else(|| "-".to_string(), |b| b.ring_number))
    }

    async fn property_ids<C: ConnectionTrait>(db: &C, actor: &Actor, names: Option<&str>) -> Result<Vec<i64>> {
        let mut ids = Vec::new();
        for name in names.map(|n| n.split(',')).into_iter().flatten() {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let property = catalog::get_color_property_by_name(db, actor, name)
                .await?
                .ok_or_else(|| Error::not_found("color property", name))?;
            ids.push(property.id);
        }
        Ok(ids)
    }

    /// Resolves a typed list of ring numbers to the ids of visible birds.
    /// Unknown rings are returned separately.
    async fn resolve_rings<C: ConnectionTrait>(
        db: &C,
        actor: &Actor,
        rings: &str,
    ) -> Result<(Vec<i64>, Vec<String>)> {
        let wanted: HashSet<&str> = split_list(rings).into_iter().collect();
        let found: Vec<_> = birds::list_birds(db, actor)
            .await?
            .into_iter()
            .filter(|b| wanted.contains(b.ring_number.as_str()))
            .collect();
        let known: HashSet<&str> = found.iter().map(|b| b.ring_number.as_str()).collect();
        let mut unknown: Vec<String> = wanted
            .iter()
            .filter(|ring| !known.contains(*ring))
            .map(|ring| (*ring).to_string())
            .collect();
        unknown.sort();
        Ok((found.iter().map(|b| b.id).collect(), unknown))
    }

    /// Manage your birds
    #[poise::command(
        slash_command,
        subcommands(
            "bird_add",
            "bird_info",
            "bird_parents",
            "bird_colors",
            "bird_died",
            "bird_delete",
            "bird_owned",
            "bird_for_sale",
            "bird_list"
        )
    )]
    pub async fn bird(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Register a new bird
    #[poise::command(slash_command, rename = "add")]
    pub async fn bird_add(
        ctx: Context<'_>,
        #[description = "Ring number, e.g. 5TJJ-12-2021"] ring_number: String,
        #[description = "Gender"] gender: Option<GenderChoice>,
        #[description = "Primary color"]
        #[autocomplete = "autocomplete::autocomplete_primary_color"]
        color: Option<String>,
        #[description = "Date of birth (dd-mm-yyyy)"] born: Option<String>,
        #[description = "Breeder"]
        #[autocomplete = "autocomplete::autocomplete_breeder"]
        breeder: Option<i64>,
        #[description = "Owner, when it is not you"]
        #[autocomplete = "autocomplete::autocomplete_breeder"]
        owner: Option<i64>,
        #[description = "Is the bird in your possession?"] owned: Option<bool>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let input = BirdInput {
            gender: gender.map(Gender::from).unwrap_or_default(),
            color: parse_color(color.as_deref())?,
            date_of_birth: parse_optional_date("date_of_birth", born.as_deref())?,
            breeder_id: breeder,
            owner_id: owner,
            is_owned: owned.unwrap_or_default(),
            notes: notes.unwrap_or_default(),
            ..BirdInput::with_ring(&ring_number)
        };
        let bird = birds::create_bird(&ctx.data().database, &actor, input).await?;
        info!("User {} registered bird {}", actor.user_id, bird.ring_number);
        ctx.say(format!("✅ Registered bird **{}**.", bird.ring_number)).await?;
        Ok(())
    }

    /// Show the details of a bird
    #[poise::command(slash_command, rename = "info")]
    pub async fn bird_info(
        ctx: Context<'_>,
        #[description = "Ring number"]
        #[autocomplete = "autocomplete::autocomplete_ring_number"]
        ring_number: String,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let bird = birds::get_bird_by_ring(db, &actor, &ring_number).await?;
        let genetics = genetics::load_genetics(db, &bird).await?;
        let breeder = scope::find_visible_opt::<Breeder, _>(db, &actor, bird.breeder_id).await?;
        let owner = scope::find_visible_opt::<Breeder, _>(db, &actor, bird.owner_id).await?;

        let mut text = String::new();
        writeln!(text, "**{}** {}", bird.ring_number, bird.gender.label())?;
        writeln!(text, "Color: {}", genetics.descriptive_color())?;
        if let Some(color) = bird.color {
            writeln!(text, "Color code: {}", color.code())?;
        }
        writeln!(text, "Split: {}", genetics.split_properties_string())?;
        writeln!(text, "Born: {}", format_date(bird.date_of_birth))?;
        if bird.date_of_death.is_some() {
            writeln!(text, "Died: {}", format_date(bird.date_of_death))?;
        }
        writeln!(text, "Father: {}", ring_of(db, &actor, bird.father_id).await?)?;
        writeln!(text, "Mother: {}", ring_of(db, &actor, bird.mother_id).await?)?;
        writeln!(
            text,
            "Breeder: {}",
            breeder.map_or_else(|| "-".to_string(), |b| b.to_string())
        )?;
        writeln!(
            text,
            "Owner: {}",
            owner.map_or_else(|| "-".to_string(), |b| b.to_string())
        )?;
        writeln!(
            text,
            "Owned: {} | For sale: {}",
            if bird.is_owned { "yes" } else { "no" },
            if bird.is_for_sale { "yes" } else { "no" }
        )?;
        if !bird.notes.is_empty() {
            writeln!(text, "Notes: {}", bird.notes)?;
        }
        ctx.say(text).await?;
        Ok(())
    }

    /// Set or clear the parents of a bird
    #[poise::command(slash_command, rename = "parents")]
    pub async fn bird_parents(
        ctx: Context<'_>,
        #[description = "Ring number of the bird"]
        #[autocomplete = "autocomplete::autocomplete_ring_number"]
        ring_number: String,
        #[description = "Ring number of the father; leave empty to keep the current one"]
        #[autocomplete = "autocomplete::autocomplete_ring_number"]
        father: Option<String>,
        #[description = "Ring number of the mother; leave empty to keep the current one"]
        #[autocomplete = "autocomplete::autocomplete_ring_number"]
        mother: Option<String>,
        #[description = "Remove the father"] clear_father: Option<bool>,
        #[description = "Remove the mother"] clear_mother: Option<bool>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let bird = birds::get_bird_by_ring(db, &actor, &ring_number).await?;
        let father_id = match father {
            Some(ring) => Some(birds::get_bird_by_ring(db, &actor, &ring).await?.id),
            None => None,
        };
        let mother_id = match mother {
            Some(ring) => Some(birds::get_bird_by_ring(db, &actor, &ring).await?.id),
            None => None,
        };
        let father_id = chosen_parent(bird.father_id, father_id, clear_father.unwrap_or_default());
        let mother_id = chosen_parent(bird.mother_id, mother_id, clear_mother.unwrap_or_default());
        let bird = birds::set_parents(db, &actor, bird.id, father_id, mother_id).await?;
        ctx.say(format!(
            "✅ Parents of **{}**: father {}, mother {}.",
            bird.ring_number,
            ring_of(db, &actor, bird.father_id).await?,
            ring_of(db, &actor, bird.mother_id).await?
        ))
        .await?;
        Ok(())
    }

    /// Set the visible and split color properties of a bird
    #[poise::command(slash_command, rename = "colors")]
    pub async fn bird_colors(
        ctx: Context<'_>,
        #[description = "Ring number"]
        #[autocomplete = "autocomplete::autocomplete_ring_number"]
        ring_number: String,
        #[description = "Visible properties, comma separated"] visible: Option<String>,
        #[description = "Split properties, comma separated"] split: Option<String>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let bird = birds::get_bird_by_ring(db, &actor, &ring_number).await?;
        let visible_ids = property_ids(db, &actor, visible.as_deref()).await?;
        let split_ids = property_ids(db, &actor, split.as_deref()).await?;
        birds::set_color_properties(db, &actor, bird.id, &visible_ids, &split_ids).await?;
        let genetics = genetics::load_genetics(db, &bird).await?;
        ctx.say(format!(
            "✅ **{}** is now {} (split: {}).",
            bird.ring_number,
            genetics.descriptive_color(),
            genetics.split_properties_string()
        ))
        .await?;
        Ok(())
    }

    /// Record the date a bird died
    #[poise::command(slash_command, rename = "died")]
    pub async fn bird_died(
        ctx: Context<'_>,
        #[description = "Ring number"]
        #[autocomplete = "autocomplete::autocomplete_ring_number"]
        ring_number: String,
        #[description = "Date of death (dd-mm-yyyy)"] date: String,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let date = parse_date("date_of_death", &date)?;
        let bird = birds::get_bird_by_ring(db, &actor, &ring_number).await?;
        let bird = birds::set_date_of_death(db, &actor, bird.id, Some(date)).await?;
        ctx.say(format!(
            "✅ Recorded the death of **{}** on {}.",
            bird.ring_number,
            format_date(bird.date_of_death)
        ))
        .await?;
        Ok(())
    }

    /// Delete a bird; its children and couples keep existing without it
    #[poise::command(slash_command, rename = "delete")]
    pub async fn bird_delete(
        ctx: Context<'_>,
        #[description = "Ring number"]
        #[autocomplete = "autocomplete::autocomplete_ring_number"]
        ring_number: String,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let bird = birds::get_bird_by_ring(db, &actor, &ring_number).await?;
        birds::delete_bird(db, &actor, bird.id).await?;
        info!("User {} deleted bird {}", actor.user_id, bird.ring_number);
        ctx.say(format!("✅ Deleted bird **{}**.", bird.ring_number)).await?;
        Ok(())
    }

    async fn report_flagged(ctx: Context<'_>, what: &str, updated: u64, unknown: &[String]) -> Result<()> {
        let mut text = format!("✅ Marked {updated} bird(s) as {what}.");
        if !unknown.is_empty() {
            write!(text, "\n❓ Unknown ring numbers: {}", unknown.join(", "))?;
        }
        ctx.say(text).await?;
        Ok(())
    }

    /// Mark birds as being in your possession
    #[poise::command(slash_command, rename = "owned")]
    pub async fn bird_owned(
        ctx: Context<'_>,
        #[description = "Ring numbers, separated by commas or spaces"] ring_numbers: String,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let (ids, unknown) = resolve_rings(db, &actor, &ring_numbers).await?;
        let updated = birds::mark_owned(db, &actor, &ids).await?;
        report_flagged(ctx, "owned", updated, &unknown).await
    }

    /// Mark birds as for sale
    #[poise::command(slash_command, rename = "for_sale")]
    pub async fn bird_for_sale(
        ctx: Context<'_>,
        #[description = "Ring numbers, separated by commas or spaces"] ring_numbers: String,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let (ids, unknown) = resolve_rings(db, &actor, &ring_numbers).await?;
        let updated = birds::mark_for_sale(db, &actor, &ids).await?;
        report_flagged(ctx, "for sale", updated, &unknown).await
    }

    /// List your birds
    #[poise::command(slash_command, rename = "list")]
    pub async fn bird_list(
        ctx: Context<'_>,
        #[description = "Only birds in your possession"] owned_only: Option<bool>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let mut birds = birds::list_birds(db, &actor).await?;
        if owned_only.unwrap_or(false) {
            birds.retain(|b| b.is_owned);
        }
        if birds.is_empty() {
            ctx.say("No birds registered yet. Use `/bird add` or `/import`.").await?;
            return Ok(());
        }
        let genetics = genetics::load_genetics_many(db, &birds).await?;
        let lines: Vec<String> = birds
            .iter()
            .map(|b| {
                let color = genetics
                    .get(&b.id)
                    .map(genetics::BirdGenetics::descriptive_color)
                    .unwrap_or_default();
                let sale = if b.is_for_sale { " 🏷️" } else { "" };
                format!(
                    "• **{}** {} {} ({}){sale}",
                    b.ring_number,
                    super::gender_symbol(b.gender),
                    color,
                    format_date(b.date_of_birth)
                )
            })
            .collect();
        let header = format!("**Birds ({})**\n", birds.len());
        ctx.say(fit_message(&header, &lines)).await?;
        Ok(())
    }

    /// Show the pedigree of a bird
    #[poise::command(slash_command)]
    pub async fn pedigree(
        ctx: Context<'_>,
        #[description = "Ring number"]
        #[autocomplete = "autocomplete::autocomplete_ring_number"]
        ring_number: String,
        #[description = "Generations of ancestors to show (default 3)"]
        #[min = 1]
        #[max = 5]
        generations: Option<u8>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let bird = birds::get_bird_by_ring(db, &actor, &ring_number).await?;
        let tree = pedigree::build_ancestor_tree(db, &actor, bird.id).await?;
        let members: Vec<_> = tree.birds().into_iter().cloned().collect();
        let genetics = genetics::load_genetics_many(db, &members).await?;
        let display = pedigree::render_display_tree(&tree, &genetics);

        let generations = generations.unwrap_or(3).min(MAX_GENERATIONS);
        let mut text = render_pedigree(&display, usize::from(generations))?;

        let lineage = Lineage::from_birds(members);
        let common: Vec<String> = pedigree::render_inbreeding_tree(&tree)
            .common_ancestors()
            .into_iter()
            .filter_map(|id| lineage.get(id).map(|b| b.ring_number.clone()))
            .collect();
        if !common.is_empty() {
            write!(text, "\n⚠️ Common ancestors: {}", common.join(", "))?;
        }
        ctx.say(fit_message("", &text.lines().map(str::to_string).collect::<Vec<_>>()))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::NaiveDate;

    fn node(ring: &str, gender: Gender) -> DisplayNode {
        DisplayNode {
            id: 0,
            ring_number: ring.to_string(),
            gender,
            descriptive_color: "Sky Blue".to_string(),
            date_of_birth: None,
            father: None,
            mother: None,
        }
    }

    #[test]
    fn test_render_pedigree_stops_at_generations() {
        let mut grandfather = node("G-1", Gender::Male);
        grandfather.date_of_birth = NaiveDate::from_ymd_opt(2018, 3, 1);
        let mut father = node("F-1", Gender::Male);
        father.father = Some(Box::new(grandfather));
        let mut root = node("R-1", Gender::Female);
        root.father = Some(Box::new(father));
        root.mother = Some(Box::new(node("M-1", Gender::Female)));

        let full = render_pedigree(&root, 3).unwrap();
        assert_eq!(
            full,
            "♀ **R-1** Sky Blue\n  F: ♂ **F-1** Sky Blue\n    F: ♂ **G-1** Sky Blue (01-03-2018)\n  M: ♀ **M-1** Sky Blue\n"
        );

        let parents_only = render_pedigree(&root, 1).unwrap();
        assert!(!parents_only.contains("G-1"));
        assert!(parents_only.contains("M-1"));
    }

    #[test]
    fn test_chosen_parent_keeps_link_unless_replaced_or_cleared() {
        assert_eq!(chosen_parent(Some(3), None, false), Some(3));
        assert_eq!(chosen_parent(Some(3), Some(7), false), Some(7));
        assert_eq!(chosen_parent(Some(3), None, true), None);
        assert_eq!(chosen_parent(None, Some(7), true), Some(7));
    }
}
