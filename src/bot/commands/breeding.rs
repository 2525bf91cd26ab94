//! Breeding commands - seasons, couples, eggs and the locations couples are
//! housed in.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context, actor,
            commands::{fit_message, format_date, parse_optional_date, split_list},
            handlers::autocomplete,
        },
        core::{
            bird as birds,
            breeding::{self, CoupleInput},
            scope::{self, ChoiceField},
            tenant::Actor,
        },
        entities::egg::EggStatus,
        errors::{Error, Result},
    };
    use sea_orm::ConnectionTrait;
    use std::collections::HashMap;
    use std::fmt::Write;
    use tracing::info;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum EggStatusChoice {
        #[name = "Fertilized"]
        Fertilized,
        #[name = "Unfertilized"]
        Unfertilized,
        #[name = "Died off"]
        DiedOff,
        #[name = "Broken"]
        Broken,
    }

    impl From<EggStatusChoice> for EggStatus {
        fn from(choice: EggStatusChoice) -> Self {
            match choice {
                EggStatusChoice::Fertilized => Self::Fertilized,
                EggStatusChoice::Unfertilized => Self::Unfertilized,
                EggStatusChoice::DiedOff => Self::DiedOff,
                EggStatusChoice::Broken => Self::Broken,
            }
        }
    }

    const fn status_label(status: EggStatus) -> &'static str {
        match status {
            EggStatus::Fertilized => "fertilized",
            EggStatus::Unfertilized => "unfertilized",
            EggStatus::DiedOff => "died off",
            EggStatus::Broken => "broken",
        }
    }

    /// Couple labels by id, naming the male and female by ring number.
    async fn couple_labels<C: ConnectionTrait>(db: &C, actor: &Actor) -> Result<HashMap<i64, String>> {
        Ok(scope::scope_choice_list(db, actor, ChoiceField::Couple)
            .await?
            .into_iter()
            .map(|c| (c.id, c.label))
            .collect())
    }

    fn parse_ids(field: &str, text: &str) -> Result<Vec<i64>> {
        split_list(text)
            .into_iter()
            .map(|item| {
                item.trim_start_matches('#')
                    .parse::<i64>()
                    .map_err(|_| Error::InvalidValue {
                        field: field.to_string(),
                        value: item.to_string(),
                    })
            })
            .collect()
    }

    /// Manage breeding seasons
    #[poise::command(slash_command, subcommands("season_add", "season_list"))]
    pub async fn season(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Start a new breeding season
    #[poise::command(slash_command, rename = "add")]
    pub async fn season_add(
        ctx: Context<'_>,
        #[description = "Starting year"] year: i32,
        #[description = "Starting month"]
        #[min = 1]
        #[max = 12]
        month: i32,
        #[description = "Optional label"] label: Option<String>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let season = breeding::create_season(&ctx.data().database, &actor, None, year, month, label).await?;
        info!("User {} started season {}", actor.user_id, season.id);
        ctx.say(format!("✅ Created **{season}**.")).await?;
        Ok(())
    }

    /// List your breeding seasons, newest first
    #[poise::command(slash_command, rename = "list")]
    pub async fn season_list(ctx: Context<'_>) -> Result<()> {
        let actor = actor(ctx).await?;
        let seasons = breeding::list_seasons_with_couple_count(&ctx.data().database, &actor).await?;
        if seasons.is_empty() {
            ctx.say("No breeding seasons yet. Use `/season add`.").await?;
            return Ok(());
        }
        let lines: Vec<String> = seasons
            .iter()
            .map(|(season, couples)| format!("• {season}: {couples} couple(s)"))
            .collect();
        ctx.say(fit_message("**Breeding seasons**\n", &lines)).await?;
        Ok(())
    }

    /// Manage breeding couples
    #[poise::command(slash_command, subcommands("couple_add", "couple_list"))]
    pub async fn couple(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Put a male and a female together for a season
    #[poise::command(slash_command, rename = "add")]
    pub async fn couple_add(
        ctx: Context<'_>,
        #[description = "Breeding season"]
        #[autocomplete = "autocomplete::autocomplete_season"]
        season: i64,
        #[description = "Ring number of the male"]
        #[autocomplete = "autocomplete::autocomplete_male"]
        male: Option<String>,
        #[description = "Ring number of the female"]
        #[autocomplete = "autocomplete::autocomplete_female"]
        female: Option<String>,
        #[description = "Date they were put together (dd-mm-yyyy)"] start: Option<String>,
        #[description = "Where they are housed"]
        #[autocomplete = "autocomplete::autocomplete_location"]
        location: Option<i64>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let male_id = match male {
            Some(ring) => Some(birds::get_bird_by_ring(db, &actor, &ring).await?.id),
            None => None,
        };
        let female_id = match female {
            Some(ring) => Some(birds::get_bird_by_ring(db, &actor, &ring).await?.id),
            None => None,
        };
        let input = CoupleInput {
            user_id: None,
            season_id: season,
            male_id,
            female_id,
            start_date: parse_optional_date("start_date", start.as_deref())?,
            location_id: location,
            notes: notes.unwrap_or_default(),
        };
        let couple = breeding::create_couple(db, &actor, input).await?;
        let label = couple_labels(db, &actor)
            .await?
            .remove(&couple.id)
            .unwrap_or_default();
        ctx.say(format!("✅ Couple #{} created: {label}.", couple.id)).await?;
        Ok(())
    }

    /// List the couples of a season
    #[poise::command(slash_command, rename = "list")]
    pub async fn couple_list(
        ctx: Context<'_>,
        #[description = "Breeding season"]
        #[autocomplete = "autocomplete::autocomplete_season"]
        season: i64,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let couples = breeding::list_couples(db, &actor, season).await?;
        if couples.is_empty() {
            ctx.say("No couples in this season yet. Use `/couple add`.").await?;
            return Ok(());
        }
        let labels = couple_labels(db, &actor).await?;
        let lines: Vec<String> = couples
            .iter()
            .map(|c| {
                format!(
                    "• #{} {} (since {})",
                    c.id,
                    labels.get(&c.id).map_or("", String::as_str),
                    format_date(c.start_date)
                )
            })
            .collect();
        ctx.say(fit_message("**Couples**\n", &lines)).await?;
        Ok(())
    }

    /// Record eggs
    #[poise::command(slash_command, subcommands("eggs_add", "eggs_list", "eggs_status"))]
    pub async fn eggs(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Add one egg to each of several couples
    #[poise::command(slash_command, rename = "add")]
    pub async fn eggs_add(
        ctx: Context<'_>,
        #[description = "Couple numbers, e.g. 3, 5, 7 (see /couple list)"] couples: String,
        #[description = "Status of the eggs"] status: EggStatusChoice,
        #[description = "Date found (dd-mm-yyyy), today when empty"] date: Option<String>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let ids = parse_ids("couples", &couples)?;
        let date = parse_optional_date("date", date.as_deref())?;
        let created =
            breeding::bulk_add_eggs(&ctx.data().database, &actor, &ids, date, Some(status.into())).await?;
        let mut text = format!("✅ Added {created} egg(s).");
        let skipped = u64::try_from(ids.len()).unwrap_or(u64::MAX).saturating_sub(created);
        if skipped > 0 {
            write!(text, " {skipped} couple(s) were not found.")?;
        }
        ctx.say(text).await?;
        Ok(())
    }

    /// List the eggs of a couple with their expected hatch dates
    #[poise::command(slash_command, rename = "list")]
    pub async fn eggs_list(
        ctx: Context<'_>,
        #[description = "Breeding couple"]
        #[autocomplete = "autocomplete::autocomplete_couple"]
        couple: i64,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let eggs = breeding::list_eggs_for_couple(&ctx.data().database, &actor, couple).await?;
        if eggs.is_empty() {
            ctx.say("No eggs recorded for this couple.").await?;
            return Ok(());
        }
        let lines: Vec<String> = eggs
            .iter()
            .map(|e| {
                let hatch = breeding::expected_hatch_date(e)
                    .map(|d| format!(", hatches around {}", format_date(Some(d))))
                    .unwrap_or_default();
                format!(
                    "• #{} found {} ({}){hatch}",
                    e.id,
                    format_date(Some(e.date)),
                    status_label(e.status)
                )
            })
            .collect();
        ctx.say(fit_message("**Eggs**\n", &lines)).await?;
        Ok(())
    }

    /// Update the status of an egg
    #[poise::command(slash_command, rename = "status")]
    pub async fn eggs_status(
        ctx: Context<'_>,
        #[description = "Egg number (see /eggs list)"] egg: i64,
        #[description = "New status"] status: EggStatusChoice,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let egg = breeding::update_egg_status(&ctx.data().database, &actor, egg, status.into()).await?;
        let mut text = format!("✅ Egg #{} is now {}.", egg.id, status_label(egg.status));
        if let Some(hatch) = breeding::expected_hatch_date(&egg) {
            write!(text, " Expected to hatch around {}.", format_date(Some(hatch)))?;
        }
        ctx.say(text).await?;
        Ok(())
    }

    /// Manage the cages and aviaries couples are housed in
    #[poise::command(slash_command, subcommands("location_add", "location_assign", "location_list"))]
    pub async fn location(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Add a location
    #[poise::command(slash_command, rename = "add")]
    pub async fn location_add(
        ctx: Context<'_>,
        #[description = "Name, e.g. Cage 4"] name: String,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let location = breeding::create_location(&ctx.data().database, &actor, None, &name).await?;
        ctx.say(format!("✅ Added location **{}**.", location.name)).await?;
        Ok(())
    }

    /// Set or clear the couple currently at a location
    #[poise::command(slash_command, rename = "assign")]
    pub async fn location_assign(
        ctx: Context<'_>,
        #[description = "Location"]
        #[autocomplete = "autocomplete::autocomplete_location"]
        location: i64,
        #[description = "Couple; leave empty to clear"]
        #[autocomplete = "autocomplete::autocomplete_couple"]
        couple: Option<i64>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let location = breeding::assign_location(&ctx.data().database, &actor, location, couple).await?;
        let message = match location.current_couple_id {
            Some(id) => format!("✅ Couple #{id} is now at **{}**.", location.name),
            None => format!("✅ **{}** is now empty.", location.name),
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// List your locations and who is housed there
    #[poise::command(slash_command, rename = "list")]
    pub async fn location_list(ctx: Context<'_>) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let locations = breeding::list_locations(db, &actor).await?;
        if locations.is_empty() {
            ctx.say("No locations yet. Use `/location add`.").await?;
            return Ok(());
        }
        let labels = couple_labels(db, &actor).await?;
        let mut lines = Vec::with_capacity(locations.len());
        for location in &locations {
            let occupant = match breeding::current_couple(db, &actor, location.id).await? {
                Some(c) => format!("#{} {}", c.id, labels.get(&c.id).map_or("", String::as_str)),
                None => "empty".to_string(),
            };
            lines.push(format!("• **{}**: {occupant}", location.name));
        }
        ctx.say(fit_message("**Locations**\n", &lines)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
