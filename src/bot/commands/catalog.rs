//! Catalog commands for the rows birds refer to: breeders and the color
//! properties that describe a bird's appearance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, actor, commands::fit_message, handlers::autocomplete},
        core::catalog::{self, BreederInput},
        errors::Result,
    };
    use tracing::info;

    /// Manage the color properties you describe birds with
    #[poise::command(
        slash_command,
        subcommands("color_property_add", "color_property_rank", "color_property_delete", "color_property_list")
    )]
    pub async fn color_property(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Add a color property, e.g. "Opaline"
    #[poise::command(slash_command, rename = "add")]
    pub async fn color_property_add(
        ctx: Context<'_>,
        #[description = "Name of the property"] name: String,
        #[description = "Position in color descriptions; lower comes first"] rank: Option<i32>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let property =
            catalog::create_color_property(&ctx.data().database, &actor, None, &name, rank.unwrap_or(0)).await?;
        info!("User {} added color property {}", actor.user_id, property.color_name);
        ctx.say(format!(
            "✅ Added color property **{}** (rank {}).",
            property.color_name, property.rank
        ))
        .await?;
        Ok(())
    }

    /// Change where a property appears in color descriptions
    #[poise::command(slash_command, rename = "rank")]
    pub async fn color_property_rank(
        ctx: Context<'_>,
        #[description = "Color property"]
        #[autocomplete = "autocomplete::autocomplete_color_property"]
        property: i64,
        #[description = "New rank; lower comes first"] rank: i32,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let property = catalog::set_color_property_rank(&ctx.data().database, &actor, property, rank).await?;
        ctx.say(format!(
            "✅ **{}** now has rank {}.",
            property.color_name, property.rank
        ))
        .await?;
        Ok(())
    }

    /// Delete a color property
    #[poise::command(slash_command, rename = "delete")]
    pub async fn color_property_delete(
        ctx: Context<'_>,
        #[description = "Color property"]
        #[autocomplete = "autocomplete::autocomplete_color_property"]
        property: i64,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        catalog::delete_color_property(&ctx.data().database, &actor, property).await?;
        ctx.say("✅ Color property deleted.").await?;
        Ok(())
    }

    /// List your color properties in description order
    #[poise::command(slash_command, rename = "list")]
    pub async fn color_property_list(ctx: Context<'_>) -> Result<()> {
        let actor = actor(ctx).await?;
        let properties = catalog::list_color_properties(&ctx.data().database, &actor).await?;
        if properties.is_empty() {
            ctx.say("No color properties yet. Use `/color_property add`.").await?;
            return Ok(());
        }
        let lines: Vec<String> = properties
            .iter()
            .map(|p| format!("• {} (rank {})", p.color_name, p.rank))
            .collect();
        ctx.say(fit_message("**Color properties**\n", &lines)).await?;
        Ok(())
    }

    /// Manage breeders and owners
    #[poise::command(slash_command, subcommands("breeder_add", "breeder_edit", "breeder_delete", "breeder_list"))]
    pub async fn breeder(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Add a breeder
    #[poise::command(slash_command, rename = "add")]
    pub async fn breeder_add(
        ctx: Context<'_>,
        #[description = "Last name"] last_name: String,
        #[description = "First name"] first_name: Option<String>,
        #[description = "Breeding registration number, e.g. 5TJJ"] reg_nr: Option<String>,
        #[description = "Address"] address: Option<String>,
        #[description = "Phone number"] phone: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let input = BreederInput {
            user_id: None,
            first_name: first_name.unwrap_or_default(),
            last_name,
            breeding_reg_nr: reg_nr,
            address,
            phone_number: phone,
            notes: notes.unwrap_or_default(),
        };
        let breeder = catalog::create_breeder(&ctx.data().database, &actor, input).await?;
        info!("User {} added breeder {}", actor.user_id, breeder.id);
        ctx.say(format!("✅ Added breeder **{breeder}**.")).await?;
        Ok(())
    }

    /// Change a breeder's details; options left out keep their value
    #[poise::command(slash_command, rename = "edit")]
    pub async fn breeder_edit(
        ctx: Context<'_>,
        #[description = "Breeder"]
        #[autocomplete = "autocomplete::autocomplete_breeder"]
        breeder: i64,
        #[description = "Last name"] last_name: Option<String>,
        #[description = "First name"] first_name: Option<String>,
        #[description = "Breeding registration number"] reg_nr: Option<String>,
        #[description = "Address"] address: Option<String>,
        #[description = "Phone number"] phone: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let existing = catalog::get_breeder(db, &actor, breeder).await?;
        let input = BreederInput {
            user_id: None,
            first_name: first_name.unwrap_or(existing.first_name),
            last_name: last_name.unwrap_or(existing.last_name),
            breeding_reg_nr: reg_nr.or(existing.breeding_reg_nr),
            address: address.or(existing.address),
            phone_number: phone.or(existing.phone_number),
            notes: notes.unwrap_or(existing.notes),
        };
        let breeder = catalog::update_breeder(db, &actor, existing.id, input).await?;
        ctx.say(format!("✅ Updated breeder **{breeder}**.")).await?;
        Ok(())
    }

    /// Delete a breeder; birds referring to them are kept
    #[poise::command(slash_command, rename = "delete")]
    pub async fn breeder_delete(
        ctx: Context<'_>,
        #[description = "Breeder"]
        #[autocomplete = "autocomplete::autocomplete_breeder"]
        breeder: i64,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        catalog::delete_breeder(&ctx.data().database, &actor, breeder).await?;
        ctx.say("✅ Breeder deleted.").await?;
        Ok(())
    }

    /// List your breeders
    #[poise::command(slash_command, rename = "list")]
    pub async fn breeder_list(ctx: Context<'_>) -> Result<()> {
        let actor = actor(ctx).await?;
        let breeders = catalog::list_breeders(&ctx.data().database, &actor).await?;
        if breeders.is_empty() {
            ctx.say("No breeders yet. Use `/breeder add`.").await?;
            return Ok(());
        }
        let lines: Vec<String> = breeders
            .iter()
            .map(|b| match &b.phone_number {
                Some(phone) => format!("• {b} ☎ {phone}"),
                None => format!("• {b}"),
            })
            .collect();
        ctx.say(fit_message("**Breeders**\n", &lines)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
