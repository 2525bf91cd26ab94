//! Moving records in and out: spreadsheet import of birds and CSV export of
//! every record type.

use crate::core::import::{ImportReport, RowOutcome};
use std::fmt::Write;

/// Summary of an import for the chat, listing the rows that need attention.
pub(crate) fn describe_report(report: &ImportReport) -> Result<Vec<String>, std::fmt::Error> {
    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        let mut line = String::new();
        match outcome {
            RowOutcome::Imported { .. } => continue,
            RowOutcome::Partial { ring_number, warnings } => {
                write!(line, "⚠️ {ring_number}: {}", warnings.join("; "))?;
            }
            RowOutcome::Skipped { reason } => write!(line, "⏭️ {reason}")?,
        }
        lines.push(line);
    }
    Ok(lines)
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::describe_report;
    use crate::{
        bot::{Context, actor, commands::fit_message},
        core::{export, import},
        entities::{Bird, Breeder, BreedingCouple, BreedingSeason, ColorProperty, Egg},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ExportChoice {
        #[name = "Birds overview"]
        BirdsOverview,
        #[name = "Birds"]
        Birds,
        #[name = "Breeders"]
        Breeders,
        #[name = "Color properties"]
        ColorProperties,
        #[name = "Breeding seasons"]
        Seasons,
        #[name = "Breeding couples"]
        Couples,
        #[name = "Eggs"]
        Eggs,
    }

    impl ExportChoice {
        const fn file_name(self) -> &'static str {
            match self {
                Self::BirdsOverview => "birds_overview.csv",
                Self::Birds => "birds.csv",
                Self::Breeders => "breeders.csv",
                Self::ColorProperties => "color_properties.csv",
                Self::Seasons => "breeding_seasons.csv",
                Self::Couples => "breeding_couples.csv",
                Self::Eggs => "eggs.csv",
            }
        }
    }

    /// Import birds from a CSV or XLSX spreadsheet
    #[poise::command(slash_command)]
    pub async fn import(
        ctx: Context<'_>,
        #[description = "Spreadsheet with a header row (.csv or .xlsx)"] file: serenity::Attachment,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        ctx.defer().await?;
        let bytes = file.download().await?;
        let report = import::import_file(&ctx.data().database, &actor, &file.filename, &bytes).await?;
        info!(
            "User {} imported {}: {} imported, {} partial, {} skipped",
            actor.user_id,
            file.filename,
            report.imported(),
            report.partial(),
            report.skipped()
        );
        let header = format!(
            "✅ **{}**: {} imported, {} with warnings, {} skipped.\n",
            file.filename,
            report.imported(),
            report.partial(),
            report.skipped()
        );
        ctx.say(fit_message(&header, &describe_report(&report)?)).await?;
        Ok(())
    }

    /// Export your records as CSV
    #[poise::command(slash_command)]
    pub async fn export(
        ctx: Context<'_>,
        #[description = "What to export"] what: ExportChoice,
    ) -> Result<()> {
        let actor = actor(ctx).await?;
        let db = &ctx.data().database;
        let bytes = match what {
            ExportChoice::BirdsOverview => export::export_birds_overview(db, &actor, None).await?,
            ExportChoice::Birds => export::export_csv::<Bird, _>(db, &actor, None).await?,
            ExportChoice::Breeders => export::export_csv::<Breeder, _>(db, &actor, None).await?,
            ExportChoice::ColorProperties => export::export_csv::<ColorProperty, _>(db, &actor, None).await?,
            ExportChoice::Seasons => export::export_csv::<BreedingSeason, _>(db, &actor, None).await?,
            ExportChoice::Couples => export::export_csv::<BreedingCouple, _>(db, &actor, None).await?,
            ExportChoice::Eggs => export::export_csv::<Egg, _>(db, &actor, None).await?,
        };
        let reply = poise::CreateReply::default()
            .content("📄 Here is your export.")
            .attachment(serenity::CreateAttachment::bytes(bytes, what.file_name()));
        ctx.send(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{import, tenant::Actor};
    use crate::errors::Result;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_describe_report_lists_only_rows_needing_attention() -> Result<()> {
        let db = setup_test_db().await?;
        let actor: Actor = create_test_actor(&db, "alice").await?;
        let csv = "Ringnummer,Geslacht,Geboren\n\
                   5TJJ-1-2020,pop,21-04-2020\n\
                   5TJJ-2-2020,pop,not a date\n\
                   ,man,\n";

        let report = import::import_file(&db, &actor, "birds.csv", csv.as_bytes()).await?;
        let lines = describe_report(&report).unwrap();

        assert_eq!(report.imported(), 1);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("⚠️ 5TJJ-2-2020"));
        assert!(lines[1].starts_with("⏭️"));
        Ok(())
    }
}
