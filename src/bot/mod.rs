//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the breeding records,
//! including all slash commands, autocomplete handlers, and bot context
//! management. Commands resolve the acting user into an [`Actor`] and call
//! into [`crate::core`]; they hold no domain rules of their own.

/// Discord command implementations (birds, catalog, breeding, import/export, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::AppConfig,
    core::tenant::{self, Actor},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the application
/// configuration that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Superusers and the default color catalog for new users
    pub config: Arc<AppConfig>,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self { database, config }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Resolves the command author into the acting user, registering them on
/// first use.
pub async fn actor(ctx: Context<'_>) -> Result<Actor> {
    let data = ctx.data();
    tenant::resolve_actor(
        &data.database,
        &ctx.author().id.to_string(),
        &ctx.author().name,
        &data.config,
    )
    .await
}

/// Text shown to the user for a failed command.
fn user_message(error: &Error) -> String {
    match error {
        e if e.is_validation() => format!("❌ {e}"),
        Error::NotFound { .. } | Error::UnsupportedFormat { .. } | Error::Forbidden => {
            format!("❌ {error}")
        }
        _ => "❌ Something went wrong, the error has been logged.".to_string(),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            if error.is_validation() {
                info!("Rejected `{}`: {}", ctx.command().name, error);
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
            }
            if let Err(e) = ctx.say(user_message(&error)).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Starts the bot and runs until the client stops.
#[instrument(skip(token, config, database))]
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, config))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internal_errors() {
        let validation = Error::DeathBeforeBirth;
        assert!(user_message(&validation).contains("Date of death"));

        let missing = Error::not_found("bird", "5TJJ-1-2020");
        assert!(user_message(&missing).contains("5TJJ-1-2020"));

        let internal = Error::Config {
            message: "secret path".to_string(),
        };
        assert!(!user_message(&internal).contains("secret"));
    }
}
