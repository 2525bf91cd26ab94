//! Tenant context - Who is acting, and whether they see across tenants.
//!
//! Every core operation takes an explicit [`Actor`]; nothing reads the
//! current user from ambient state.

use crate::{
    config::AppConfig,
    core::catalog,
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// The acting user of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Database id of the acting user
    pub user_id: i64,
    /// Exempt from tenant isolation
    pub is_superuser: bool,
    /// Inactive accounts fail the capability check
    pub is_active: bool,
}

impl Actor {
    /// A regular, active tenant.
    #[must_use]
    pub const fn tenant(user_id: i64) -> Self {
        Self {
            user_id,
            is_superuser: false,
            is_active: true,
        }
    }

    /// An active superuser.
    #[must_use]
    pub const fn superuser(user_id: i64) -> Self {
        Self {
            user_id,
            is_superuser: true,
            is_active: true,
        }
    }

    /// Builds the actor for a stored user.
    #[must_use]
    pub const fn from_user(user: &user::Model) -> Self {
        Self {
            user_id: user.id,
            is_superuser: user.is_superuser,
            is_active: user.is_active,
        }
    }

    /// Coarse capability check: may this account use the application at all.
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_active {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }
}

/// Resolves the Discord user into an [`Actor`], registering them on first use.
///
/// New users get the default color catalog from the configuration. The
/// superuser flag follows the configuration on every call so that revoking
/// it takes effect immediately.
#[instrument(skip(db, config))]
pub async fn resolve_actor(
    db: &DatabaseConnection,
    discord_id: &str,
    username: &str,
    config: &AppConfig,
) -> Result<Actor> {
    let is_superuser = config.is_superuser(discord_id);

    let existing = User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await?;

    let user = match existing {
        Some(user) if user.is_superuser == is_superuser => user,
        Some(user) => {
            info!("Updating superuser flag of user {} to {}", user.id, is_superuser);
            let mut active: user::ActiveModel = user.into();
            active.is_superuser = Set(is_superuser);
            active.update(db).await?
        }
        None => {
            let user = register_user(db, discord_id, username, is_superuser).await?;
            let actor = Actor::from_user(&user);
            for property in &config.color_properties {
                catalog::create_color_property(db, &actor, None, &property.name, property.rank)
                    .await?;
            }
            info!(
                "Registered user {} with {} default color properties",
                user.id,
                config.color_properties.len()
            );
            user
        }
    };

    let actor = Actor::from_user(&user);
    actor.ensure_active()?;
    Ok(actor)
}

/// Inserts a new active user.
pub async fn register_user(
    db: &DatabaseConnection,
    discord_id: &str,
    username: &str,
    is_superuser: bool,
) -> Result<user::Model> {
    if discord_id.trim().is_empty() {
        return Err(Error::MissingField {
            field: "discord_id".to_string(),
        });
    }

    let user = user::ActiveModel {
        discord_id: Set(discord_id.to_string()),
        username: Set(username.to_string()),
        is_superuser: Set(is_superuser),
        is_active: Set(true),
        breeding_reg_nr: Set(None),
        notes: Set(String::new()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    Ok(user.insert(db).await?)
}

/// Deactivates an account; its data stays but every request is refused.
pub async fn deactivate_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("user", user_id))?;
    let mut active: user::ActiveModel = user.into();
    active.is_active = Set(false);
    Ok(active.update(db).await?)
}
