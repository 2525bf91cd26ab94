//! Autocomplete handlers for Discord slash command parameters.
//!
//! Every suggestion list comes from the access scope's choice lists, so users
//! are only ever offered their own birds, breeders, couples and so on.

use crate::{
    bot::{Context, actor},
    core::scope::{self, Choice, ChoiceField},
};
use poise::serenity_prelude::AutocompleteChoice;
use tracing::error;

/// Discord shows at most this many suggestions.
const MAX_CHOICES: usize = 25;

async fn choices(ctx: Context<'_>, field: ChoiceField) -> Vec<Choice> {
    let result = async {
        let actor = actor(ctx).await?;
        scope::scope_choice_list(&ctx.data().database, &actor, field).await
    }
    .await;
    result.unwrap_or_else(|e| {
        error!("Autocomplete: failed to fetch {:?} choices: {:?}", field, e);
        Vec::new()
    })
}

fn matching(choices: Vec<Choice>, partial: &str) -> impl Iterator<Item = Choice> {
    let partial = partial.to_lowercase();
    choices
        .into_iter()
        .filter(move |c| c.label.to_lowercase().contains(&partial))
        .take(MAX_CHOICES)
}

/// Suggests ring numbers; the ring number itself is the value.
async fn rings(ctx: Context<'_>, field: ChoiceField, partial: &str) -> Vec<String> {
    matching(choices(ctx, field).await, partial)
        .map(|c| c.label)
        .collect()
}

/// Suggests rows by label with their id as the value.
async fn by_id(ctx: Context<'_>, field: ChoiceField, partial: &str) -> Vec<AutocompleteChoice> {
    matching(choices(ctx, field).await, partial)
        .map(|c| AutocompleteChoice::new(c.label, c.id))
        .collect()
}

/// Ring numbers of all the user's birds.
pub async fn autocomplete_ring_number(ctx: Context<'_>, partial: &str) -> Vec<String> {
    rings(ctx, ChoiceField::Father, partial).await
}

/// Ring numbers of the user's male birds.
pub async fn autocomplete_male(ctx: Context<'_>, partial: &str) -> Vec<String> {
    rings(ctx, ChoiceField::Male, partial).await
}

/// Ring numbers of the user's female birds.
pub async fn autocomplete_female(ctx: Context<'_>, partial: &str) -> Vec<String> {
    rings(ctx, ChoiceField::Female, partial).await
}

/// Breeders by display name.
pub async fn autocomplete_breeder(ctx: Context<'_>, partial: &str) -> Vec<AutocompleteChoice> {
    by_id(ctx, ChoiceField::Breeder, partial).await
}

/// Color properties, in description order.
pub async fn autocomplete_color_property(
    ctx: Context<'_>,
    partial: &str,
) -> Vec<AutocompleteChoice> {
    by_id(ctx, ChoiceField::ColorProperty, partial).await
}

/// Breeding seasons, newest first.
pub async fn autocomplete_season(ctx: Context<'_>, partial: &str) -> Vec<AutocompleteChoice> {
    by_id(ctx, ChoiceField::Season, partial).await
}

/// Couples labelled by the rings of male and female.
pub async fn autocomplete_couple(ctx: Context<'_>, partial: &str) -> Vec<AutocompleteChoice> {
    by_id(ctx, ChoiceField::Couple, partial).await
}

/// Locations by name.
pub async fn autocomplete_location(ctx: Context<'_>, partial: &str) -> Vec<AutocompleteChoice> {
    by_id(ctx, ChoiceField::Location, partial).await
}

/// Primary colors by label.
pub async fn autocomplete_primary_color(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    crate::entities::bird::PrimaryColor::ALL
        .iter()
        .map(|c| c.label())
        .filter(|label| label.to_lowercase().contains(&partial))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: i64, label: &str) -> Choice {
        Choice {
            id,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_matching_is_case_insensitive_and_capped() {
        let many: Vec<Choice> = (0..40).map(|i| choice(i, &format!("5TJJ-{i}-2020"))).collect();
        assert_eq!(matching(many, "5tjj").count(), MAX_CHOICES);

        let few = vec![choice(1, "Vries, Henk (-)"), choice(2, "Bakker, Piet (-)")];
        let found: Vec<_> = matching(few, "VRIES").map(|c| c.id).collect();
        assert_eq!(found, vec![1]);
    }
}
