//! Genetics notation - Human-readable color descriptions of a bird.
//!
//! Visible and split properties are listed by ascending rank. Ranks are
//! curator-defined and editable, so the same bird can render differently
//! after a rank change; ties fall back to creation order.

use crate::{
    entities::{
        BirdColorProperty, BirdSplitProperty, ColorProperty, bird, bird::PrimaryColor,
        bird_color_property, bird_split_property, color_property,
    },
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::{HashMap, HashSet};

/// Everything needed to describe a bird's coloring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BirdGenetics {
    /// Primary color, if set
    pub color: Option<PrimaryColor>,
    /// Visible properties, ordered by rank
    pub visible: Vec<color_property::Model>,
    /// Split (carried) properties, ordered by rank
    pub split: Vec<color_property::Model>,
}

impl BirdGenetics {
    /// Space-separated visible property names.
    #[must_use]
    pub fn color_properties_string(&self) -> String {
        properties_string(&self.visible)
    }

    /// Space-separated split property names.
    #[must_use]
    pub fn split_properties_string(&self) -> String {
        properties_string(&self.split)
    }

    /// Full name of the bird's coloring:
    /// `{visible} {primary color} / {split}`, the split part omitted when empty.
    #[must_use]
    pub fn descriptive_color(&self) -> String {
        let visible = self.color_properties_string();
        let label = self.color.map_or("", PrimaryColor::label);
        let mut description = [visible.as_str(), label]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let split = self.split_properties_string();
        if !split.is_empty() {
            description.push_str(" / ");
            description.push_str(&split);
        }
        description.trim().to_string()
    }
}

/// Joins property names ordered by rank, then id.
#[must_use]
pub fn properties_string(properties: &[color_property::Model]) -> String {
    let mut ordered: Vec<&color_property::Model> = properties.iter().collect();
    ordered.sort_by_key(|p| (p.rank, p.id));
    ordered
        .iter()
        .map(|p| p.color_name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Loads the genetics of one bird.
pub async fn load_genetics<C: ConnectionTrait>(db: &C, bird: &bird::Model) -> Result<BirdGenetics> {
    let mut all = load_genetics_many(db, std::slice::from_ref(bird)).await?;
    Ok(all.remove(&bird.id).unwrap_or_default())
}

/// Loads the genetics of many birds with a fixed number of queries.
pub async fn load_genetics_many<C: ConnectionTrait>(
    db: &C,
    birds: &[bird::Model],
) -> Result<HashMap<i64, BirdGenetics>> {
    let bird_ids: Vec<i64> = birds.iter().map(|b| b.id).collect();

    let visible_links = BirdColorProperty::find()
        .filter(bird_color_property::Column::BirdId.is_in(bird_ids.clone()))
        .all(db)
        .await?;
    let split_links = BirdSplitProperty::find()
        .filter(bird_split_property::Column::BirdId.is_in(bird_ids))
        .all(db)
        .await?;

    let property_ids: HashSet<i64> = visible_links
        .iter()
        .map(|l| l.color_property_id)
        .chain(split_links.iter().map(|l| l.color_property_id))
        .collect();
    let properties: Vec<color_property::Model> = ColorProperty::find()
        .filter(color_property::Column::Id.is_in(property_ids))
        .order_by_asc(color_property::Column::Rank)
        .order_by_asc(color_property::Column::Id)
        .all(db)
        .await?;

    let mut genetics: HashMap<i64, BirdGenetics> = birds
        .iter()
        .map(|b| {
            (
                b.id,
                BirdGenetics {
                    color: b.color,
                    ..Default::default()
                },
            )
        })
        .collect();

    let visible: HashSet<(i64, i64)> = visible_links
        .iter()
        .map(|l| (l.bird_id, l.color_property_id))
        .collect();
    let split: HashSet<(i64, i64)> = split_links
        .iter()
        .map(|l| (l.bird_id, l.color_property_id))
        .collect();

    // Properties are already in rank order, so pushing keeps every list sorted
    for property in &properties {
        for (bird_id, entry) in &mut genetics {
            if visible.contains(&(*bird_id, property.id)) {
                entry.visible.push(property.clone());
            }
            if split.contains(&(*bird_id, property.id)) {
                entry.split.push(property.clone());
            }
        }
    }

    Ok(genetics)
}

/// Visible properties of a stored bird, space-separated by rank.
pub async fn color_properties_string<C: ConnectionTrait>(db: &C, bird: &bird::Model) -> Result<String> {
    Ok(load_genetics(db, bird).await?.color_properties_string())
}

/// Split properties of a stored bird, space-separated by rank.
pub async fn split_properties_string<C: ConnectionTrait>(db: &C, bird: &bird::Model) -> Result<String> {
    Ok(load_genetics(db, bird).await?.split_properties_string())
}

/// Canonical color description of a stored bird.
pub async fn descriptive_color<C: ConnectionTrait>(db: &C, bird: &bird::Model) -> Result<String> {
    Ok(load_genetics(db, bird).await?.descriptive_color())
}
