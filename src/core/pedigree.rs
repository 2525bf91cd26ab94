//! Pedigree engine - Ancestor trees and lineage validation.
//!
//! Trees are rebuilt from the current father/mother links on every call and
//! are never cached. Writes are guarded one hop at a time: a bird cannot be
//! its own parent and must be born after each parent. Longer cycles are not
//! rejected at write time; the tree walk stops expanding a bird that already
//! appears on its own ancestor path so such data still renders.

use crate::{
    core::{
        genetics::{self, BirdGenetics},
        scope,
        tenant::Actor,
    },
    entities::{
        Bird,
        bird::{self, Gender, ParentRole},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// A bird together with its recorded ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorTree {
    pub bird: bird::Model,
    pub ancestors: Ancestors,
}

/// Father and mother branches; `None` where no parent is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestors {
    pub father: Option<Box<AncestorTree>>,
    pub mother: Option<Box<AncestorTree>>,
}

impl AncestorTree {
    /// Number of generations in the deepest branch, the bird itself being 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let father = self.ancestors.father.as_ref().map_or(0, |t| t.depth());
        let mother = self.ancestors.mother.as_ref().map_or(0, |t| t.depth());
        1 + father.max(mother)
    }

    fn collect_birds<'a>(&'a self, out: &mut Vec<&'a bird::Model>) {
        out.push(&self.bird);
        for branch in [&self.ancestors.father, &self.ancestors.mother]
            .into_iter()
            .flatten()
        {
            branch.collect_birds(out);
        }
    }

    /// Every bird in the tree, root first, depth first, father before mother.
    #[must_use]
    pub fn birds(&self) -> Vec<&bird::Model> {
        let mut out = Vec::new();
        self.collect_birds(&mut out);
        out
    }
}

/// Arena of birds keyed by id, holding everything a tree walk may touch.
#[derive(Debug, Clone, Default)]
pub struct Lineage {
    birds: HashMap<i64, bird::Model>,
}

impl Lineage {
    /// Builds an arena from already loaded birds.
    pub fn from_birds(birds: impl IntoIterator<Item = bird::Model>) -> Self {
        Self {
            birds: birds.into_iter().map(|b| (b.id, b)).collect(),
        }
    }

    /// Loads `root` and all of its recorded ancestors, one generation per query.
    pub async fn load<C: ConnectionTrait>(db: &C, root: bird::Model) -> Result<Self> {
        let mut birds = HashMap::new();
        let mut frontier: Vec<i64> = parent_ids(&root);
        birds.insert(root.id, root);

        while !frontier.is_empty() {
            let generation = Bird::find()
                .filter(bird::Column::Id.is_in(frontier))
                .all(db)
                .await?;
            frontier = Vec::new();
            for parent in generation {
                frontier.extend(
                    parent_ids(&parent)
                        .into_iter()
                        .filter(|id| !birds.contains_key(id)),
                );
                birds.insert(parent.id, parent);
            }
            frontier.sort_unstable();
            frontier.dedup();
        }

        debug!("Loaded lineage of {} birds", birds.len());
        Ok(Self { birds })
    }

    /// Looks up a bird in the arena.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&bird::Model> {
        self.birds.get(&id)
    }

    /// All birds in the arena.
    pub fn birds(&self) -> impl Iterator<Item = &bird::Model> {
        self.birds.values()
    }

    /// Builds the ancestor tree of `bird_id`, recursing until a parent is
    /// unrecorded or missing from the arena.
    #[must_use]
    pub fn build_ancestor_tree(&self, bird_id: i64) -> Option<AncestorTree> {
        let mut path = HashSet::new();
        self.build_from(bird_id, &mut path)
    }

    fn build_from(&self, bird_id: i64, path: &mut HashSet<i64>) -> Option<AncestorTree> {
        let bird = self.birds.get(&bird_id)?.clone();
        if !path.insert(bird_id) {
            return Some(AncestorTree {
                bird,
                ancestors: Ancestors::default(),
            });
        }

        let father = bird
            .father_id
            .and_then(|id| self.build_from(id, path))
            .map(Box::new);
        let mother = bird
            .mother_id
            .and_then(|id| self.build_from(id, path))
            .map(Box::new);
        path.remove(&bird_id);

        Some(AncestorTree {
            bird,
            ancestors: Ancestors { father, mother },
        })
    }
}

fn parent_ids(bird: &bird::Model) -> Vec<i64> {
    [bird.father_id, bird.mother_id].into_iter().flatten().collect()
}

/// Builds the ancestor tree of a bird visible to the actor.
#[instrument(skip(db))]
pub async fn build_ancestor_tree<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    bird_id: i64,
) -> Result<AncestorTree> {
    let root = scope::find_visible::<Bird, C>(db, actor, bird_id).await?;
    let lineage = Lineage::load(db, root).await?;
    lineage
        .build_ancestor_tree(bird_id)
        .ok_or_else(|| Error::not_found("bird", bird_id))
}

/// Checks that `candidate` may become `bird`'s parent in the given role.
///
/// Only the direct relation is checked; the chain above the candidate is not
/// walked.
pub fn validate_parent_assignment(
    bird: &bird::Model,
    candidate: &bird::Model,
    role: ParentRole,
) -> Result<()> {
    if candidate.id == bird.id {
        return Err(Error::SelfParent {
            role: role.as_str().to_string(),
        });
    }
    if let (Some(born), Some(parent_born)) = (bird.date_of_birth, candidate.date_of_birth) {
        if born <= parent_born {
            return Err(Error::Chronology {
                role: role.as_str().to_string(),
            });
        }
    }
    Ok(())
}

/// Checks that a bird did not die before it was born. Dying on the day of
/// birth is accepted.
pub fn validate_lifespan(bird: &bird::Model) -> Result<()> {
    validate_dates(bird.date_of_birth, bird.date_of_death)
}

pub(crate) fn validate_dates(born: Option<NaiveDate>, died: Option<NaiveDate>) -> Result<()> {
    match (born, died) {
        (Some(born), Some(died)) if died < born => Err(Error::DeathBeforeBirth),
        _ => Ok(()),
    }
}

/// Compact tree for inbreeding analysis: bird ids under short tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InbreedingNode {
    /// Bird id
    pub i: i64,
    /// Father branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f: Option<Box<InbreedingNode>>,
    /// Mother branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<Box<InbreedingNode>>,
}

impl InbreedingNode {
    fn ids(&self, out: &mut HashSet<i64>) {
        out.insert(self.i);
        for branch in [&self.f, &self.m].into_iter().flatten() {
            branch.ids(out);
        }
    }

    /// Ids of birds that appear on both the father's and the mother's side.
    #[must_use]
    pub fn common_ancestors(&self) -> Vec<i64> {
        let (Some(father), Some(mother)) = (&self.f, &self.m) else {
            return Vec::new();
        };
        let mut paternal = HashSet::new();
        father.ids(&mut paternal);
        let mut maternal = HashSet::new();
        mother.ids(&mut maternal);

        let mut common: Vec<i64> = paternal.intersection(&maternal).copied().collect();
        common.sort_unstable();
        common
    }
}

/// Projects a tree onto its inbreeding form.
#[must_use]
pub fn render_inbreeding_tree(tree: &AncestorTree) -> InbreedingNode {
    InbreedingNode {
        i: tree.bird.id,
        f: tree
            .ancestors
            .father
            .as_deref()
            .map(|t| Box::new(render_inbreeding_tree(t))),
        m: tree
            .ancestors
            .mother
            .as_deref()
            .map(|t| Box::new(render_inbreeding_tree(t))),
    }
}

/// Descriptive tree for visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    pub id: i64,
    pub ring_number: String,
    pub gender: Gender,
    pub descriptive_color: String,
    pub date_of_birth: Option<NaiveDate>,
    pub father: Option<Box<DisplayNode>>,
    pub mother: Option<Box<DisplayNode>>,
}

/// Projects a tree onto its display form using preloaded genetics.
#[must_use]
pub fn render_display_tree(
    tree: &AncestorTree,
    genetics: &HashMap<i64, BirdGenetics>,
) -> DisplayNode {
    let descriptive_color = genetics
        .get(&tree.bird.id)
        .map(BirdGenetics::descriptive_color)
        .unwrap_or_default();
    DisplayNode {
        id: tree.bird.id,
        ring_number: tree.bird.ring_number.clone(),
        gender: tree.bird.gender,
        descriptive_color,
        date_of_birth: tree.bird.date_of_birth,
        father: tree
            .ancestors
            .father
            .as_deref()
            .map(|t| Box::new(render_display_tree(t, genetics))),
        mother: tree
            .ancestors
            .mother
            .as_deref()
            .map(|t| Box::new(render_display_tree(t, genetics))),
    }
}

/// Builds the display tree of a visible bird, loading the genetics of every
/// ancestor.
pub async fn display_tree<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    bird_id: i64,
) -> Result<DisplayNode> {
    let tree = build_ancestor_tree(db, actor, bird_id).await?;
    let birds: Vec<bird::Model> = tree.birds().into_iter().cloned().collect();
    let genetics = genetics::load_genetics_many(db, &birds).await?;
    Ok(render_display_tree(&tree, &genetics))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::bird as birds;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bird_with(id: i64, born: Option<NaiveDate>) -> bird::Model {
        bird::Model {
            id,
            user_id: 1,
            ring_number: format!("R-{id}"),
            gender: Gender::Unknown,
            color: None,
            date_of_birth: born,
            date_of_death: None,
            father_id: None,
            mother_id: None,
            breeder_id: None,
            owner_id: None,
            is_owned: false,
            is_for_sale: false,
            notes: String::new(),
            photo: bird::DEFAULT_PHOTO.to_string(),
        }
    }

    #[test]
    fn test_self_parent_always_rejected() {
        let b = bird_with(1, Some(date(2020, 1, 1)));
        for role in [ParentRole::Father, ParentRole::Mother] {
            assert!(matches!(
                validate_parent_assignment(&b, &b, role),
                Err(Error::SelfParent { .. })
            ));
        }
        let undated = bird_with(2, None);
        assert!(matches!(
            validate_parent_assignment(&undated, &undated, ParentRole::Mother),
            Err(Error::SelfParent { .. })
        ));
    }

    #[test]
    fn test_parent_must_be_older() {
        let child = bird_with(1, Some(date(2021, 5, 1)));
        let same_day = bird_with(2, Some(date(2021, 5, 1)));
        let younger = bird_with(3, Some(date(2022, 1, 1)));
        let older = bird_with(4, Some(date(2019, 1, 1)));

        assert!(matches!(
            validate_parent_assignment(&child, &same_day, ParentRole::Father),
            Err(Error::Chronology { .. })
        ));
        assert!(matches!(
            validate_parent_assignment(&child, &younger, ParentRole::Mother),
            Err(Error::Chronology { .. })
        ));
        assert!(validate_parent_assignment(&child, &older, ParentRole::Father).is_ok());

        // Unknown birth dates are not compared
        assert!(validate_parent_assignment(&child, &bird_with(5, None), ParentRole::Father).is_ok());
    }

    #[test]
    fn test_lifespan_boundaries() {
        let mut b = bird_with(1, Some(date(2020, 6, 1)));
        b.date_of_death = Some(date(2020, 6, 1));
        assert!(validate_lifespan(&b).is_ok());

        b.date_of_death = Some(date(2020, 5, 31));
        assert!(matches!(validate_lifespan(&b), Err(Error::DeathBeforeBirth)));

        b.date_of_birth = None;
        assert!(validate_lifespan(&b).is_ok());
    }

    #[test]
    fn test_tree_without_ancestors_has_depth_one() {
        let lineage = Lineage::from_birds([bird_with(1, None)]);
        let tree = lineage.build_ancestor_tree(1).unwrap();
        assert!(tree.ancestors.father.is_none());
        assert!(tree.ancestors.mother.is_none());
        assert_eq!(tree.depth(), 1);
        assert!(lineage.build_ancestor_tree(42).is_none());
    }

    #[test]
    fn test_cyclic_data_terminates() {
        let mut a = bird_with(1, None);
        let mut b = bird_with(2, None);
        a.father_id = Some(2);
        b.father_id = Some(1);
        let lineage = Lineage::from_birds([a, b]);

        let tree = lineage.build_ancestor_tree(1).unwrap();
        let father = tree.ancestors.father.as_ref().unwrap();
        assert_eq!(father.bird.id, 2);
        let repeated = father.ancestors.father.as_ref().unwrap();
        assert_eq!(repeated.bird.id, 1);
        assert!(repeated.ancestors.father.is_none());
    }

    #[test]
    fn test_common_ancestors_found_on_both_sides() {
        // 4 is grandfather on both sides of 1
        let mut child = bird_with(1, None);
        child.father_id = Some(2);
        child.mother_id = Some(3);
        let mut father = bird_with(2, None);
        father.father_id = Some(4);
        let mut mother = bird_with(3, None);
        mother.father_id = Some(4);
        let lineage = Lineage::from_birds([child, father, mother, bird_with(4, None)]);

        let tree = lineage.build_ancestor_tree(1).unwrap();
        let node = render_inbreeding_tree(&tree);
        assert_eq!(node.i, 1);
        assert_eq!(node.f.as_ref().unwrap().i, 2);
        assert_eq!(node.common_ancestors(), vec![4]);
    }

    #[tokio::test]
    async fn test_three_generation_tree() -> Result<()> {
        let db = setup_test_db().await?;
        let actor = create_test_actor(&db, "alice").await?;
        let gf = create_test_bird(&db, &actor, "GF").await?;
        let gm = create_test_bird(&db, &actor, "GM").await?;
        let f = create_test_bird(&db, &actor, "F").await?;
        let m = create_test_bird(&db, &actor, "M").await?;
        let d = create_test_bird(&db, &actor, "D").await?;
        birds::set_parents(&db, &actor, m.id, Some(gf.id), Some(gm.id)).await?;
        birds::set_parents(&db, &actor, d.id, Some(f.id), Some(m.id)).await?;

        let tree = build_ancestor_tree(&db, &actor, d.id).await?;
        let mother = tree.ancestors.mother.as_ref().unwrap();
        assert_eq!(mother.ancestors.father.as_ref().unwrap().bird, gf);
        assert_eq!(mother.ancestors.mother.as_ref().unwrap().bird.id, gm.id);
        assert_eq!(tree.ancestors.father.as_ref().unwrap().bird.id, f.id);
        assert!(tree.ancestors.father.as_ref().unwrap().ancestors.father.is_none());
        assert_eq!(tree.depth(), 3);

        let display = display_tree(&db, &actor, d.id).await?;
        assert_eq!(display.ring_number, "D");
        assert_eq!(
            display.mother.as_ref().unwrap().father.as_ref().unwrap().ring_number,
            "GF"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_tree_of_other_tenant_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_actor(&db, "alice").await?;
        let bob = create_test_actor(&db, "bob").await?;
        let bird = create_test_bird(&db, &alice, "A-1").await?;

        let result = build_ancestor_tree(&db, &bob, bird.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }
}
