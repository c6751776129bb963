//! The weekly plan: a breakfast bucket and a lunch + dinner bucket.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Bucket, BucketKind, Recipe, RecipeId};

/// How many recipes smart fill puts into each bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartFillLimits {
    pub breakfast: usize,
    pub main: usize,
}

impl Default for SmartFillLimits {
    fn default() -> Self {
        Self {
            breakfast: 2,
            main: 6,
        }
    }
}

/// Bucket contents at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSnapshot {
    pub breakfast: Vec<RecipeId>,
    pub main: Vec<RecipeId>,
    pub generation: u64,
}

/// Owns both buckets.
///
/// Every mutation that changes a bucket bumps `generation`, which lets a
/// grocery request started before the change be recognised as stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanState {
    breakfast: Bucket,
    main: Bucket,
    #[serde(default)]
    generation: u64,
}

impl PlanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, kind: BucketKind) -> &Bucket {
        match kind {
            BucketKind::Breakfast => &self.breakfast,
            BucketKind::Main => &self.main,
        }
    }

    fn bucket_mut(&mut self, kind: BucketKind) -> &mut Bucket {
        match kind {
            BucketKind::Breakfast => &mut self.breakfast,
            BucketKind::Main => &mut self.main,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.breakfast.is_empty() && self.main.is_empty()
    }

    /// Add a recipe to a bucket. No-op (returns false) if already present.
    pub fn add_to_bucket(&mut self, kind: BucketKind, recipe_id: RecipeId) -> bool {
        let added = self.bucket_mut(kind).add(recipe_id);
        if added {
            self.bump();
            tracing::info!("Added recipe {} to {}", recipe_id, kind);
        }
        added
    }

    pub fn remove_from_bucket(&mut self, kind: BucketKind, recipe_id: RecipeId) -> bool {
        let removed = self.bucket_mut(kind).remove(recipe_id);
        if removed {
            self.bump();
            tracing::info!("Removed recipe {} from {}", recipe_id, kind);
        }
        removed
    }

    pub fn clear_buckets(&mut self) {
        if self.is_empty() {
            return;
        }
        self.breakfast.clear();
        self.main.clear();
        self.bump();
        tracing::info!("Cleared both buckets");
    }

    /// Randomly reorder one bucket. Membership is unchanged.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, kind: BucketKind, rng: &mut R) {
        if self.bucket(kind).len() < 2 {
            return;
        }
        self.bucket_mut(kind).shuffle(rng);
        self.bump();
    }

    pub fn shuffle_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for kind in BucketKind::ALL {
            self.shuffle(kind, rng);
        }
    }

    /// Replace both buckets with a random selection from `catalog`.
    ///
    /// Breakfast draws from breakfast-tagged recipes and main from the rest;
    /// a bucket whose partition is empty draws from the whole catalog.
    pub fn smart_fill<R: Rng + ?Sized>(
        &mut self,
        catalog: &[Recipe],
        limits: SmartFillLimits,
        rng: &mut R,
    ) {
        let (breakfast, main): (Vec<&Recipe>, Vec<&Recipe>) =
            catalog.iter().partition(|r| r.is_breakfast());

        let breakfast_ids = sample(&breakfast, catalog, limits.breakfast, rng);
        let main_ids = sample(&main, catalog, limits.main, rng);

        tracing::info!(
            "Smart fill picked {} breakfast and {} main recipe(s)",
            breakfast_ids.len(),
            main_ids.len()
        );
        self.replace(breakfast_ids, main_ids);
    }

    /// Set both buckets at once (used when loading a saved menu).
    pub fn replace(&mut self, breakfast: Vec<RecipeId>, main: Vec<RecipeId>) {
        self.breakfast = Bucket::from_ids(breakfast);
        self.main = Bucket::from_ids(main);
        self.bump();
    }

    /// Ids of both buckets, breakfast first.
    pub fn recipe_ids(&self) -> Vec<RecipeId> {
        self.breakfast
            .ids()
            .iter()
            .chain(self.main.ids())
            .copied()
            .collect()
    }

    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            breakfast: self.breakfast.ids().to_vec(),
            main: self.main.ids().to_vec(),
            generation: self.generation,
        }
    }
}

fn sample<R: Rng + ?Sized>(
    pool: &[&Recipe],
    catalog: &[Recipe],
    limit: usize,
    rng: &mut R,
) -> Vec<RecipeId> {
    let mut ids: Vec<RecipeId> = if pool.is_empty() {
        catalog.iter().map(|r| r.id).collect()
    } else {
        pool.iter().map(|r| r.id).collect()
    };
    ids.shuffle(rng);
    ids.truncate(limit);
    ids
}
