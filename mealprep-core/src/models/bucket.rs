use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::RecipeId;

/// The two meal slots of a weekly plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketKind {
    Breakfast,
    /// Lunch and dinner
    Main,
}

impl BucketKind {
    pub const ALL: [BucketKind; 2] = [BucketKind::Breakfast, BucketKind::Main];

    /// Heading used when printing the bucket.
    pub fn heading(&self) -> &'static str {
        match self {
            BucketKind::Breakfast => "Breakfast",
            BucketKind::Main => "Lunch + Dinner",
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKind::Breakfast => write!(f, "breakfast"),
            BucketKind::Main => write!(f, "main"),
        }
    }
}

impl FromStr for BucketKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(BucketKind::Breakfast),
            "main" | "lunch" | "dinner" => Ok(BucketKind::Main),
            _ => Err(format!(
                "Invalid bucket '{}'. Valid options: breakfast, main",
                s
            )),
        }
    }
}

/// An ordered, duplicate-free list of recipe ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RecipeId>", into = "Vec<RecipeId>")]
pub struct Bucket {
    ids: Vec<RecipeId>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bucket from ids, keeping the first occurrence of duplicates.
    pub fn from_ids(ids: impl IntoIterator<Item = RecipeId>) -> Self {
        let mut bucket = Self::new();
        for id in ids {
            bucket.add(id);
        }
        bucket
    }

    pub fn ids(&self) -> &[RecipeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: RecipeId) -> bool {
        self.ids.contains(&id)
    }

    /// Append a recipe. Returns false if it was already present.
    pub fn add(&mut self, id: RecipeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove a recipe. Returns true if it was present.
    pub fn remove(&mut self, id: RecipeId) -> bool {
        let len_before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        self.ids.len() != len_before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Reorder the members randomly.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.ids.shuffle(rng);
    }
}

impl From<Vec<RecipeId>> for Bucket {
    fn from(ids: Vec<RecipeId>) -> Self {
        Bucket::from_ids(ids)
    }
}

impl From<Bucket> for Vec<RecipeId> {
    fn from(bucket: Bucket) -> Self {
        bucket.ids
    }
}
