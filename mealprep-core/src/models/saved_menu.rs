use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecipeId;

/// A named snapshot of both plan buckets.
///
/// The week label is the upsert key. The slug is derived from the label at
/// first save and is kept for the lifetime of the menu, so a shared link
/// never changes under the people it was sent to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedMenu {
    pub week: String,
    pub slug: String,
    pub breakfast_ids: Vec<RecipeId>,
    pub main_ids: Vec<RecipeId>,
    pub is_public: bool,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedMenu {
    pub fn new(
        week: impl Into<String>,
        slug: impl Into<String>,
        breakfast_ids: Vec<RecipeId>,
        main_ids: Vec<RecipeId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            week: week.into(),
            slug: slug.into(),
            breakfast_ids,
            main_ids,
            is_public: false,
            saved_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Display for SavedMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visibility = if self.is_public { "public" } else { "private" };
        write!(
            f,
            "{} ({} breakfast, {} main, {})",
            self.week,
            self.breakfast_ids.len(),
            self.main_ids.len(),
            visibility
        )
    }
}

/// Turn a label into a URL-safe slug.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and trims leading/trailing dashes. May return an empty
/// string (e.g. for a label made only of punctuation).
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;

    for c in label.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
