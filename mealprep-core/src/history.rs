//! Saved menus and their share links.

use chrono::Utc;

use crate::error::HistoryError;
use crate::models::{slugify, RecipeId, SavedMenu};

pub const DEFAULT_SHARE_BASE_URL: &str = "https://mymealprep.app/u/demo";

/// Saved menus, newest first.
#[derive(Debug, Clone)]
pub struct PlanHistory {
    menus: Vec<SavedMenu>,
    share_base_url: String,
}

impl Default for PlanHistory {
    fn default() -> Self {
        Self::new(DEFAULT_SHARE_BASE_URL)
    }
}

impl PlanHistory {
    pub fn new(share_base_url: impl Into<String>) -> Self {
        Self {
            menus: Vec::new(),
            share_base_url: share_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_menus(mut self, menus: Vec<SavedMenu>) -> Self {
        self.menus = menus;
        self
    }

    pub fn into_menus(self) -> Vec<SavedMenu> {
        self.menus
    }

    pub fn list(&self) -> &[SavedMenu] {
        &self.menus
    }

    pub fn find(&self, week: &str) -> Option<&SavedMenu> {
        self.menus.iter().find(|m| m.week == week)
    }

    /// Save both buckets under `week`.
    ///
    /// Saving an existing week replaces its recipes but keeps its slug and
    /// public flag. A new week gets a fresh private menu at the top of the
    /// list.
    pub fn save(
        &mut self,
        week: &str,
        breakfast_ids: Vec<RecipeId>,
        main_ids: Vec<RecipeId>,
    ) -> &SavedMenu {
        if let Some(idx) = self.menus.iter().position(|m| m.week == week) {
            let menu = &mut self.menus[idx];
            menu.breakfast_ids = breakfast_ids;
            menu.main_ids = main_ids;
            menu.updated_at = Utc::now();
            tracing::info!("Updated saved menu '{}'", week);
            return &self.menus[idx];
        }

        let slug = self.unique_slug(&slugify(week));
        self.menus
            .insert(0, SavedMenu::new(week, slug, breakfast_ids, main_ids));
        tracing::info!("Saved new menu '{}'", week);
        &self.menus[0]
    }

    /// Bucket contents of a saved menu, breakfast first.
    pub fn load(&self, week: &str) -> Result<(Vec<RecipeId>, Vec<RecipeId>), HistoryError> {
        self.find(week)
            .map(|m| (m.breakfast_ids.clone(), m.main_ids.clone()))
            .ok_or_else(|| HistoryError::NotFound(week.to_string()))
    }

    pub fn set_public(&mut self, week: &str, public: bool) -> Result<&SavedMenu, HistoryError> {
        let menu = self
            .menus
            .iter_mut()
            .find(|m| m.week == week)
            .ok_or_else(|| HistoryError::NotFound(week.to_string()))?;
        menu.is_public = public;
        menu.updated_at = Utc::now();
        tracing::info!(
            "Menu '{}' is now {}",
            week,
            if public { "public" } else { "private" }
        );
        Ok(&*menu)
    }

    /// Public link for a menu, or None when the menu has no usable slug.
    pub fn share_url(&self, menu: &SavedMenu) -> Option<String> {
        let slug = menu.slug.trim();
        if slug.is_empty() {
            return None;
        }
        Some(format!("{}/{}", self.share_base_url, slug))
    }

    fn unique_slug(&self, base: &str) -> String {
        if base.is_empty() {
            return String::new();
        }
        let taken = |slug: &str| self.menus.iter().any(|m| m.slug == slug);
        if !taken(base) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_new_menu() {
        let mut history = PlanHistory::default();
        let menu = history.save("Week of Oct 6-12, 2025", vec![RecipeId(4)], vec![RecipeId(1)]);

        assert_eq!(menu.slug, "week-of-oct-6-12-2025");
        assert!(!menu.is_public);
        assert_eq!(
            history.share_url(&history.list()[0]).unwrap(),
            "https://mymealprep.app/u/demo/week-of-oct-6-12-2025"
        );
    }

    #[test]
    fn test_resave_keeps_slug_and_public_flag() {
        let mut history = PlanHistory::default();
        history.save("Week 1", vec![RecipeId(1)], vec![]);
        history.set_public("Week 1", true).unwrap();

        let menu = history.save("Week 1", vec![RecipeId(2)], vec![RecipeId(3)]);
        assert!(menu.is_public);
        assert_eq!(menu.slug, "week-1");
        assert_eq!(menu.breakfast_ids, vec![RecipeId(2)]);
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn test_newest_first() {
        let mut history = PlanHistory::default();
        history.save("Week 1", vec![], vec![]);
        history.save("Week 2", vec![], vec![]);
        history.save("Week 1", vec![RecipeId(1)], vec![]);

        let weeks: Vec<&str> = history.list().iter().map(|m| m.week.as_str()).collect();
        assert_eq!(weeks, vec!["Week 2", "Week 1"]);
    }

    #[test]
    fn test_load() {
        let mut history = PlanHistory::default();
        history.save("Week 1", vec![RecipeId(4)], vec![RecipeId(1), RecipeId(2)]);

        let (breakfast, main) = history.load("Week 1").unwrap();
        assert_eq!(breakfast, vec![RecipeId(4)]);
        assert_eq!(main, vec![RecipeId(1), RecipeId(2)]);

        let err = history.load("Week 9").unwrap_err();
        assert_eq!(err, HistoryError::NotFound("Week 9".into()));
    }

    #[test]
    fn test_set_public_unknown_week() {
        let mut history = PlanHistory::default();
        assert!(history.set_public("nope", true).is_err());
    }

    #[test]
    fn test_slug_collision_gets_suffix() {
        let mut history = PlanHistory::default();
        history.save("Week 1", vec![], vec![]);
        history.save("week 1!", vec![], vec![]);
        history.save("WEEK-1", vec![], vec![]);

        assert_eq!(history.find("Week 1").unwrap().slug, "week-1");
        assert_eq!(history.find("week 1!").unwrap().slug, "week-1-2");
        assert_eq!(history.find("WEEK-1").unwrap().slug, "week-1-3");
    }

    #[test]
    fn test_share_url_needs_slug() {
        let mut history = PlanHistory::new("https://example.com/u/me/");
        history.save("???", vec![], vec![]);
        history.save("Week 3", vec![], vec![]);

        assert_eq!(history.share_url(history.find("???").unwrap()), None);
        assert_eq!(
            history.share_url(history.find("Week 3").unwrap()).unwrap(),
            "https://example.com/u/me/week-3"
        );
    }
}
