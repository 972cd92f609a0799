use std::collections::HashSet;

use crate::features::categories::models::Category;
use crate::features::categories::services::taxonomy;
use crate::shared::types::{SortDirection, SortKey};

/// Expansion, filter and sort state of the category tree view.
///
/// Purely client-side; it never touches the category list itself, only reads it
/// to resolve ancestors and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryViewState {
    expanded_main: HashSet<String>,
    expanded_sub: HashSet<String>,
    filter_main: Option<String>,
    filter_sub: Option<String>,
    sort_key: SortKey,
    sort_order: SortDirection,
}

fn non_empty(id: Option<&str>) -> Option<String> {
    id.map(str::trim).filter(|id| !id.is_empty()).map(String::from)
}

impl CategoryViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state on mount: wide layouts start fully expanded, narrow ones collapsed
    pub fn for_viewport(categories: &[Category], wide: bool) -> Self {
        let mut state = Self::new();
        if wide {
            state.expand_all(categories);
        }
        state
    }

    pub fn with_sort(mut self, key: SortKey, order: SortDirection) -> Self {
        self.set_sort(key, order);
        self
    }

    pub fn expanded_main(&self) -> &HashSet<String> {
        &self.expanded_main
    }

    pub fn expanded_sub(&self) -> &HashSet<String> {
        &self.expanded_sub
    }

    pub fn filter_main(&self) -> Option<&str> {
        self.filter_main.as_deref()
    }

    pub fn filter_sub(&self) -> Option<&str> {
        self.filter_sub.as_deref()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_order(&self) -> SortDirection {
        self.sort_order
    }

    pub fn is_main_expanded(&self, id: &str) -> bool {
        self.expanded_main.contains(id)
    }

    pub fn is_sub_expanded(&self, id: &str) -> bool {
        self.expanded_sub.contains(id)
    }

    pub fn has_active_filters(&self) -> bool {
        self.filter_main.is_some() || self.filter_sub.is_some()
    }

    /// Filter on a main category; clears the sub-category filter
    pub fn set_filter_main(&mut self, id: Option<&str>) {
        self.filter_main = non_empty(id);
        self.filter_sub = None;
        if let Some(id) = &self.filter_main {
            self.expanded_main.insert(id.clone());
        }
    }

    /// Filter on a sub-category; clears the main filter and opens the path to it
    pub fn set_filter_sub(&mut self, categories: &[Category], id: Option<&str>) {
        self.filter_sub = non_empty(id);
        self.filter_main = None;
        self.apply_auto_expansion(categories);
    }

    fn apply_auto_expansion(&mut self, categories: &[Category]) {
        if let Some(sub_id) = self.filter_sub.clone() {
            match taxonomy::parent_main_category_of(categories, &sub_id) {
                Some(main) => {
                    self.expanded_main.insert(main.id.clone());
                }
                None => tracing::debug!("No main category found for sub-category '{}'", sub_id),
            }
            self.expanded_sub.insert(sub_id);
        }
        if let Some(main_id) = &self.filter_main {
            self.expanded_main.insert(main_id.clone());
        }
    }

    /// Collapsing a main category also collapses its direct sub-categories
    pub fn toggle_main(&mut self, categories: &[Category], id: &str) {
        if self.expanded_main.remove(id) {
            for sub in taxonomy::sub_categories(categories, Some(id)) {
                self.expanded_sub.remove(&sub.id);
            }
        } else {
            self.expanded_main.insert(id.to_string());
        }
    }

    pub fn toggle_sub(&mut self, id: &str) {
        if !self.expanded_sub.remove(id) {
            self.expanded_sub.insert(id.to_string());
        }
    }

    /// Reset both filters and collapse everything
    pub fn clear_filters(&mut self) {
        self.filter_main = None;
        self.filter_sub = None;
        self.collapse_all();
    }

    pub fn expand_all(&mut self, categories: &[Category]) {
        self.expanded_main = taxonomy::main_categories(categories)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        self.expanded_sub = taxonomy::sub_categories(categories, None)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded_main.clear();
        self.expanded_sub.clear();
    }

    pub fn set_sort(&mut self, key: SortKey, order: SortDirection) {
        self.sort_key = key;
        self.sort_order = order;
    }

    pub fn reset_sort(&mut self) {
        self.set_sort(SortKey::Name, SortDirection::Asc);
    }

    /// Reconcile with a freshly loaded list.
    ///
    /// Forgets ids that no longer exist and re-applies auto-expansion for the
    /// active filter.
    pub fn sync_with(&mut self, categories: &[Category]) {
        let exists = |id: &String| taxonomy::find_category(categories, id).is_some();

        self.expanded_main.retain(|id| exists(id));
        self.expanded_sub.retain(|id| exists(id));
        if !self.filter_main.as_ref().map_or(true, exists) {
            self.filter_main = None;
        }
        if !self.filter_sub.as_ref().map_or(true, exists) {
            self.filter_sub = None;
        }
        self.apply_auto_expansion(categories);
    }

    /// Main categories to render, after the main filter and sort
    pub fn visible_main_categories<'a>(&self, categories: &'a [Category]) -> Vec<&'a Category> {
        let mains: Vec<&Category> = taxonomy::main_categories(categories)
            .into_iter()
            .filter(|c| self.filter_main.as_ref().map_or(true, |id| *id == c.id))
            .collect();
        taxonomy::sort_categories(mains, self.sort_key, self.sort_order, categories)
    }

    /// Sub-categories of `main_id` to render, narrowed to the sub filter when set
    pub fn visible_sub_categories<'a>(
        &self,
        categories: &'a [Category],
        main_id: &str,
    ) -> Vec<&'a Category> {
        let subs: Vec<&Category> = taxonomy::sub_categories(categories, Some(main_id))
            .into_iter()
            .filter(|c| self.filter_sub.as_ref().map_or(true, |id| *id == c.id))
            .collect();
        taxonomy::sort_categories(subs, self.sort_key, self.sort_order, categories)
    }

    pub fn visible_sub_sub_categories<'a>(
        &self,
        categories: &'a [Category],
        sub_id: &str,
    ) -> Vec<&'a Category> {
        let sub_subs = taxonomy::sub_sub_categories(categories, Some(sub_id));
        taxonomy::sort_categories(sub_subs, self.sort_key, self.sort_order, categories)
    }
}
