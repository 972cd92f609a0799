//! Derived views over the flat category list.
//!
//! Nothing here is cached: every function scans the list it is given, so the
//! results always reflect the latest snapshot held by the store.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::features::categories::dtos::CategoryOptionDto;
use crate::features::categories::models::{Category, CategoryLevel};
use crate::shared::constants::{EMPTY_PATH_LABEL, PATH_SEPARATOR, UNKNOWN_PARENT_LABEL};
use crate::shared::types::{SortDirection, SortKey};

/// Per-level totals shown above the category tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub main: usize,
    pub sub: usize,
    pub sub_sub: usize,
    pub total: usize,
}

pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id == id)
}

fn by_level<'a>(
    categories: &'a [Category],
    level: CategoryLevel,
    parent_id: Option<&str>,
) -> Vec<&'a Category> {
    let parent_id = parent_id.filter(|id| !id.is_empty());
    categories
        .iter()
        .filter(|c| c.level == level)
        .filter(|c| parent_id.map_or(true, |id| c.is_child_of(id)))
        .collect()
}

pub fn main_categories(categories: &[Category]) -> Vec<&Category> {
    by_level(categories, CategoryLevel::Main, None)
}

/// Level-2 categories, optionally narrowed to those under `parent_id` (an empty id means all)
pub fn sub_categories<'a>(
    categories: &'a [Category],
    parent_id: Option<&str>,
) -> Vec<&'a Category> {
    by_level(categories, CategoryLevel::Sub, parent_id)
}

/// Level-3 categories, optionally narrowed to those under `parent_id`
pub fn sub_sub_categories<'a>(
    categories: &'a [Category],
    parent_id: Option<&str>,
) -> Vec<&'a Category> {
    by_level(categories, CategoryLevel::SubSub, parent_id)
}

/// Number of categories pointing at `id` as their parent, whatever their level
pub fn child_count(categories: &[Category], id: &str) -> usize {
    categories.iter().filter(|c| c.is_child_of(id)).count()
}

fn child_counts(categories: &[Category]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for parent in categories.iter().filter_map(|c| c.parent_id()) {
        *counts.entry(parent).or_insert(0) += 1;
    }
    counts
}

/// Ancestors of `id` from the root down, ending with `id` itself.
///
/// Stops silently at a parent id that does not resolve. Empty when `id` is
/// absent or unknown.
pub fn ancestors_of<'a>(categories: &'a [Category], id: Option<&str>) -> Vec<&'a Category> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = id.and_then(|id| find_category(categories, id));

    while let Some(category) = current {
        if !visited.insert(category.id.as_str()) {
            tracing::warn!("Cycle detected in category parents at '{}'", category.id);
            break;
        }
        chain.push(category);
        current = category
            .parent_id()
            .and_then(|parent| find_category(categories, parent));
    }

    chain.reverse();
    chain
}

/// Names from the root ancestor down to `id`
pub fn path_of(categories: &[Category], id: Option<&str>) -> Vec<String> {
    ancestors_of(categories, id)
        .into_iter()
        .map(|c| c.name.clone())
        .collect()
}

/// Breadcrumb such as `Web > Frontend > React`, or `None` for an empty path
pub fn path_label(categories: &[Category], id: Option<&str>) -> String {
    let path = path_of(categories, id);
    if path.is_empty() {
        EMPTY_PATH_LABEL.to_string()
    } else {
        path.join(PATH_SEPARATOR)
    }
}

/// The main category a sub (or sub-sub) category ultimately hangs from
pub fn parent_main_category_of<'a>(
    categories: &'a [Category],
    sub_category_id: &str,
) -> Option<&'a Category> {
    let chain = ancestors_of(categories, Some(sub_category_id));
    let (target, ancestors) = chain.split_last()?;
    if target.level == CategoryLevel::Main {
        return None;
    }
    ancestors
        .iter()
        .copied()
        .find(|c| c.level == CategoryLevel::Main)
}

/// Stable sort; ties keep their order from the input
pub fn sort_categories<'a>(
    mut items: Vec<&'a Category>,
    key: SortKey,
    direction: SortDirection,
    all_categories: &[Category],
) -> Vec<&'a Category> {
    match key {
        SortKey::Name => items.sort_by(|a, b| {
            direction.apply(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }),
        SortKey::Id => items.sort_by(|a, b| direction.apply(a.id.cmp(&b.id))),
        SortKey::ChildCount => {
            let counts = child_counts(all_categories);
            let count = |c: &Category| counts.get(c.id.as_str()).copied().unwrap_or(0);
            items.sort_by(|a, b| direction.apply(count(*a).cmp(&count(*b))));
        }
    }
    items
}

pub fn category_stats(categories: &[Category]) -> CategoryStats {
    let mut stats = CategoryStats {
        total: categories.len(),
        ..CategoryStats::default()
    };
    for category in categories {
        match category.level {
            CategoryLevel::Main => stats.main += 1,
            CategoryLevel::Sub => stats.sub += 1,
            CategoryLevel::SubSub => stats.sub_sub += 1,
        }
    }
    stats
}

/// Every sub-category labelled with its main category, for the filter dropdown
pub fn sub_category_filter_options(categories: &[Category]) -> Vec<CategoryOptionDto> {
    sub_categories(categories, None)
        .into_iter()
        .map(|sub| {
            let parent = parent_main_category_of(categories, &sub.id)
                .map(|main| main.name.as_str())
                .unwrap_or(UNKNOWN_PARENT_LABEL);
            CategoryOptionDto {
                id: sub.id.clone(),
                label: format!("{} ({})", sub.name, parent),
            }
        })
        .collect()
}
