use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryLevel};
use crate::features::categories::services::taxonomy;
use crate::features::categories::services::{CategoryService, NewCategory};

/// State of the create/edit category dialog, including the cascading
/// main → sub parent pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub is_active: bool,
    category_type: CategoryLevel,
    selected_main: Option<String>,
    selected_sub: Option<String>,
    editing_id: Option<String>,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_active: true,
            category_type: CategoryLevel::Main,
            selected_main: None,
            selected_sub: None,
            editing_id: None,
        }
    }
}

impl CategoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the form from an existing category, resolving its parent chain
    pub fn for_edit(categories: &[Category], category: &Category) -> Self {
        let (selected_main, selected_sub) = match category.level {
            CategoryLevel::Main => (None, None),
            CategoryLevel::Sub => (category.parent_category.clone(), None),
            CategoryLevel::SubSub => {
                match category
                    .parent_id()
                    .and_then(|id| taxonomy::find_category(categories, id))
                {
                    Some(parent_sub) => (
                        parent_sub.parent_category.clone(),
                        Some(parent_sub.id.clone()),
                    ),
                    None => (None, None),
                }
            }
        };

        Self {
            name: category.name.clone(),
            is_active: category.is_active,
            category_type: category.level,
            selected_main,
            selected_sub,
            editing_id: Some(category.id.clone()),
        }
    }

    pub fn category_type(&self) -> CategoryLevel {
        self.category_type
    }

    pub fn selected_main(&self) -> Option<&str> {
        self.selected_main.as_deref()
    }

    pub fn selected_sub(&self) -> Option<&str> {
        self.selected_sub.as_deref()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Change the level being created. Returns `false` while editing, since the
    /// level of an existing category cannot change.
    pub fn set_category_type(&mut self, level: CategoryLevel) -> bool {
        if self.is_editing() {
            return false;
        }
        self.category_type = level;
        self.selected_main = None;
        self.selected_sub = None;
        true
    }

    pub fn select_main(&mut self, id: Option<&str>) {
        self.selected_main = id.filter(|id| !id.is_empty()).map(String::from);
        self.selected_sub = None;
    }

    pub fn select_sub(&mut self, id: Option<&str>) {
        self.selected_sub = id.filter(|id| !id.is_empty()).map(String::from);
    }

    /// Parent the new category will be attached to
    pub fn parent_id(&self) -> Option<&str> {
        match self.category_type {
            CategoryLevel::Main => None,
            CategoryLevel::Sub => self.selected_main(),
            CategoryLevel::SubSub => self.selected_sub(),
        }
    }

    /// Sub-categories offered once a main category is picked
    pub fn sub_options<'a>(&self, categories: &'a [Category]) -> Vec<&'a Category> {
        match self.selected_main() {
            Some(main_id) => taxonomy::sub_categories(categories, Some(main_id)),
            None => Vec::new(),
        }
    }

    /// Breadcrumb of the category being built, `None` until the required parents are picked
    pub fn preview_path(&self, categories: &[Category]) -> Option<Vec<String>> {
        let name_of = |id: Option<&str>| {
            id.and_then(|id| taxonomy::find_category(categories, id))
                .map(|c| c.name.clone())
        };

        let mut path = match self.category_type {
            CategoryLevel::Main => Vec::new(),
            CategoryLevel::Sub => vec![name_of(self.selected_main())?],
            CategoryLevel::SubSub => vec![
                name_of(self.selected_main())?,
                name_of(self.selected_sub())?,
            ],
        };
        path.push(self.name.trim().to_string());
        Some(path)
    }

    /// Save through the service; the form resets on success and is left as-is on failure
    pub async fn submit(&mut self, service: &mut CategoryService) -> Result<()> {
        match self.editing_id.clone() {
            Some(id) => {
                service.update(&id, &self.name, self.is_active).await?;
            }
            None => {
                let input = NewCategory {
                    name: self.name.clone(),
                    level: self.category_type,
                    parent_id: self.parent_id().map(String::from),
                    is_active: self.is_active,
                };
                service.create(input).await?;
            }
        }
        *self = Self::new();
        Ok(())
    }
}
