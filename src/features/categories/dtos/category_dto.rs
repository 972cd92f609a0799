use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::categories::models::{Category, CategoryLevel};
use crate::features::categories::services::taxonomy;
use crate::shared::types::{SortDirection, SortKey};

/// Request body for creating or updating a category
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_parent_for_level"))]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 100, message = "Category name must be 1-100 characters"))]
    pub name: String,
    pub level: CategoryLevel,
    pub parent_category: Option<String>,
    pub is_active: bool,
}

fn validate_parent_for_level(
    payload: &CategoryPayload,
) -> Result<(), validator::ValidationError> {
    match (payload.level, payload.parent_category.as_deref()) {
        (CategoryLevel::Main, Some(_)) => Err(validator::ValidationError::new(
            "main_category_with_parent",
        )),
        (CategoryLevel::Sub | CategoryLevel::SubSub, None) => {
            Err(validator::ValidationError::new("missing_parent"))
        }
        _ => Ok(()),
    }
}

/// Error body returned by the admin API on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned by create/update; the API either echoes the record or wraps it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SavedCategoryBody {
    Record(Category),
    Wrapped { category: Category },
    Other(serde_json::Value),
}

impl SavedCategoryBody {
    pub fn into_category(self) -> Option<Category> {
        match self {
            SavedCategoryBody::Record(category) | SavedCategoryBody::Wrapped { category } => {
                Some(category)
            }
            SavedCategoryBody::Other(_) => None,
        }
    }
}

/// Option row for the sub-category filter dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOptionDto {
    pub id: String,
    pub label: String,
}

/// Derived hierarchical view of the flat category list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTreeDto {
    pub id: String,
    pub name: String,
    pub level: CategoryLevel,
    pub is_active: bool,
    pub child_count: usize,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build tree from flat list of categories
    pub fn build_tree(
        categories: &[Category],
        key: SortKey,
        direction: SortDirection,
    ) -> Vec<CategoryTreeDto> {
        let roots = taxonomy::main_categories(categories);

        taxonomy::sort_categories(roots, key, direction, categories)
            .into_iter()
            .map(|root| Self::build_node(root, categories, key, direction))
            .collect()
    }

    // Children must sit exactly one level deeper, so malformed parent links cannot recurse forever.
    fn build_node(
        category: &Category,
        all_categories: &[Category],
        key: SortKey,
        direction: SortDirection,
    ) -> CategoryTreeDto {
        let children: Vec<CategoryTreeDto> = match category.level.child_level() {
            Some(child_level) => {
                let direct: Vec<&Category> = all_categories
                    .iter()
                    .filter(|c| c.level == child_level && c.is_child_of(&category.id))
                    .collect();
                taxonomy::sort_categories(direct, key, direction, all_categories)
                    .into_iter()
                    .map(|child| Self::build_node(child, all_categories, key, direction))
                    .collect()
            }
            None => Vec::new(),
        };

        CategoryTreeDto {
            id: category.id.clone(),
            name: category.name.clone(),
            level: category.level,
            is_active: category.is_active,
            child_count: taxonomy::child_count(all_categories, &category.id),
            children,
        }
    }

    /// Visit every node depth-first, passing the ancestor names
    pub fn walk<F>(&self, ancestors: &mut Vec<String>, visit: &mut F)
    where
        F: FnMut(&CategoryTreeDto, &[String]),
    {
        visit(self, ancestors);
        ancestors.push(self.name.clone());
        for child in &self.children {
            child.walk(ancestors, visit);
        }
        ancestors.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{main_category, sub_category, sub_sub_category};
    use serde_json::json;

    #[test]
    fn test_payload_serializes_api_field_names() {
        let payload = CategoryPayload {
            name: "Frontend".to_string(),
            level: CategoryLevel::Sub,
            parent_category: Some("A".to_string()),
            is_active: true,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "name": "Frontend", "level": 2, "parentCategory": "A", "isActive": true })
        );
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_payload_validation_checks_parent_shape() {
        let orphan = CategoryPayload {
            name: "Frontend".to_string(),
            level: CategoryLevel::Sub,
            parent_category: None,
            is_active: true,
        };
        assert!(orphan.validate().is_err());

        let main_with_parent = CategoryPayload {
            name: "Web".to_string(),
            level: CategoryLevel::Main,
            parent_category: Some("A".to_string()),
            is_active: true,
        };
        assert!(main_with_parent.validate().is_err());

        let too_long = CategoryPayload {
            name: "x".repeat(101),
            level: CategoryLevel::Main,
            parent_category: None,
            is_active: true,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_saved_body_shapes() {
        let record = json!({ "_id": "A", "name": "Web", "level": 1, "parentCategory": null });
        let bare: SavedCategoryBody = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(bare.into_category().map(|c| c.id), Some("A".to_string()));

        let wrapped: SavedCategoryBody =
            serde_json::from_value(json!({ "message": "created", "category": record })).unwrap();
        assert_eq!(wrapped.into_category().map(|c| c.id), Some("A".to_string()));

        let other: SavedCategoryBody =
            serde_json::from_value(json!({ "message": "Category updated" })).unwrap();
        assert!(other.into_category().is_none());
    }

    #[test]
    fn test_build_tree_nests_by_level() {
        let list = vec![
            main_category("A", "Web"),
            sub_category("B", "Frontend", "A"),
            sub_sub_category("C", "React", "B"),
            main_category("D", "Data"),
            // Points at a sub-sub; not a valid child of anything
            sub_sub_category("E", "Stray", "C"),
        ];

        let tree = CategoryTreeDto::build_tree(&list, SortKey::Name, SortDirection::Asc);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "Data");
        assert_eq!(tree[1].name, "Web");
        assert_eq!(tree[1].child_count, 1);
        assert_eq!(tree[1].children[0].id, "B");
        assert_eq!(tree[1].children[0].children[0].id, "C");
        assert!(tree[1].children[0].children[0].children.is_empty());
    }

    #[test]
    fn test_walk_reports_ancestors() {
        let list = vec![
            main_category("A", "Web"),
            sub_category("B", "Frontend", "A"),
            sub_sub_category("C", "React", "B"),
        ];
        let tree = CategoryTreeDto::build_tree(&list, SortKey::Name, SortDirection::Asc);

        let mut seen = Vec::new();
        tree[0].walk(&mut Vec::new(), &mut |node, ancestors| {
            seen.push(format!("{}:{}", ancestors.join("/"), node.name));
        });

        assert_eq!(seen, vec![":Web", "Web:Frontend", "Web/Frontend:React"]);
    }
}
