use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::ValidationError;

/// Depth of a category in the three-level taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CategoryLevel {
    Main = 1,
    Sub = 2,
    SubSub = 3,
}

impl CategoryLevel {
    pub const ALL: [CategoryLevel; 3] = [
        CategoryLevel::Main,
        CategoryLevel::Sub,
        CategoryLevel::SubSub,
    ];

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLevel::Main => "main",
            CategoryLevel::Sub => "sub",
            CategoryLevel::SubSub => "sub-sub",
        }
    }

    /// Level a parent must have, `None` for main categories
    pub fn parent_level(&self) -> Option<CategoryLevel> {
        match self {
            CategoryLevel::Main => None,
            CategoryLevel::Sub => Some(CategoryLevel::Main),
            CategoryLevel::SubSub => Some(CategoryLevel::Sub),
        }
    }

    pub fn child_level(&self) -> Option<CategoryLevel> {
        match self {
            CategoryLevel::Main => Some(CategoryLevel::Sub),
            CategoryLevel::Sub => Some(CategoryLevel::SubSub),
            CategoryLevel::SubSub => None,
        }
    }
}

impl TryFrom<u8> for CategoryLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CategoryLevel::Main),
            2 => Ok(CategoryLevel::Sub),
            3 => Ok(CategoryLevel::SubSub),
            other => Err(ValidationError::InvalidLevel(other)),
        }
    }
}

impl From<CategoryLevel> for u8 {
    fn from(level: CategoryLevel) -> Self {
        level.as_u8()
    }
}

impl FromStr for CategoryLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" | "1" => Ok(CategoryLevel::Main),
            "sub" | "2" => Ok(CategoryLevel::Sub),
            "sub-sub" | "3" => Ok(CategoryLevel::SubSub),
            other => Err(format!("Unknown category type: {}", other)),
        }
    }
}

impl fmt::Display for CategoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category record as delivered by the admin API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub level: CategoryLevel,
    /// Normalized parent id; the API sends either a bare id or a populated object
    #[serde(default, deserialize_with = "deserialize_parent")]
    pub parent_category: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_category.as_deref()
    }

    pub fn is_child_of(&self, id: &str) -> bool {
        self.parent_id() == Some(id)
    }
}

fn default_is_active() -> bool {
    true
}

/// Wire shapes of `parentCategory`
#[derive(Deserialize)]
#[serde(untagged)]
enum ParentRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
}

fn deserialize_parent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let parent = Option::<ParentRef>::deserialize(deserializer)?;
    Ok(parent
        .map(|p| match p {
            ParentRef::Id(id) => id,
            ParentRef::Populated { id } => id,
        })
        .filter(|id| !id.is_empty()))
}
