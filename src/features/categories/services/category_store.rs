use chrono::{DateTime, Utc};

use crate::core::error::AppError;
use crate::features::categories::clients::CategoryBackend;
use crate::features::categories::models::Category;

/// Holds the last successfully fetched flat list of categories.
///
/// The list is only ever replaced as a whole by [`CategoryStore::load`]; a failed
/// fetch keeps the previous list and records the error instead.
#[derive(Debug, Default)]
pub struct CategoryStore {
    categories: Vec<Category>,
    last_error: Option<AppError>,
    loaded_at: Option<DateTime<Utc>>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the full list and swap it in.
    ///
    /// Returns `true` when the list was replaced.
    pub async fn load(&mut self, backend: &dyn CategoryBackend) -> bool {
        match backend.list_categories().await {
            Ok(categories) => {
                tracing::info!("Loaded {} categories", categories.len());
                self.categories = categories;
                self.last_error = None;
                self.loaded_at = Some(Utc::now());
                true
            }
            Err(e) => {
                tracing::error!("Failed to load categories, keeping previous list: {:?}", e);
                self.last_error = Some(e);
                false
            }
        }
    }

    /// Current flat list, in the order the backend delivered it
    pub fn list(&self) -> &[Category] {
        &self.categories
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}
