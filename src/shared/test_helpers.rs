#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::categories::clients::CategoryBackend;
#[cfg(test)]
use crate::features::categories::dtos::CategoryPayload;
#[cfg(test)]
use crate::features::categories::models::{Category, CategoryLevel};

#[cfg(test)]
fn category(id: &str, name: &str, level: CategoryLevel, parent: Option<&str>) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        level,
        parent_category: parent.map(String::from),
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
pub fn main_category(id: &str, name: &str) -> Category {
    category(id, name, CategoryLevel::Main, None)
}

#[cfg(test)]
pub fn sub_category(id: &str, name: &str, parent: &str) -> Category {
    category(id, name, CategoryLevel::Sub, Some(parent))
}

#[cfg(test)]
pub fn sub_sub_category(id: &str, name: &str, parent: &str) -> Category {
    category(id, name, CategoryLevel::SubSub, Some(parent))
}

/// A call observed by [`InMemoryBackend`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    List,
    Create(CategoryPayload),
    Update(String, CategoryPayload),
    Delete(String),
}

#[cfg(test)]
#[derive(Default)]
struct BackendState {
    categories: Vec<Category>,
    calls: Vec<BackendCall>,
    next_id: usize,
    list_failure: Option<AppError>,
    mutation_failure: Option<AppError>,
}

/// Backend fake that keeps categories in memory and records every call
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
}

#[cfg(test)]
#[allow(dead_code)]
impl InMemoryBackend {
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            state: Mutex::new(BackendState {
                categories,
                ..BackendState::default()
            }),
        }
    }

    pub fn fail_next_list(&self, error: AppError) {
        self.state.lock().unwrap().list_failure = Some(error);
    }

    pub fn fail_next_mutation(&self, error: AppError) {
        self.state.lock().unwrap().mutation_failure = Some(error);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than list fetches
    pub fn mutation_calls(&self) -> Vec<BackendCall> {
        self.calls()
            .into_iter()
            .filter(|c| *c != BackendCall::List)
            .collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl CategoryBackend for InMemoryBackend {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(BackendCall::List);
        match state.list_failure.take() {
            Some(error) => Err(error),
            None => Ok(state.categories.clone()),
        }
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<Option<Category>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(BackendCall::Create(payload.clone()));
        if let Some(error) = state.mutation_failure.take() {
            return Err(error);
        }

        state.next_id += 1;
        let mut created = category(
            &format!("cat-{}", state.next_id),
            &payload.name,
            payload.level,
            payload.parent_category.as_deref(),
        );
        created.is_active = payload.is_active;
        state.categories.push(created.clone());
        Ok(Some(created))
    }

    async fn update_category(
        &self,
        id: &str,
        payload: &CategoryPayload,
    ) -> Result<Option<Category>> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(BackendCall::Update(id.to_string(), payload.clone()));
        if let Some(error) = state.mutation_failure.take() {
            return Err(error);
        }

        let existing = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::Backend {
                status: 404,
                message: "Category not found".to_string(),
            })?;
        existing.name = payload.name.clone();
        existing.is_active = payload.is_active;
        Ok(Some(existing.clone()))
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(BackendCall::Delete(id.to_string()));
        if let Some(error) = state.mutation_failure.take() {
            return Err(error);
        }

        state.categories.retain(|c| c.id != id);
        Ok(())
    }
}
