use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result, ValidationError};
use crate::features::categories::clients::CategoryBackend;
use crate::features::categories::dtos::CategoryPayload;
use crate::features::categories::models::{Category, CategoryLevel};
use crate::features::categories::services::taxonomy;
use crate::features::categories::services::CategoryStore;
use crate::shared::validation::normalize_category_name;

/// Progress of the most recent create/update/delete attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationPhase {
    #[default]
    Idle,
    Validating,
    /// Refused locally; nothing was sent
    Rejected,
    Submitting,
    Failed,
    Succeeded,
    ReloadTriggered,
}

impl MutationPhase {
    /// Whether the editing surface should close
    pub fn closes_editor(&self) -> bool {
        matches!(self, MutationPhase::Succeeded | MutationPhase::ReloadTriggered)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, MutationPhase::Validating | MutationPhase::Submitting)
    }
}

/// Input for creating a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub level: CategoryLevel,
    pub parent_id: Option<String>,
    pub is_active: bool,
}

impl NewCategory {
    pub fn main(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: CategoryLevel::Main,
            parent_id: None,
            is_active: true,
        }
    }

    pub fn child(
        name: impl Into<String>,
        level: CategoryLevel,
        parent_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            parent_id: Some(parent_id.into()),
            is_active: true,
        }
    }
}

/// Validates and submits category mutations, then refreshes the store.
///
/// Every mutating method takes `&mut self`, so one service never has two
/// mutations in flight.
pub struct CategoryService {
    backend: Arc<dyn CategoryBackend>,
    store: CategoryStore,
    phase: MutationPhase,
}

impl CategoryService {
    pub fn new(backend: Arc<dyn CategoryBackend>) -> Self {
        Self {
            backend,
            store: CategoryStore::new(),
            phase: MutationPhase::Idle,
        }
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn categories(&self) -> &[Category] {
        self.store.list()
    }

    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// Refetch the flat list; failures are kept on the store
    pub async fn load(&mut self) -> bool {
        self.store.load(self.backend.as_ref()).await
    }

    pub async fn create(&mut self, input: NewCategory) -> Result<Option<Category>> {
        self.transition(MutationPhase::Validating);
        let payload = self.validate_create(input).map_err(|e| self.reject(e))?;

        self.transition(MutationPhase::Submitting);
        let created = self.backend.create_category(&payload).await;
        let created = self.settle(created)?;

        tracing::info!("Created {} category '{}'", payload.level, payload.name);
        self.reload().await;
        Ok(created)
    }

    /// Rename or (de)activate a category; level and parent are sent unchanged
    pub async fn update(
        &mut self,
        id: &str,
        name: &str,
        is_active: bool,
    ) -> Result<Option<Category>> {
        self.transition(MutationPhase::Validating);
        let payload = self
            .validate_update(id, name, is_active)
            .map_err(|e| self.reject(e))?;

        self.transition(MutationPhase::Submitting);
        let updated = self.backend.update_category(id, &payload).await;
        let updated = self.settle(updated)?;

        tracing::info!("Updated category '{}'", id);
        self.reload().await;
        Ok(updated)
    }

    /// Delete a childless category
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.transition(MutationPhase::Validating);
        let count = taxonomy::child_count(self.store.list(), id);
        if count > 0 {
            return Err(self.reject(ValidationError::HasChildren { count }));
        }

        self.transition(MutationPhase::Submitting);
        let deleted = self.backend.delete_category(id).await;
        self.settle(deleted)?;

        tracing::info!("Deleted category '{}'", id);
        self.reload().await;
        Ok(())
    }

    fn validate_create(
        &self,
        input: NewCategory,
    ) -> std::result::Result<CategoryPayload, ValidationError> {
        let name = normalize_category_name(&input.name)?;
        let categories = self.store.list();

        let parent_category = match input.level.parent_level() {
            None => {
                if input.parent_id.is_some() {
                    tracing::debug!("Ignoring parent supplied for main category '{}'", name);
                }
                None
            }
            Some(expected) => {
                let parent_id = input
                    .parent_id
                    .filter(|id| !id.trim().is_empty())
                    .ok_or(ValidationError::MissingParent { level: input.level })?;
                let parent = taxonomy::find_category(categories, &parent_id)
                    .ok_or_else(|| ValidationError::ParentNotFound(parent_id.clone()))?;
                if parent.level != expected {
                    return Err(ValidationError::ParentLevelMismatch {
                        level: input.level,
                        expected,
                        actual: parent.level,
                    });
                }
                Some(parent_id)
            }
        };

        Self::checked(CategoryPayload {
            name,
            level: input.level,
            parent_category,
            is_active: input.is_active,
        })
    }

    fn validate_update(
        &self,
        id: &str,
        name: &str,
        is_active: bool,
    ) -> std::result::Result<CategoryPayload, ValidationError> {
        let name = normalize_category_name(name)?;
        let existing = taxonomy::find_category(self.store.list(), id)
            .ok_or_else(|| ValidationError::NotFound(id.to_string()))?;

        // Stored shape is resent as-is, even when the backend holds an inconsistent record
        Ok(CategoryPayload {
            name,
            level: existing.level,
            parent_category: existing.parent_category.clone(),
            is_active,
        })
    }

    fn checked(payload: CategoryPayload) -> std::result::Result<CategoryPayload, ValidationError> {
        payload
            .validate()
            .map_err(|e| ValidationError::InvalidPayload(e.to_string()))?;
        Ok(payload)
    }

    fn transition(&mut self, next: MutationPhase) {
        tracing::debug!("Category mutation {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn reject(&mut self, error: ValidationError) -> AppError {
        tracing::warn!("Category mutation rejected: {}", error);
        self.transition(MutationPhase::Rejected);
        AppError::Validation(error)
    }

    fn settle<T>(&mut self, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.transition(MutationPhase::Succeeded);
                Ok(value)
            }
            Err(e) => {
                tracing::error!("Category mutation failed: {:?}", e);
                self.transition(MutationPhase::Failed);
                Err(e)
            }
        }
    }

    // Issued only after the mutation's success response has been received.
    async fn reload(&mut self) {
        self.transition(MutationPhase::ReloadTriggered);
        self.load().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Operation;
    use crate::shared::test_helpers::{
        main_category, sub_category, sub_sub_category, BackendCall, InMemoryBackend,
    };

    async fn service_with(categories: Vec<Category>) -> (CategoryService, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::with_categories(categories));
        let mut service = CategoryService::new(backend.clone());
        service.load().await;
        (service, backend)
    }

    #[tokio::test]
    async fn test_create_main_then_reload() {
        let (mut service, backend) = service_with(Vec::new()).await;

        let created = service.create(NewCategory::main("Web Dev")).await.unwrap();

        assert!(created.is_some());
        assert_eq!(service.phase(), MutationPhase::ReloadTriggered);
        assert!(service.phase().closes_editor());

        let matching: Vec<&Category> = service
            .categories()
            .iter()
            .filter(|c| c.name == "Web Dev")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].level, CategoryLevel::Main);
        assert_eq!(matching[0].parent_id(), None);

        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::List,
                BackendCall::Create(CategoryPayload {
                    name: "Web Dev".to_string(),
                    level: CategoryLevel::Main,
                    parent_category: None,
                    is_active: true,
                }),
                BackendCall::List,
            ]
        );
    }

    #[tokio::test]
    async fn test_create_trims_name_and_drops_parent_for_main() {
        let (mut service, backend) = service_with(vec![main_category("A", "Web")]).await;

        let mut input = NewCategory::main("  Data  ");
        input.parent_id = Some("A".to_string());
        service.create(input).await.unwrap();

        match &backend.mutation_calls()[0] {
            BackendCall::Create(payload) => {
                assert_eq!(payload.name, "Data");
                assert_eq!(payload.parent_category, None);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_inconsistent_records_still_sent() {
        let mut orphan_sub = sub_category("B", "Frontend", "A");
        orphan_sub.parent_category = None;
        let mut main_with_parent = main_category("M", "Data");
        main_with_parent.parent_category = Some("X".to_string());
        let (mut service, backend) = service_with(vec![orphan_sub, main_with_parent]).await;

        service.update("B", " Front-end ", true).await.unwrap();
        service.update("M", "Data Science", false).await.unwrap();

        assert_eq!(
            backend.mutation_calls(),
            vec![
                BackendCall::Update(
                    "B".to_string(),
                    CategoryPayload {
                        name: "Front-end".to_string(),
                        level: CategoryLevel::Sub,
                        parent_category: None,
                        is_active: true,
                    }
                ),
                BackendCall::Update(
                    "M".to_string(),
                    CategoryPayload {
                        name: "Data Science".to_string(),
                        level: CategoryLevel::Main,
                        parent_category: Some("X".to_string()),
                        is_active: false,
                    }
                ),
            ]
        );
        assert_eq!(service.phase(), MutationPhase::ReloadTriggered);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_without_network() {
        let (mut service, backend) = service_with(Vec::new()).await;

        let err = service.create(NewCategory::main("   ")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ValidationError::EmptyName)));
        assert_eq!(service.phase(), MutationPhase::Rejected);
        assert!(backend.mutation_calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_parent_below_main() {
        let (mut service, backend) = service_with(vec![main_category("A", "Web")]).await;

        let mut orphan = NewCategory::child("Frontend", CategoryLevel::Sub, "A");
        orphan.parent_id = None;
        let err = service.create(orphan).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingParent {
                level: CategoryLevel::Sub
            })
        ));

        let err = service
            .create(NewCategory::child("React", CategoryLevel::SubSub, "A"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::ParentLevelMismatch { .. })
        ));

        let err = service
            .create(NewCategory::child("Frontend", CategoryLevel::Sub, "missing"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::ParentNotFound(_))
        ));

        assert!(backend.mutation_calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_sub_under_main() {
        let (mut service, _backend) = service_with(vec![main_category("A", "Web")]).await;

        service
            .create(NewCategory::child("Frontend", CategoryLevel::Sub, "A"))
            .await
            .unwrap();

        let subs = taxonomy::sub_categories(service.categories(), Some("A"));
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].name, "Frontend");
    }

    #[tokio::test]
    async fn test_backend_failure_is_returned_verbatim() {
        let (mut service, backend) = service_with(Vec::new()).await;
        backend.fail_next_mutation(AppError::Backend {
            status: 400,
            message: "Category name already exists".to_string(),
        });

        let err = service.create(NewCategory::main("Web")).await.unwrap_err();

        assert_eq!(err.to_string(), "Category name already exists");
        assert_eq!(service.phase(), MutationPhase::Failed);
        assert!(!service.phase().closes_editor());
        // No reload after a failed mutation
        assert_eq!(
            backend.calls().iter().filter(|c| **c == BackendCall::List).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_update_keeps_level_and_parent() {
        let (mut service, backend) = service_with(vec![
            main_category("A", "Web"),
            sub_category("B", "Frontend", "A"),
        ])
        .await;

        service.update("B", " Front-end ", false).await.unwrap();

        assert_eq!(
            backend.mutation_calls(),
            vec![BackendCall::Update(
                "B".to_string(),
                CategoryPayload {
                    name: "Front-end".to_string(),
                    level: CategoryLevel::Sub,
                    parent_category: Some("A".to_string()),
                    is_active: false,
                }
            )]
        );
        let updated = taxonomy::find_category(service.categories(), "B").unwrap();
        assert_eq!(updated.name, "Front-end");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_update_validates_name_and_existence() {
        let (mut service, backend) = service_with(vec![main_category("A", "Web")]).await;

        let err = service.update("A", "", true).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::EmptyName)));

        let err = service.update("Z", "Name", true).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::NotFound(_))));

        assert!(backend.mutation_calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_children_is_refused_locally() {
        let (mut service, backend) = service_with(vec![
            main_category("A", "Main"),
            sub_category("B", "Sub", "A"),
        ])
        .await;

        let err = service.delete("A").await.unwrap_err();

        assert!(err.is_local());
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::HasChildren { count: 1 })
        ));
        assert!(backend.mutation_calls().is_empty());
        assert_eq!(service.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_proceeds_only_when_childless() {
        let list = vec![
            main_category("A", "Main"),
            sub_category("B", "Sub", "A"),
            sub_sub_category("C", "Leaf", "B"),
        ];
        let (mut service, backend) = service_with(list.clone()).await;

        for category in &list {
            let childless = taxonomy::child_count(service.categories(), &category.id) == 0;
            let result = service.delete(&category.id).await;
            assert_eq!(result.is_ok(), childless, "category {}", category.id);
            let sent = backend
                .mutation_calls()
                .contains(&BackendCall::Delete(category.id.clone()));
            assert_eq!(sent, childless);
        }

        assert_eq!(backend.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_reload_after_mutation_is_kept_on_store() {
        let (mut service, backend) = service_with(vec![main_category("A", "Main")]).await;
        backend.fail_next_list(AppError::transport(Operation::Fetch, "reset"));

        service.delete("A").await.unwrap();

        // Mutation succeeded; the stale list stays visible with the fetch error
        assert_eq!(service.categories().len(), 1);
        assert!(service.store().last_error().is_some());
    }
}
