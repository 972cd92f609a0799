use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryPayload;
use crate::features::categories::models::Category;

/// Remote category persistence, as seen by the store and the mutation gateway
#[async_trait]
pub trait CategoryBackend: Send + Sync {
    /// Fetch the complete flat list
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Returns the stored record when the backend echoes one
    async fn create_category(&self, payload: &CategoryPayload) -> Result<Option<Category>>;

    async fn update_category(&self, id: &str, payload: &CategoryPayload)
        -> Result<Option<Category>>;

    async fn delete_category(&self, id: &str) -> Result<()>;
}
