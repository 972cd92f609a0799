use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Operation, Result};
use crate::features::categories::clients::CategoryBackend;
use crate::features::categories::dtos::{ApiErrorBody, CategoryPayload, SavedCategoryBody};
use crate::features::categories::models::Category;

/// Client for the admin category endpoints
pub struct CategoryApiClient {
    config: ApiConfig,
    http_client: reqwest::Client,
}

impl CategoryApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::transport(Operation::Fetch, e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/categories", self.config.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!(
            "{}/categories/{}",
            self.config.base_url,
            urlencoding::encode(id)
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        self.http_client
            .request(method, url)
            .bearer_auth(&self.config.admin_token)
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Category {} request failed: {}", operation.as_str(), e);
            AppError::transport(operation, e.to_string())
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(Self::error_from_response(operation, response).await)
    }

    async fn error_from_response(operation: Operation, response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        tracing::error!(
            "Category {} rejected: HTTP {} - {}",
            operation.as_str(),
            status,
            body
        );

        match (status, message) {
            (StatusCode::UNAUTHORIZED, message) => AppError::Auth {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| "Unauthorized".to_string()),
            },
            (_, Some(message)) => AppError::Backend {
                status: status.as_u16(),
                message,
            },
            (_, None) => AppError::transport(operation, format!("HTTP {}", status)),
        }
    }

    async fn decode<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse category {} response: {}", operation.as_str(), e);
            AppError::transport(operation, format!("Failed to parse response: {}", e))
        })
    }

    /// Decode a list body element by element, skipping records that do not parse
    fn decode_list(body: serde_json::Value) -> Vec<Category> {
        let serde_json::Value::Array(items) = body else {
            tracing::warn!("Category list response is not an array; treating as empty");
            return Vec::new();
        };

        let total = items.len();
        let categories: Vec<Category> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Category>(item) {
                Ok(category) => Some(category),
                Err(e) => {
                    tracing::warn!("Skipping malformed category record: {}", e);
                    None
                }
            })
            .collect();

        if categories.len() < total {
            tracing::warn!(
                "Skipped {} of {} category records",
                total - categories.len(),
                total
            );
        }
        categories
    }
}

#[async_trait]
impl CategoryBackend for CategoryApiClient {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let url = self.collection_url();
        let response = self
            .send(Operation::Fetch, self.request(Method::GET, &url))
            .await?;
        let body = Self::decode::<serde_json::Value>(Operation::Fetch, response).await?;
        Ok(Self::decode_list(body))
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<Option<Category>> {
        let url = self.collection_url();
        let response = self
            .send(
                Operation::Create,
                self.request(Method::POST, &url).json(payload),
            )
            .await?;
        let body = Self::decode::<SavedCategoryBody>(Operation::Create, response).await?;
        Ok(body.into_category())
    }

    async fn update_category(
        &self,
        id: &str,
        payload: &CategoryPayload,
    ) -> Result<Option<Category>> {
        let url = self.item_url(id);
        let response = self
            .send(
                Operation::Update,
                self.request(Method::PUT, &url).json(payload),
            )
            .await?;
        let body = Self::decode::<SavedCategoryBody>(Operation::Update, response).await?;
        Ok(body.into_category())
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        let url = self.item_url(id);
        self.send(Operation::Delete, self.request(Method::DELETE, &url))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::CategoryLevel;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::{get, put},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(url: &str) -> CategoryApiClient {
        CategoryApiClient::new(ApiConfig::new(url, "test-token", Duration::from_secs(5))).unwrap()
    }

    fn payload() -> CategoryPayload {
        CategoryPayload {
            name: "Web Dev".to_string(),
            level: CategoryLevel::Main,
            parent_category: None,
            is_active: true,
        }
    }

    async fn list_handler(headers: HeaderMap) -> impl IntoResponse {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer test-token") {
            return (AxumStatus::UNAUTHORIZED, Json(json!({ "message": "Invalid token" })));
        }
        (
            AxumStatus::OK,
            Json(json!([
                { "_id": "A", "name": "Web", "level": 1, "parentCategory": null, "isActive": true },
                { "_id": "B", "name": "Frontend", "level": 2,
                  "parentCategory": { "_id": "A", "name": "Web" }, "isActive": true },
                { "_id": "bad", "level": 9 }
            ])),
        )
    }

    #[tokio::test]
    async fn test_list_sends_bearer_token_and_skips_bad_records() {
        let router = Router::new().route("/api/admin/categories", get(list_handler));
        let url = spawn_backend(router).await;

        let categories = client_for(&url).list_categories().await.unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].parent_id(), Some("A"));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let router = Router::new().route("/api/admin/categories", get(list_handler));
        let url = spawn_backend(router).await;
        let client = CategoryApiClient::new(ApiConfig::new(
            &url,
            "expired",
            Duration::from_secs(5),
        ))
        .unwrap();

        let err = client.list_categories().await.unwrap_err();

        assert!(matches!(err, AppError::Auth { status: 401, .. }));
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[tokio::test]
    async fn test_non_array_list_is_empty() {
        let router = Router::new().route(
            "/api/admin/categories",
            get(|| async { Json(json!({ "categories": [] })) }),
        );
        let url = spawn_backend(router).await;

        let categories = client_for(&url).list_categories().await.unwrap();
        assert!(categories.is_empty());
    }

    #[tokio::test]
    async fn test_create_posts_payload_and_reads_wrapped_record() {
        let router = Router::new().route(
            "/api/admin/categories",
            axum::routing::post(|Json(body): Json<Value>| async move {
                assert_eq!(body["name"], "Web Dev");
                assert_eq!(body["level"], 1);
                assert_eq!(body["parentCategory"], Value::Null);
                (
                    AxumStatus::CREATED,
                    Json(json!({
                        "message": "Category created",
                        "category": {
                            "_id": "N1", "name": "Web Dev", "level": 1, "parentCategory": null
                        }
                    })),
                )
            }),
        );
        let url = spawn_backend(router).await;

        let created = client_for(&url).create_category(&payload()).await.unwrap();
        assert_eq!(created.map(|c| c.id), Some("N1".to_string()));
    }

    #[tokio::test]
    async fn test_backend_message_is_surfaced() {
        let router = Router::new().route(
            "/api/admin/categories/{id}",
            put(|Path(id): Path<String>| async move {
                (
                    AxumStatus::CONFLICT,
                    Json(json!({ "message": format!("Duplicate name for {}", id) })),
                )
            })
            .delete(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let url = spawn_backend(router).await;
        let client = client_for(&url);

        let err = client.update_category("a/b", &payload()).await.unwrap_err();
        assert!(matches!(err, AppError::Backend { status: 409, .. }));
        assert_eq!(err.to_string(), "Duplicate name for a/b");

        let err = client.delete_category("A").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Transport {
                operation: Operation::Delete,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Failed to delete category. Please try again.");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{}", addr))
            .list_categories()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Transport {
                operation: Operation::Fetch,
                ..
            }
        ));
    }
}
