use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::category::domain::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::category::repository::CategoryRepository;
use crate::context::CallContext;
use crate::errors::ServiceError;

/// Category port backed by the advertisement storage HTTP API.
#[derive(Debug, Clone)]
pub struct RemoteCategoryRepository {
    client: Client,
    base_url: String,
}

/// Error body rendered by the storage routers.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

fn status_error(status: StatusCode, message: String) -> ServiceError {
    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(message),
        StatusCode::CONFLICT => ServiceError::Conflict(message),
        StatusCode::BAD_REQUEST => ServiceError::Validation(message),
        StatusCode::SERVICE_UNAVAILABLE => ServiceError::Cancelled,
        StatusCode::GATEWAY_TIMEOUT => ServiceError::DeadlineExceeded,
        s => ServiceError::Upstream(format!("storage returned {}: {}", s.as_u16(), message)),
    }
}

fn transport_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::DeadlineExceeded
    } else {
        ServiceError::Upstream(e.to_string())
    }
}

impl RemoteCategoryRepository {
    /// `base_url` is the storage root, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("failed to create HTTP client: {}", e))?;
        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn url(&self, path: &str) -> String {
        format!("{}/api/categories{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, ctx: &CallContext, req: RequestBuilder) -> Result<T, ServiceError> {
        let req = match ctx.remaining() {
            Some(left) => req.timeout(left),
            None => req,
        };
        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .map(|b| b.message)
                .unwrap_or_default();
            debug!(status = status.as_u16(), %message, "storage rejected category call");
            return Err(status_error(status, message));
        }
        resp.json::<T>().await.map_err(|e| ServiceError::Upstream(format!("invalid storage response: {}", e)))
    }
}

#[async_trait]
impl CategoryRepository for RemoteCategoryRepository {
    async fn create(&self, ctx: &CallContext, req: &CreateCategoryRequest) -> Result<Category, ServiceError> {
        self.send(ctx, self.client.post(self.url("")).json(req)).await
    }

    async fn get_by_id(&self, ctx: &CallContext, id: i64) -> Result<Category, ServiceError> {
        self.send(ctx, self.client.get(self.url(&format!("/{}", id)))).await
    }

    async fn get_by_alias(&self, ctx: &CallContext, alias: &str) -> Result<Category, ServiceError> {
        let mut url = reqwest::Url::parse(&self.url("/alias/"))
            .map_err(|e| ServiceError::Upstream(format!("invalid storage address: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::Upstream("storage address cannot be a base".into()))?
            .pop_if_empty()
            .push(alias);
        self.send(ctx, self.client.get(url)).await
    }

    async fn get_all(&self, ctx: &CallContext) -> Result<Vec<Category>, ServiceError> {
        self.send(ctx, self.client.get(self.url(""))).await
    }

    async fn update(&self, ctx: &CallContext, req: &UpdateCategoryRequest) -> Result<Category, ServiceError> {
        self.send(ctx, self.client.put(self.url(&format!("/{}", req.id))).json(req)).await
    }

    async fn delete(&self, ctx: &CallContext, id: i64) -> Result<(), ServiceError> {
        let _: serde_json::Value = self.send(ctx, self.client.delete(self.url(&format!("/{}", id)))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_error_kinds() {
        assert_eq!(status_error(StatusCode::NOT_FOUND, "category 3 not found".into()), ServiceError::NotFound("category 3 not found".into()));
        assert!(matches!(status_error(StatusCode::CONFLICT, String::new()), ServiceError::Conflict(_)));
        assert!(matches!(status_error(StatusCode::BAD_REQUEST, String::new()), ServiceError::Validation(_)));
        assert_eq!(status_error(StatusCode::GATEWAY_TIMEOUT, String::new()), ServiceError::DeadlineExceeded);
        assert!(matches!(status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()), ServiceError::Upstream(m) if m.contains("500")));
    }

    #[test]
    fn base_url_is_trimmed() {
        let repo = RemoteCategoryRepository::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(repo.base_url(), "http://127.0.0.1:8000");
        assert_eq!(repo.url("/4"), "http://127.0.0.1:8000/api/categories/4");
    }

    #[tokio::test]
    async fn unreachable_storage_is_an_upstream_error() {
        // port 9 (discard) is not expected to accept HTTP
        let repo = RemoteCategoryRepository::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let res = repo.get_by_id(&CallContext::new(), 1).await;
        assert!(matches!(res, Err(ServiceError::Upstream(_)) | Err(ServiceError::DeadlineExceeded)));
    }
}
