//! Notification Remote Client
//!
//! Notification feed reads and read-receipts against the
//! `/notification` base path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::client::ApiClient;
use super::error::ApiResult;

/// Notification as sent by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: String,
    /// Free-form kind string; unknown values degrade to `other`
    #[serde(rename = "type", default)]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reference_id: String,
    pub sent_at: i64,
    #[serde(default)]
    pub read_at: Option<i64>,
}

/// Remote operations of the notification domain
#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn list(&self, token: &str) -> ApiResult<Vec<NotificationDto>>;
    async fn mark_read(&self, token: &str, id: &str) -> ApiResult<NotificationDto>;
}

/// HTTP implementation of [`NotificationApi`]
pub struct NotificationClient {
    api: Arc<ApiClient>,
}

impl NotificationClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl NotificationApi for NotificationClient {
    async fn list(&self, token: &str) -> ApiResult<Vec<NotificationDto>> {
        self.api.get("/notification", Some(token)).await
    }

    async fn mark_read(&self, token: &str, id: &str) -> ApiResult<NotificationDto> {
        self.api
            .post::<(), NotificationDto>(&format!("/notification/{}/read", id), None, Some(token))
            .await
    }
}
