//! Outing Remote Client
//!
//! Outing CRUD, expense activities and debt settlement against the
//! `/outing` base path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::client::ApiClient;
use super::error::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub payer: String,
    pub participants: Vec<String>,
    #[serde(default)]
    pub references: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtDto {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub amount: f64,
    #[serde(default)]
    pub status: String,
}

/// Group outing as sent by the server, children inlined
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutingDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub owner: String,
    #[serde(default)]
    pub participants: Option<Vec<String>>,
    #[serde(default)]
    pub activities: Option<Vec<ActivityDto>>,
    #[serde(default)]
    pub events: Option<Vec<String>>,
    #[serde(default)]
    pub debts: Option<Vec<DebtDto>>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Parameters for creating an outing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOuting {
    pub title: String,
    pub description: String,
    pub participants: Vec<String>,
    pub events: Vec<String>,
}

/// Parameters for adding an expense activity to an outing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub payer: String,
    pub participants: Vec<String>,
    pub references: Vec<String>,
}

/// Remote operations of the outing domain
#[async_trait]
pub trait OutingApi: Send + Sync {
    async fn list(&self, token: &str) -> ApiResult<Vec<OutingDto>>;
    async fn get(&self, token: &str, id: &str) -> ApiResult<OutingDto>;
    async fn create(&self, token: &str, params: &NewOuting) -> ApiResult<OutingDto>;
    async fn add_activity(
        &self,
        token: &str,
        outing_id: &str,
        params: &NewActivity,
    ) -> ApiResult<OutingDto>;
    async fn mark_debt_paid(
        &self,
        token: &str,
        outing_id: &str,
        debt_id: &str,
    ) -> ApiResult<OutingDto>;
}

/// HTTP implementation of [`OutingApi`]
pub struct OutingClient {
    api: Arc<ApiClient>,
}

impl OutingClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OutingApi for OutingClient {
    async fn list(&self, token: &str) -> ApiResult<Vec<OutingDto>> {
        self.api.get("/outing", Some(token)).await
    }

    async fn get(&self, token: &str, id: &str) -> ApiResult<OutingDto> {
        self.api.get(&format!("/outing/{}", id), Some(token)).await
    }

    async fn create(&self, token: &str, params: &NewOuting) -> ApiResult<OutingDto> {
        self.api.post("/outing", Some(params), Some(token)).await
    }

    async fn add_activity(
        &self,
        token: &str,
        outing_id: &str,
        params: &NewActivity,
    ) -> ApiResult<OutingDto> {
        self.api
            .post(&format!("/outing/{}/activity", outing_id), Some(params), Some(token))
            .await
    }

    async fn mark_debt_paid(
        &self,
        token: &str,
        outing_id: &str,
        debt_id: &str,
    ) -> ApiResult<OutingDto> {
        self.api
            .post::<(), OutingDto>(
                &format!("/outing/{}/debt/{}/paid", outing_id, debt_id),
                None,
                Some(token),
            )
            .await
    }
}
