//! Event Remote Client
//!
//! Catalogue reads and ticket purchases against the `/event` base
//! path. All operations require a session token. Category, date range
//! and distance are deliberately NOT query parameters: those filters
//! are evaluated client-side over the cached collection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::client::ApiClient;
use super::error::ApiResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTypeDto {
    pub name: String,
    pub price: f64,
    pub total_quantity: u32,
    #[serde(default)]
    pub sold_quantity: u32,
}

/// Catalogue event as sent by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-form category string; unknown values degrade to `other`
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub location: LocationDto,
    pub date: i64,
    #[serde(default)]
    pub organizer: OrganizerDto,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub sold: Option<u32>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub ticket_types: Option<Vec<TicketTypeDto>>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseRequest<'a> {
    ticket_type: &'a str,
    quantity: u32,
}

/// Remote operations of the event domain
#[async_trait]
pub trait EventApi: Send + Sync {
    async fn list(&self, token: &str) -> ApiResult<Vec<EventDto>>;
    async fn get(&self, token: &str, id: &str) -> ApiResult<EventDto>;
    async fn purchase_tickets(
        &self,
        token: &str,
        event_id: &str,
        ticket_type: &str,
        quantity: u32,
    ) -> ApiResult<EventDto>;
}

/// HTTP implementation of [`EventApi`]
pub struct EventClient {
    api: Arc<ApiClient>,
}

impl EventClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl EventApi for EventClient {
    async fn list(&self, token: &str) -> ApiResult<Vec<EventDto>> {
        self.api.get("/event", Some(token)).await
    }

    async fn get(&self, token: &str, id: &str) -> ApiResult<EventDto> {
        self.api.get(&format!("/event/{}", id), Some(token)).await
    }

    async fn purchase_tickets(
        &self,
        token: &str,
        event_id: &str,
        ticket_type: &str,
        quantity: u32,
    ) -> ApiResult<EventDto> {
        let body = PurchaseRequest {
            ticket_type,
            quantity,
        };
        self.api
            .post(&format!("/event/{}/purchase", event_id), Some(&body), Some(token))
            .await
    }
}
