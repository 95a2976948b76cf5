//! Identity Remote Client
//!
//! Login and signup against the `/identity` base path. These are the
//! only unauthenticated operations in the API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::client::ApiClient;
use super::error::ApiResult;

/// Account record as sent by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDto {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Parameters for creating a new account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Remote operations of the identity domain
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ApiResult<IdentityDto>;
    async fn signup(&self, params: &SignupRequest) -> ApiResult<IdentityDto>;
}

/// HTTP implementation of [`IdentityApi`]
pub struct IdentityClient {
    api: Arc<ApiClient>,
}

impl IdentityClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl IdentityApi for IdentityClient {
    async fn login(&self, email: &str, password: &str) -> ApiResult<IdentityDto> {
        let body = LoginRequest { email, password };
        self.api.post("/identity/login", Some(&body), None).await
    }

    async fn signup(&self, params: &SignupRequest) -> ApiResult<IdentityDto> {
        self.api.post("/identity/signup", Some(params), None).await
    }
}
