//! Wire Codec
//!
//! Generic request construction and response decoding shared by all
//! per-domain clients: JSON bodies, Bearer authorization, and
//! classification of failures into [`ApiError`]. Response
//! classification is a pure function over (status, body) so it can be
//! tested without a socket.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};

/// Shared HTTP client for one API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// GET `path`, optionally authenticated, decoding the JSON body
    pub(crate) async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ApiResult<R> {
        self.send::<(), R>(Method::GET, path, None, token).await
    }

    /// POST `path` with an optional JSON body, decoding the JSON response
    pub(crate) async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> ApiResult<R> {
        self.send(Method::POST, path, body, token).await
    }

    async fn send<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> ApiResult<R> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            let bytes =
                serde_json::to_vec(body).map_err(|e| ApiError::Encoding(e.to_string()))?;
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        classify_response(status, &body)
    }
}

/// Structured error payload the server attaches to 4xx/5xx responses
#[derive(Debug, Deserialize)]
struct ServerMessage {
    message: String,
}

/// Turn a raw (status, body) pair into a decoded value or a typed error
pub(crate) fn classify_response<R: DeserializeOwned>(status: u16, body: &[u8]) -> ApiResult<R> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body).map_err(|e| ApiError::Decoding(e.to_string()));
    }
    match serde_json::from_slice::<ServerMessage>(body) {
        Ok(err) => Err(ApiError::Server(err.message)),
        Err(_) => Err(ApiError::InvalidResponse(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        id: String,
    }

    #[test]
    fn test_success_body_decodes() {
        let out: ApiResult<Payload> = classify_response(200, br#"{"id":"e1"}"#);
        assert_eq!(out.unwrap(), Payload { id: "e1".to_string() });
    }

    #[test]
    fn test_garbled_success_body_is_decoding_error() {
        let out: ApiResult<Payload> = classify_response(200, b"not json");
        assert!(matches!(out, Err(ApiError::Decoding(_))));
    }

    #[test]
    fn test_structured_failure_becomes_server_error() {
        let out: ApiResult<Payload> =
            classify_response(422, br#"{"message":"title is required"}"#);
        assert_eq!(out.unwrap_err(), ApiError::Server("title is required".to_string()));
    }

    #[test]
    fn test_bare_failure_becomes_invalid_response() {
        let out: ApiResult<Payload> = classify_response(503, b"");
        assert_eq!(out.unwrap_err(), ApiError::InvalidResponse(503));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("https://api.example.com/");
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
