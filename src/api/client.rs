//! API client for the website backend REST API.
//!
//! All endpoints respond with a `{success, data, message}` envelope. A
//! well-formed response with `success: false` is reported as
//! `ApiError::Rejected`; everything else unexpected collapses into the
//! transport/shape variants of `ApiError`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{BlogPost, CareerApplication, ContactInquiry, UserProfile};

use super::ApiError;

/// HTTP request timeout in seconds.
/// The backend answers quickly when healthy; failing fast keeps the session
/// guard from stalling the UI on a dead connection.
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Response envelope used by every backend endpoint
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    user: UserProfile,
}

/// Token and profile returned by a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    pub user: UserProfile,
}

/// Authentication surface of the backend, as seen by the session guard.
/// `ApiClient` is the production implementation; tests substitute a stub.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError>;
    async fn verify_token(&self, token: &str) -> Result<UserProfile, ApiError>;
}

/// API client for the website backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token (after logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Read the envelope from a response and return its `data` payload.
    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("bad envelope: {}", e)))?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(ApiError::Rejected(message));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse("success response without data".to_string()))
    }

    /// Like `parse_data`, but for endpoints that acknowledge without a payload
    /// (deletes). Only the `success` flag is checked.
    async fn parse_ack(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        let envelope: Envelope<serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("bad envelope: {}", e)))?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(ApiError::Rejected(message));
        }

        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.authed(self.client.get(&url)).send().await?;
        Self::parse_data(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "PUT");
        let response = self.authed(self.client.put(&url)).json(body).send().await?;
        Self::parse_data(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(url = %url, "DELETE");
        let response = self.authed(self.client.delete(&url)).send().await?;
        Self::parse_ack(response).await
    }

    // ===== Blog posts =====

    pub async fn fetch_posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.get("/blogs").await
    }

    pub async fn set_post_published(
        &self,
        id: &str,
        published: bool,
    ) -> Result<BlogPost, ApiError> {
        let path = format!("/blogs/{}", id);
        self.put(&path, &serde_json::json!({ "published": published }))
            .await
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/blogs/{}", id)).await
    }

    // ===== Career applications =====

    pub async fn fetch_applications(&self) -> Result<Vec<CareerApplication>, ApiError> {
        self.get("/careers").await
    }

    pub async fn set_application_status(
        &self,
        id: &str,
        status: crate::models::ApplicationStatus,
    ) -> Result<CareerApplication, ApiError> {
        let path = format!("/careers/{}", id);
        self.put(&path, &serde_json::json!({ "status": status })).await
    }

    pub async fn delete_application(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/careers/{}", id)).await
    }

    // ===== Contact inquiries =====

    pub async fn fetch_inquiries(&self) -> Result<Vec<ContactInquiry>, ApiError> {
        self.get("/contacts").await
    }

    pub async fn set_inquiry_read(&self, id: &str, read: bool) -> Result<ContactInquiry, ApiError> {
        let path = format!("/contacts/{}", id);
        self.put(&path, &serde_json::json!({ "read": read })).await
    }

    pub async fn delete_inquiry(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/contacts/{}", id)).await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    /// POST /auth/login with the raw credentials; bearer token not required
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError> {
        let url = self.url("/auth/login");
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self.client.post(&url).json(&body).send().await?;
        Self::parse_data(response).await
    }

    /// GET /auth/verify with the supplied token (not the client's own) so the
    /// session guard stays the sole owner of the persisted token.
    async fn verify_token(&self, token: &str) -> Result<UserProfile, ApiError> {
        let url = self.url("/auth/verify");
        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let data: VerifyData = Self::parse_data(response).await?;
        Ok(data.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_envelope() {
        let json = r#"{
            "success": true,
            "data": {
                "token": "eyJhbGciOiJIUzI1NiJ9.abc.def",
                "user": {"name": "Dana Okafor", "email": "dana@example.com"}
            }
        }"#;

        let envelope: Envelope<LoginGrant> =
            serde_json::from_str(json).expect("Failed to parse login envelope");
        assert!(envelope.success);
        let grant = envelope.data.expect("missing data");
        assert_eq!(grant.token, "eyJhbGciOiJIUzI1NiJ9.abc.def");
        assert_eq!(grant.user.email, "dana@example.com");
    }

    #[test]
    fn test_parse_rejected_envelope() {
        let json = r#"{"success": false, "message": "Invalid credentials"}"#;
        let envelope: Envelope<LoginGrant> =
            serde_json::from_str(json).expect("Failed to parse rejection envelope");
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_parse_verify_envelope() {
        let json = r#"{"success": true, "data": {"user": {"name": "A", "email": "a@x.com"}}}"#;
        let envelope: Envelope<VerifyData> =
            serde_json::from_str(json).expect("Failed to parse verify envelope");
        let user = envelope.data.expect("missing data").user;
        assert_eq!(user.name, "A");
        assert_eq!(user.email, "a@x.com");
    }

    #[test]
    fn test_parse_post_list_envelope() {
        let json = r#"{
            "success": true,
            "data": [
                {"_id": "p1", "title": "First pour", "published": true},
                {"_id": "p2", "title": "Draft notes"}
            ]
        }"#;
        let envelope: Envelope<Vec<BlogPost>> =
            serde_json::from_str(json).expect("Failed to parse post list");
        let posts = envelope.data.expect("missing data");
        assert_eq!(posts.len(), 2);
        assert!(posts[0].published);
        assert!(!posts[1].published);
    }

    #[test]
    fn test_malformed_envelope_is_an_error() {
        let result = serde_json::from_str::<Envelope<LoginGrant>>("<html>502</html>");
        assert!(result.is_err());
    }
}
