//! Client for the hosted auth/storage provider.
//!
//! Speaks the provider's REST surface directly: passcode issuance and
//! verification under `/auth/v1`, signed object URLs under `/storage/v1`.
//! The access token obtained on verification lives in the returned
//! `AuthSession` and nowhere else, so concurrent flows never share one.

use super::{AuthSession, Email, IdentityGateway, Passcode, SignedDownloadLink};
use crate::{error::GatewayError, APP_USER_AGENT};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

#[derive(Clone)]
pub struct HostedConfig {
    pub project_url: Url,
    pub anon_key: SecretString,
    pub bucket: String,
}

impl HostedConfig {
    #[must_use]
    pub fn new(project_url: Url, anon_key: SecretString) -> Self {
        Self {
            project_url,
            anon_key,
            bucket: "resumes".to_string(),
        }
    }

    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

impl std::fmt::Debug for HostedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedConfig")
            .field("project_url", &self.project_url.as_str())
            .field("anon_key", &"***")
            .field("bucket", &self.bucket)
            .finish()
    }
}

#[derive(Deserialize)]
struct VerifyResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[derive(Debug)]
pub struct HostedGateway {
    client: Client,
    config: HostedConfig,
}

impl HostedGateway {
    /// # Errors
    /// Returns `GatewayError::Config` if the HTTP client cannot be built.
    pub fn new(config: HostedConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Config(format!("Error creating reqwest client: {e}")))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.config.project_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::Config("project URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_keys(&self, builder: RequestBuilder, bearer: Option<&SecretString>) -> RequestBuilder {
        let anon = self.config.anon_key.expose_secret();
        let bearer = bearer.map_or(anon, |token| token.expose_secret());
        builder
            .header("apikey", anon)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
    }

    /// Resolves the provider's relative `signedURL` against the storage root.
    fn resolve_signed_url(&self, signed_url: &str) -> Result<Url, GatewayError> {
        let base = self.config.project_url.as_str().trim_end_matches('/');
        let path = signed_url.trim_start_matches('/');
        Url::parse(&format!("{base}/storage/v1/{path}"))
            .map_err(|e| GatewayError::Parse(format!("invalid signed URL: {e}")))
    }
}

/// Pulls the human-readable message out of a provider error body.
fn provider_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(ToString::to_string)
}

async fn check(response: Response) -> Result<Response, GatewayError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = provider_message(&body).unwrap_or(body);

    debug!("provider rejected request: {status}");

    Err(GatewayError::provider(status, &message))
}

#[async_trait]
impl IdentityGateway for HostedGateway {
    #[instrument(skip(self, email))]
    async fn request_passcode(&self, email: &Email) -> Result<(), GatewayError> {
        let url = self.endpoint(&["auth", "v1", "otp"])?;
        let payload = json!({
            "email": email.as_str(),
            "create_user": true,
        });

        let response = self
            .with_keys(self.client.post(url), None)
            .json(&payload)
            .send()
            .await?;
        check(response).await?;

        Ok(())
    }

    #[instrument(skip(self, email, code))]
    async fn verify_passcode(
        &self,
        email: &Email,
        code: &Passcode,
    ) -> Result<AuthSession, GatewayError> {
        let url = self.endpoint(&["auth", "v1", "verify"])?;
        let payload = json!({
            "email": email.as_str(),
            "token": code.as_str(),
            "type": "email",
        });

        let response = self
            .with_keys(self.client.post(url), None)
            .json(&payload)
            .send()
            .await?;
        let verified: VerifyResponse = check(response).await?.json().await?;

        // a 200 without a token means the provider did not open a session
        if verified.access_token.trim().is_empty() {
            return Err(GatewayError::NotAuthenticated);
        }

        Ok(AuthSession::new(SecretString::from(verified.access_token)))
    }

    #[instrument(skip(self, session))]
    async fn issue_download_link(
        &self,
        session: &AuthSession,
        object_id: &str,
        ttl_seconds: u64,
    ) -> Result<SignedDownloadLink, GatewayError> {
        let url = self.endpoint(&[
            "storage",
            "v1",
            "object",
            "sign",
            self.config.bucket.as_str(),
            object_id,
        ])?;

        let issued_at = Utc::now();
        let response = self
            .with_keys(self.client.post(url), Some(session.access_token()))
            .json(&json!({ "expiresIn": ttl_seconds }))
            .send()
            .await?;
        let signed: SignResponse = check(response).await?.json().await?;

        let expires_at = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .unwrap_or(issued_at);

        Ok(SignedDownloadLink::new(
            self.resolve_signed_url(&signed.signed_url)?,
            expires_at,
        ))
    }

    #[instrument(skip(self, session))]
    async fn end_session(&self, session: AuthSession) -> Result<(), GatewayError> {
        let url = self.endpoint(&["auth", "v1", "logout"])?;
        let response = self
            .with_keys(self.client.post(url), Some(session.access_token()))
            .send()
            .await?;
        check(response).await?;

        Ok(())
    }
}
