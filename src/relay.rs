//! Resume-view tracking through a form-relay endpoint.
//!
//! The relay accepts any JSON payload. Tracking is telemetry only: the gate
//! spawns it after a reveal and never waits for it, and failures are logged
//! and swallowed.

use crate::{gate::ResumeTracker, gateway::Email, APP_USER_AGENT};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResumeView {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub email: String,
    pub timestamp: String,
    pub page: String,
}

impl ResumeView {
    #[must_use]
    pub fn new(email: &Email, page: &str, at: DateTime<Utc>) -> Self {
        Self {
            kind: "resume_view",
            email: email.to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            page: page.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormRelay {
    client: Client,
    endpoint: Url,
    page: String,
}

impl FormRelay {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: Url, page: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;
        Ok(Self {
            client,
            endpoint,
            page: page.into(),
        })
    }

    /// Posts one resume view.
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self, view))]
    pub async fn submit(&self, view: &ResumeView) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(view)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("{} - {}", self.endpoint, response.status()));
        }

        debug!("resume view recorded");

        Ok(())
    }
}

#[async_trait]
impl ResumeTracker for FormRelay {
    async fn resume_viewed(&self, email: &Email) -> Result<()> {
        let view = ResumeView::new(email, &self.page, Utc::now());
        self.submit(&view).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn view() -> ResumeView {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 17, 30, 0).unwrap();
        ResumeView::new(
            &Email::parse("user@example.com").unwrap(),
            "https://jonathanpham.dev/#resume",
            at,
        )
    }

    #[test]
    fn payload_shape() {
        let value = serde_json::to_value(view()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "resume_view",
                "email": "user@example.com",
                "timestamp": "2024-05-01T17:30:00.000Z",
                "page": "https://jonathanpham.dev/#resume"
            })
        );
    }

    #[tokio::test]
    async fn submit_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/f/resume"))
            .and(header("Accept", "application/json"))
            .and(body_json(serde_json::to_value(view()).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = Url::parse(&format!("{}/f/resume", server.uri())).unwrap();
        let relay = FormRelay::new(endpoint, "https://jonathanpham.dev/").unwrap();
        relay.submit(&view()).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_submission_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let relay = FormRelay::new(Url::parse(&server.uri()).unwrap(), "page").unwrap();
        let email = Email::parse("user@example.com").unwrap();
        assert!(relay.resume_viewed(&email).await.is_err());
    }
}
