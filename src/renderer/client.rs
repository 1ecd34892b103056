//! HTTP client for the PDF renderer
//!
//! Connectivity failures are classified, not passed through: the caller and
//! the UI must be able to tell "service is down" apart from "service
//! returned an error".

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::report::ReportPayload;

/// Outcome of one health check, exactly one of five classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum HealthStatus {
    /// Reachable and returned 2xx
    Ok,
    /// Reachable but returned a non-2xx status
    HttpError(u16),
    /// No response within the health timeout
    Timeout,
    /// Connection could not be established
    Unreachable,
    /// Anything else (DNS failure, protocol error, ...)
    Unknown(String),
}

/// Typed failure of a render call.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer unreachable: {0}")]
    Offline(String),

    #[error("render call exceeded its deadline")]
    Timeout,

    #[error("renderer returned {status}: {body}")]
    Http { status: u16, body: String },
}

/// Client for the renderer's `/health` and `/render` endpoints.
#[derive(Clone)]
pub struct RendererClient {
    base_url: String,
    http: reqwest::Client,
    health_timeout: Duration,
    render_timeout: Duration,
}

impl RendererClient {
    pub fn new(base_url: String, health_timeout: Duration, render_timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            health_timeout,
            render_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `/health` and classify the outcome. Never errors.
    pub async fn health(&self) -> HealthStatus {
        let url = format!("{}/health", self.base_url);
        match self
            .http
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => HealthStatus::Ok,
            Ok(resp) => HealthStatus::HttpError(resp.status().as_u16()),
            Err(e) if e.is_timeout() => HealthStatus::Timeout,
            Err(e) if e.is_connect() => HealthStatus::Unreachable,
            Err(e) => HealthStatus::Unknown(e.to_string()),
        }
    }

    /// POST the report payload to `/render` and return the PDF bytes.
    pub async fn render(&self, payload: &ReportPayload) -> Result<Vec<u8>, RenderError> {
        let url = format!("{}/render", self.base_url);
        debug!(url = %url, "Calling renderer");

        let resp = self
            .http
            .post(&url)
            .timeout(self.render_timeout)
            .json(payload)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(RenderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(classify_transport)?;
        Ok(bytes.to_vec())
    }
}

fn classify_transport(e: reqwest::Error) -> RenderError {
    if e.is_timeout() {
        RenderError::Timeout
    } else {
        RenderError::Offline(e.to_string())
    }
}
