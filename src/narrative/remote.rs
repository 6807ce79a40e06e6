//! Best-effort remote analysis client
//!
//! POSTs the sensor field and status snapshot to an external analysis
//! service. Requests carry a short timeout and every failure is mapped to
//! an error the caller downgrades to the local generator; nothing here
//! blocks the tick or surfaces to the operator as a failure.

use crate::core::error::{HallError, Result};
use crate::hall::sensor::Sensor;
use crate::hall::state::SiteStatus;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Async client for the external analysis/imaging endpoints
pub struct RemoteAnalyzer {
    client: Client,
    base_url: String,
}

impl RemoteAnalyzer {
    /// Create a client with an explicit base URL
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the environment
    ///
    /// Optional: SENTINEL_ANALYSIS_URL (defaults to the local backend)
    pub fn from_env() -> Self {
        let base_url = std::env::var("SENTINEL_ANALYSIS_URL")
            .unwrap_or_else(|_| "http://localhost:3003".into());
        Self::new(base_url)
    }

    /// Request a narrative analysis of the current state
    pub async fn analyze(&self, sensors: &[Sensor], status: &SiteStatus) -> Result<String> {
        let request = AnalysisRequest { sensors, status };

        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| HallError::RemoteError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HallError::RemoteError(format!(
                "analyze returned {}",
                response.status()
            )));
        }

        let body: AnalysisResponse = response
            .json()
            .await
            .map_err(|e| HallError::RemoteError(e.to_string()))?;

        Ok(body.analysis)
    }

    /// Request a rendered thermal image; returns base64-encoded PNG data
    pub async fn thermal_image(&self, sensors: &[Sensor], status: &SiteStatus) -> Result<String> {
        let request = AnalysisRequest { sensors, status };

        let response = self
            .client
            .post(format!("{}/thermal-image", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| HallError::RemoteError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HallError::RemoteError(format!(
                "thermal-image returned {}",
                response.status()
            )));
        }

        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| HallError::RemoteError(e.to_string()))?;

        Ok(body.image_base64)
    }
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    sensors: &'a [Sensor],
    status: &'a SiteStatus,
}

#[derive(Deserialize)]
struct AnalysisResponse {
    analysis: String,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(rename = "imageBase64")]
    image_base64: String,
}
