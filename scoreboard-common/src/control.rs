use crate::snapshot::{DisplayMode, StatusSnapshot, Team};
use log::debug;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("device returned status {0}")]
    Status(StatusCode),
}

/// HTTP client for the scoreboard's control API. Mutation endpoints return
/// no meaningful body, only a success or failure status.
pub struct ControlClient {
    base_url: String,
    client: Client,
}

impl ControlClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = ClientBuilder::new().timeout(timeout).build()?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { base_url, client })
    }

    pub async fn get_status(&self) -> Result<StatusSnapshot, ClientError> {
        let url = format!("{}/api/status", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::Status(response.status()));
        }

        let body = response.text().await?;
        debug!("Received status body: {body}");
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_presets(&self) -> Result<Vec<String>, ClientError> {
        #[derive(Deserialize)]
        struct PresetsResponse {
            default: Vec<String>,
        }

        let url = format!("{}/api/messages/presets", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::Status(response.status()));
        }

        let body = response.text().await?;
        let presets: PresetsResponse = serde_json::from_str(&body)?;
        Ok(presets.default)
    }

    pub async fn set_score(&self, team: Team, score: u8) -> Result<(), ClientError> {
        self.post("/api/score", json!({ "team": team, "score": score }))
            .await
    }

    pub async fn resume_timer(&self) -> Result<(), ClientError> {
        self.post("/api/timer/resume", json!({})).await
    }

    pub async fn pause_timer(&self) -> Result<(), ClientError> {
        self.post("/api/timer/pause", json!({})).await
    }

    pub async fn set_timer(&self, minutes: u16) -> Result<(), ClientError> {
        self.post("/api/timer", json!({ "minutes": minutes })).await
    }

    pub async fn set_display_mode(&self, mode: DisplayMode) -> Result<(), ClientError> {
        self.post("/api/display/mode", json!({ "mode": mode })).await
    }

    pub async fn set_display_text(&self, text: &str) -> Result<(), ClientError> {
        self.post("/api/display/text", json!({ "text": text })).await
    }

    pub async fn set_display_power(&self, enabled: bool) -> Result<(), ClientError> {
        self.post("/api/display/power", json!({ "enabled": enabled }))
            .await
    }

    pub async fn set_brightness(&self, brightness: u8) -> Result<(), ClientError> {
        self.post("/api/display/brightness", brightness_body(brightness))
            .await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(&body).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Status(response.status()))
        }
    }
}

// The device reads the brightness from the `level` key, not `brightness`,
// and silently falls back to full brightness for anything else.
fn brightness_body(brightness: u8) -> serde_json::Value {
    json!({ "level": brightness })
}
