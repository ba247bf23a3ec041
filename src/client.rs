// MIT License - Copyright (c) 2026 adt2mqtt authors

//! SmartThings REST client

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Production SmartThings API endpoint.
pub const SMARTTHINGS_BASE_URL: &str = "https://api.smartthings.com/v1/";

/// The two panel operations the bridge performs against the cloud API.
///
/// Abstract so accessory handlers can be driven by a test double.
#[async_trait]
pub trait PanelApi: Send + Sync {
    /// Fetch the raw securitySystem status string for a device.
    async fn security_system_status(&self, device_id: &str) -> Result<String>;

    /// Execute a scene. The response body is ignored.
    async fn execute_scene(&self, scene_id: &str) -> Result<()>;
}

/// SmartThings client: bearer-token auth against the v1 REST API.
#[derive(Clone)]
pub struct SmartThingsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SmartThingsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, SMARTTHINGS_BASE_URL)
    }

    /// Point the client at a non-default endpoint.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    fn status_url(&self, device_id: &str) -> String {
        format!(
            "{}devices/{device_id}/components/main/capabilities/securitySystem/status",
            self.base_url
        )
    }

    fn scene_url(&self, scene_id: &str) -> String {
        format!("{}scenes/{scene_id}/execute", self.base_url)
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<()> {
    if !status.is_success() {
        return Err(BridgeError::Http { status: status.as_u16() });
    }
    Ok(())
}

#[async_trait]
impl PanelApi for SmartThingsClient {
    async fn security_system_status(&self, device_id: &str) -> Result<String> {
        let response = self
            .http
            .get(self.status_url(device_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        check_status(response.status())?;
        let body = response.text().await?;
        parse_status_body(&body)
    }

    async fn execute_scene(&self, scene_id: &str) -> Result<()> {
        let response = self
            .http
            .post(self.scene_url(scene_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        check_status(response.status())
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(rename = "securitySystemStatus")]
    security_system_status: AttributeValue,
}

#[derive(Debug, Deserialize)]
struct AttributeValue {
    value: String,
}

/// Extract `securitySystemStatus.value` from a device-status response body.
///
/// Split out of the transport so malformed bodies are classified without a
/// network in the loop.
pub fn parse_status_body(body: &str) -> Result<String> {
    let parsed: StatusResponse =
        serde_json::from_str(body).map_err(|e| BridgeError::UnexpectedBody {
            details: e.to_string(),
        })?;
    Ok(parsed.security_system_status.value)
}
