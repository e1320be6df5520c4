use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme content blocks. BTreeMap keys serialize in a stable order, which the
/// signature scheme depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeData {
    pub colors: BTreeMap<String, String>,
    pub radius: BTreeMap<String, f64>,
    pub effects: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub data: ThemeData,
}

/// Hosting platform behind a project's webhook endpoint. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Vercel,
    Netlify,
    Github,
    #[default]
    Custom,
}

/// A registered delivery target.
#[derive(Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub webhook_url: String,
    /// Signing secret. Empty means deliveries go unsigned.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

// api_key never appears in logs or debug output.
impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("webhook_url", &self.webhook_url)
            .field("api_key", &"[REDACTED]")
            .field("platform", &self.platform)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// The wire entity POSTed to a target. Struct field order is load-bearing:
/// the signature is computed over this serialization with `signature`
/// omitted, and receivers must be able to reproduce the exact bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub theme: ThemeData,
    pub theme_id: String,
    pub theme_name: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Terminal outcome of one retried delivery. Its serialized form is what the
/// log row's `response` column stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
}

impl DeliveryReceipt {
    pub fn delivered(status: u16, data: serde_json::Value) -> Self {
        Self {
            success: true,
            status: Some(status),
            data: Some(data),
            error: None,
            attempt: None,
        }
    }

    pub fn failed(error: impl Into<String>, attempt: u32) -> Self {
        Self {
            success: false,
            status: None,
            data: None,
            error: Some(error.into()),
            attempt: Some(attempt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Success,
    Failed,
}

/// Append-only record of one dispatcher invocation. `project_id` is the id
/// the caller supplied, kept even when resolution failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookLogEntry {
    pub project_id: String,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WebhookLogEntry {
    pub fn new(
        project_id: impl Into<String>,
        status: DeliveryStatus,
        response: Option<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            status,
            response,
            error,
            created_at: Utc::now(),
        }
    }
}

/// Per-target outcome handed back to the caller. Not persisted.
#[derive(Debug, Clone)]
pub struct PushResult {
    pub project_id: String,
    pub success: bool,
    pub error: Option<String>,
}

impl PushResult {
    pub fn ok(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(project_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}
