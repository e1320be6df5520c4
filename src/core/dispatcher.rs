use crate::core::retry::RetryPolicy;
use crate::core::sender::WebhookSender;
use crate::core::signature;
use crate::domain::model::{
    DeliveryReceipt, DeliveryStatus, Project, PushResult, WebhookLogEntry, WebhookPayload,
};
use crate::domain::ports::{ProjectStore, ThemeStore, WebhookLogSink};
use crate::utils::error::{PushError, Result};
use chrono::{SecondsFormat, Utc};

/// Single-target dispatcher: resolve project and theme, build and sign the
/// payload, run the retried delivery, record exactly one log row.
#[derive(Clone)]
pub struct WebhookDispatcher<P, T, L> {
    projects: P,
    themes: T,
    log: L,
    sender: WebhookSender,
    retry: RetryPolicy,
}

impl<P, T, L> WebhookDispatcher<P, T, L>
where
    P: ProjectStore,
    T: ThemeStore,
    L: WebhookLogSink,
{
    pub fn new(projects: P, themes: T, log: L) -> Result<Self> {
        Ok(Self {
            projects,
            themes,
            log,
            sender: WebhookSender::new()?,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_sender(mut self, sender: WebhookSender) -> Self {
        self.sender = sender;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub(crate) fn project_store(&self) -> &P {
        &self.projects
    }

    /// Deliver one theme to one project. Never returns an error: every
    /// outcome, including precondition failures, becomes a `PushResult`
    /// and exactly one log row keyed by the id the caller supplied.
    pub async fn push_one(&self, project_id: &str, theme_id: &str) -> PushResult {
        // 解析項目與主題，構建已簽名的 payload
        let (project, payload) = match self.prepare(project_id, theme_id).await {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(project_id, theme_id, "Webhook push failed: {}", e);
                self.append_log(WebhookLogEntry::new(
                    project_id,
                    DeliveryStatus::Failed,
                    None,
                    Some(e.to_string()),
                ))
                .await;
                return PushResult::failed(project_id, e.to_string());
            }
        };

        // 交付（帶重試），結果永遠是一張終局收據
        let receipt = match self
            .retry
            .run(|_| self.sender.send_once(&project.webhook_url, &payload))
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => DeliveryReceipt::failed(e.to_string(), self.retry.max_attempts()),
        };

        // 無論成敗都只記錄一行
        let status = if receipt.success {
            DeliveryStatus::Success
        } else {
            DeliveryStatus::Failed
        };
        let response_json = match serde_json::to_string(&receipt) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("Failed to serialize delivery receipt: {}", e);
                None
            }
        };
        self.append_log(WebhookLogEntry::new(
            project_id,
            status,
            response_json,
            receipt.error.clone(),
        ))
        .await;

        if receipt.success {
            tracing::info!("✅ Theme '{}' pushed to project '{}'", theme_id, project_id);
            PushResult::ok(project_id)
        } else {
            let message = receipt
                .error
                .unwrap_or_else(|| "Request failed".to_string());
            tracing::error!(project_id, theme_id, "Webhook push failed: {}", message);
            PushResult::failed(project_id, message)
        }
    }

    async fn prepare(
        &self,
        project_id: &str,
        theme_id: &str,
    ) -> Result<(Project, WebhookPayload)> {
        let project = match self.projects.find_project(project_id).await? {
            Some(p) if p.is_active => p,
            Some(_) => {
                return Err(PushError::ProjectInactive {
                    id: project_id.to_string(),
                })
            }
            None => {
                return Err(PushError::ProjectNotFound {
                    id: project_id.to_string(),
                })
            }
        };

        let theme = self
            .themes
            .find_theme(theme_id)
            .await?
            .ok_or_else(|| PushError::ThemeNotFound {
                id: theme_id.to_string(),
            })?;

        let mut payload = WebhookPayload {
            theme: theme.data.clone(),
            theme_id: theme.id.clone(),
            theme_name: theme.name.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            signature: None,
        };
        payload.signature = signature::maybe_sign(&payload, &project.api_key)?;
        if payload.signature.is_none() {
            tracing::debug!(project_id = %project.id, "No API key, delivery goes unsigned");
        }

        Ok((project, payload))
    }

    // Log write failures are reported but never change the delivery outcome.
    async fn append_log(&self, entry: WebhookLogEntry) {
        if let Err(e) = self.log.append(entry).await {
            tracing::error!("Failed to record delivery log entry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryProjectStore, InMemoryThemeStore, MemoryLogSink};
    use crate::domain::model::{Platform, Theme, ThemeData};
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use std::collections::BTreeMap;

    fn project(id: &str, url: &str, api_key: &str, is_active: bool) -> Project {
        Project {
            id: id.to_string(),
            name: format!("{} site", id),
            description: None,
            webhook_url: url.to_string(),
            api_key: api_key.to_string(),
            platform: Platform::Custom,
            is_active,
        }
    }

    fn theme(id: &str, name: &str) -> Theme {
        let mut colors = BTreeMap::new();
        colors.insert("primary".to_string(), "#0ea5e9".to_string());
        Theme {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            data: ThemeData {
                colors,
                radius: BTreeMap::new(),
                effects: BTreeMap::new(),
            },
        }
    }

    fn dispatcher(
        projects: Vec<Project>,
        themes: Vec<Theme>,
        log: MemoryLogSink,
    ) -> WebhookDispatcher<InMemoryProjectStore, InMemoryThemeStore, MemoryLogSink> {
        WebhookDispatcher::new(
            InMemoryProjectStore::new(projects),
            InMemoryThemeStore::new(themes),
            log,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_project_fails_without_network_and_logs_supplied_id() {
        let log = MemoryLogSink::new();
        let d = dispatcher(vec![], vec![theme("t1", "Ocean")], log.clone());

        let result = d.push_one("ghost", "t1").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Project not found: ghost"));

        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].project_id, "ghost");
        assert_eq!(entries[0].status, DeliveryStatus::Failed);
        assert_eq!(entries[0].response, None);
        assert_eq!(entries[0].error.as_deref(), Some("Project not found: ghost"));
    }

    #[tokio::test]
    async fn inactive_project_is_a_precondition_failure() {
        let log = MemoryLogSink::new();
        let d = dispatcher(
            vec![project("p1", "http://unused.invalid/hook", "k", false)],
            vec![theme("t1", "Ocean")],
            log.clone(),
        );

        let result = d.push_one("p1", "t1").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Project is inactive: p1"));
        assert_eq!(log.entries().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_theme_is_a_precondition_failure() {
        let log = MemoryLogSink::new();
        let d = dispatcher(
            vec![project("p1", "http://unused.invalid/hook", "k", true)],
            vec![],
            log.clone(),
        );

        let result = d.push_one("p1", "missing").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Theme not found: missing"));

        let entries = log.entries().await;
        assert_eq!(entries[0].project_id, "p1");
        assert_eq!(entries[0].status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn successful_push_sends_signed_payload_and_logs_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("content-type", "application/json")
                .header("user-agent", crate::core::sender::USER_AGENT)
                .json_body_partial(r#"{ "themeId": "t1", "themeName": "Ocean" }"#)
                .body_contains("\"signature\":\"");
            then.status(200).json_body(serde_json::json!({ "applied": true }));
        });

        let log = MemoryLogSink::new();
        let d = dispatcher(
            vec![project("p1", &server.url("/hook"), "secret-key", true)],
            vec![theme("t1", "Ocean")],
            log.clone(),
        );

        let result = d.push_one("p1", "t1").await;

        mock.assert();
        assert!(result.success);
        assert_eq!(result.error, None);

        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, DeliveryStatus::Success);
        assert_eq!(entries[0].error, None);
        let response = entries[0].response.as_deref().unwrap();
        assert!(response.contains("\"success\":true"));
        assert!(response.contains("\"status\":200"));
    }

    #[tokio::test]
    async fn empty_api_key_sends_unsigned_payload() {
        let server = MockServer::start();
        // Signed requests would match this mock first; unsigned ones fall
        // through to the catch-all below.
        let signed = server.mock(|when, then| {
            when.method(POST).path("/hook").body_contains("\"signature\"");
            then.status(200);
        });
        let unsigned = server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200).json_body(serde_json::json!({ "ok": true }));
        });

        let log = MemoryLogSink::new();
        let d = dispatcher(
            vec![project("p1", &server.url("/hook"), "", true)],
            vec![theme("t1", "Ocean")],
            log,
        );

        let result = d.push_one("p1", "t1").await;

        assert!(result.success);
        assert_eq!(signed.hits(), 0);
        assert_eq!(unsigned.hits(), 1);
    }

    #[derive(Clone)]
    struct FailingLogSink;

    #[async_trait]
    impl WebhookLogSink for FailingLogSink {
        async fn append(&self, _entry: WebhookLogEntry) -> Result<()> {
            Err(PushError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "log store unavailable",
            )))
        }
    }

    #[tokio::test]
    async fn log_sink_failure_does_not_change_the_outcome() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200).json_body(serde_json::json!({ "ok": true }));
        });

        let d = WebhookDispatcher::new(
            InMemoryProjectStore::new(vec![project("p1", &server.url("/hook"), "k", true)]),
            InMemoryThemeStore::new(vec![theme("t1", "Ocean")]),
            FailingLogSink,
        )
        .unwrap();

        let result = d.push_one("p1", "t1").await;

        assert!(result.success);
    }
}
