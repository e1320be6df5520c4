use crate::domain::model::{Project, Theme, WebhookLogEntry};
use crate::domain::ports::{ProjectStore, ThemeStore, WebhookLogSink};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry-backed project store. Keeps registration order so broadcast
/// target order is stable.
#[derive(Clone)]
pub struct InMemoryProjectStore {
    projects: Arc<Mutex<Vec<Project>>>,
}

impl InMemoryProjectStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: Arc::new(Mutex::new(projects)),
        }
    }
}

impl ProjectStore for InMemoryProjectStore {
    async fn find_project(&self, id: &str) -> Result<Option<Project>> {
        let projects = self.projects.lock().await;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Project>> {
        let projects = self.projects.lock().await;
        Ok(projects.iter().filter(|p| p.is_active).cloned().collect())
    }
}

#[derive(Clone)]
pub struct InMemoryThemeStore {
    themes: Arc<Mutex<Vec<Theme>>>,
}

impl InMemoryThemeStore {
    pub fn new(themes: Vec<Theme>) -> Self {
        Self {
            themes: Arc::new(Mutex::new(themes)),
        }
    }
}

impl ThemeStore for InMemoryThemeStore {
    async fn find_theme(&self, id: &str) -> Result<Option<Theme>> {
        let themes = self.themes.lock().await;
        Ok(themes.iter().find(|t| t.id == id).cloned())
    }
}

/// Collecting sink for tests and dry runs.
#[derive(Clone, Default)]
pub struct MemoryLogSink {
    entries: Arc<Mutex<Vec<WebhookLogEntry>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<WebhookLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl WebhookLogSink for MemoryLogSink {
    async fn append(&self, entry: WebhookLogEntry) -> Result<()> {
        self.entries.lock().await.push(entry);
        Ok(())
    }
}
