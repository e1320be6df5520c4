use crate::domain::model::{Project, Theme, WebhookLogEntry};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ProjectStore: Send + Sync {
    fn find_project(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Project>>> + Send;
    fn list_active(&self) -> impl std::future::Future<Output = Result<Vec<Project>>> + Send;
}

pub trait ThemeStore: Send + Sync {
    fn find_theme(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Theme>>> + Send;
}

#[async_trait]
pub trait WebhookLogSink: Send + Sync {
    async fn append(&self, entry: WebhookLogEntry) -> Result<()>;
}
