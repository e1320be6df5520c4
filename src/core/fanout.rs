use crate::core::dispatcher::WebhookDispatcher;
use crate::domain::model::PushResult;
use crate::domain::ports::{ProjectStore, ThemeStore, WebhookLogSink};
use crate::utils::error::Result;

/// Aggregated fan-out outcome. Results are aligned with the input target
/// order, not completion order.
#[derive(Debug, Clone)]
pub struct PushSummary {
    pub results: Vec<PushResult>,
}

impl PushSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }
}

impl std::fmt::Display for PushSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Theme updated on {}/{} projects",
            self.succeeded(),
            self.total()
        )
    }
}

impl<P, T, L> WebhookDispatcher<P, T, L>
where
    P: ProjectStore + Clone + 'static,
    T: ThemeStore + Clone + 'static,
    L: WebhookLogSink + Clone + 'static,
{
    /// Fan one theme out to many targets, one task per target. `None`
    /// broadcasts to every active project. Per-target failures never abort
    /// or contaminate the others; the only `Err` here is the active-project
    /// listing itself failing.
    pub async fn push_many(
        &self,
        theme_id: &str,
        project_ids: Option<Vec<String>>,
    ) -> Result<PushSummary> {
        let targets = match project_ids {
            Some(ids) => ids,
            None => self
                .project_store()
                .list_active()
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect(),
        };

        tracing::info!(
            "🚀 Pushing theme '{}' to {} target(s)",
            theme_id,
            targets.len()
        );

        let mut handles = Vec::with_capacity(targets.len());
        for project_id in targets {
            let dispatcher = self.clone();
            let theme = theme_id.to_string();
            handles.push((
                project_id.clone(),
                tokio::spawn(async move { dispatcher.push_one(&project_id, &theme).await }),
            ));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (project_id, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(%project_id, "Delivery task aborted: {}", e);
                    PushResult::failed(&project_id, format!("Delivery task aborted: {}", e))
                }
            };
            results.push(result);
        }

        let summary = PushSummary { results };
        tracing::info!("📦 {}", summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_and_headline() {
        let summary = PushSummary {
            results: vec![
                PushResult::ok("p1"),
                PushResult::failed("p2", "HTTP 500: Internal Server Error - boom"),
                PushResult::ok("p3"),
            ],
        };

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.to_string(), "Theme updated on 2/3 projects");
    }

    #[test]
    fn empty_summary_is_valid() {
        let summary = PushSummary { results: vec![] };
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.succeeded(), 0);
        assert!(summary.all_succeeded());
        assert_eq!(summary.to_string(), "Theme updated on 0/0 projects");
    }
}
