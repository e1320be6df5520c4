pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::jsonl::JsonlLogSink;
pub use adapters::memory::{InMemoryProjectStore, InMemoryThemeStore, MemoryLogSink};
pub use config::manifest::Manifest;
pub use core::{PushSummary, RetryPolicy, WebhookDispatcher, WebhookSender};
pub use domain::model::{
    DeliveryReceipt, DeliveryStatus, Platform, Project, PushResult, Theme, ThemeData,
    WebhookLogEntry, WebhookPayload,
};
pub use domain::ports::{ProjectStore, ThemeStore, WebhookLogSink};
pub use utils::error::{PushError, Result};
