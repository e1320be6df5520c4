pub mod dispatcher;
pub mod fanout;
pub mod retry;
pub mod sender;
pub mod signature;

pub use crate::domain::model::{PushResult, WebhookPayload};
pub use crate::domain::ports::{ProjectStore, ThemeStore, WebhookLogSink};
pub use crate::utils::error::Result;
pub use dispatcher::WebhookDispatcher;
pub use fanout::PushSummary;
pub use retry::RetryPolicy;
pub use sender::WebhookSender;
