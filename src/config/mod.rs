pub mod manifest;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "theme-pusher")]
#[command(about = "Push design themes to registered project webhooks")]
pub struct CliConfig {
    /// 項目與主題清單 (TOML)
    #[arg(long, default_value = "./themes.toml")]
    pub manifest: String,

    /// 要推送的主題 id
    #[arg(long)]
    pub theme: String,

    /// 逗號分隔的目標項目 id；省略表示廣播到所有啟用的項目
    #[arg(long, value_delimiter = ',')]
    pub projects: Option<Vec<String>>,

    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "3")]
    pub max_attempts: u32,

    /// 交付日誌輸出位置 (JSON Lines)
    #[arg(long, default_value = "./webhook_log.jsonl")]
    pub log_file: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON-formatted logs")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("manifest", &self.manifest)?;
        validation::validate_non_empty_string("theme", &self.theme)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validation::validate_range("max_attempts", self.max_attempts, 1, 10)?;
        if let Some(ids) = &self.projects {
            for id in ids {
                validation::validate_non_empty_string("projects", id)?;
            }
        }
        Ok(())
    }
}
