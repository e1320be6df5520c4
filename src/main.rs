use clap::Parser;
use std::time::Duration;
use theme_pusher::utils::{logger, validation::Validate};
use theme_pusher::{
    CliConfig, JsonlLogSink, Manifest, RetryPolicy, WebhookDispatcher, WebhookSender,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting theme-pusher CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證 CLI 參數
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 載入並驗證清單
    tracing::info!("📁 Loading manifest from: {}", config.manifest);
    let manifest = match Manifest::from_file(&config.manifest) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::error!("❌ Failed to load manifest '{}': {}", config.manifest, e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    if let Err(e) = manifest.validate() {
        tracing::error!("❌ Manifest validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 構建調度器
    let sender = WebhookSender::with_timeout(Duration::from_secs(config.timeout_seconds))?;
    let dispatcher = WebhookDispatcher::new(
        manifest.project_store(),
        manifest.theme_store(),
        JsonlLogSink::new(&config.log_file),
    )?
    .with_sender(sender)
    .with_retry_policy(RetryPolicy::new(config.max_attempts));

    // 推送主題
    match dispatcher
        .push_many(&config.theme, config.projects.clone())
        .await
    {
        Ok(summary) => {
            for result in &summary.results {
                if result.success {
                    println!("✅ {} delivered", result.project_id);
                } else {
                    println!(
                        "❌ {}: {}",
                        result.project_id,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
            println!("📦 {}", summary);

            if !summary.all_succeeded() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Theme push failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                theme_pusher::utils::error::ErrorSeverity::Low => 0,
                theme_pusher::utils::error::ErrorSeverity::Medium => 2,
                theme_pusher::utils::error::ErrorSeverity::High => 1,
                theme_pusher::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
