use clap::Parser;
use theme_pusher::core::signature;
use theme_pusher::utils::logger;
use theme_pusher::WebhookPayload;

#[derive(Parser)]
#[command(name = "verify-payload")]
#[command(about = "Verify the HMAC signature of a received theme payload")]
struct Args {
    /// Path to the payload JSON exactly as received
    #[arg(short, long)]
    payload: String,

    /// Shared API key (falls back to THEME_PUSHER_API_KEY)
    #[arg(short, long)]
    key: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let key = match args
        .key
        .or_else(|| std::env::var("THEME_PUSHER_API_KEY").ok())
    {
        Some(key) if !key.is_empty() => key,
        _ => {
            eprintln!("❌ No API key given (use --key or set THEME_PUSHER_API_KEY)");
            std::process::exit(1);
        }
    };

    let content = std::fs::read_to_string(&args.payload)?;
    let payload: WebhookPayload = serde_json::from_str(&content)?;

    if payload.signature.is_none() {
        println!("⚠️ Payload carries no signature (unsigned delivery)");
        std::process::exit(1);
    }

    if signature::verify(&payload, &key) {
        println!(
            "✅ Signature valid for theme '{}' ({})",
            payload.theme_name, payload.timestamp
        );
    } else {
        println!("❌ Signature mismatch: payload was tampered with or the key is wrong");
        std::process::exit(1);
    }

    Ok(())
}
