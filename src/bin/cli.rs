//! billscan - extract amounts and currency from a medical bill
//!
//! This is the CLI entry point for the billscan tool.
//! Run with: cargo run --bin billscan -- <path-to-bill>

use billscan::inference::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RATE_LIMIT_WAIT};
use billscan::{AnalysisStatus, AnalyzerConfig, BillAnalyzer, ModelConfig};
use std::env;
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: billscan <path-to-bill>");
        eprintln!("       billscan --text <bill text>");
        std::process::exit(2);
    }

    // Get configuration from environment or use defaults
    let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        anyhow::bail!("GEMINI_API_KEY is missing; set it in the environment or a .env file");
    }

    let mut model_config = ModelConfig::default().with_api_key(api_key);
    if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
        model_config = model_config.with_base_url(base_url);
    }
    if let Ok(model_name) = env::var("GEMINI_MODEL") {
        model_config = model_config.with_model_name(model_name);
    }

    // Get retry configuration from environment
    let max_attempts: u32 = env::var("MODEL_MAX_ATTEMPTS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_ATTEMPTS);
    let default_wait_ms: u64 = env::var("MODEL_DEFAULT_WAIT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT.as_millis() as u64);

    let retry_policy = RetryPolicy::default()
        .with_max_attempts(max_attempts)
        .with_default_wait(Duration::from_millis(default_wait_ms));

    println!("🧾 billscan - AI-powered medical bill extraction");
    println!("================================================");
    println!(
        "Model: {} @ {}",
        model_config.model_name, model_config.base_url
    );
    println!(
        "Retry: max {} attempts, {}ms default wait",
        max_attempts, default_wait_ms
    );
    println!("================================================\n");

    let analyzer = BillAnalyzer::gemini(
        model_config,
        AnalyzerConfig::default().with_retry_policy(retry_policy),
    );

    // Analyze pasted text or a document on disk
    let outcome = if args[1] == "--text" {
        let text = args[2..].join(" ");
        if text.is_empty() {
            anyhow::bail!("--text requires the bill text to follow");
        }
        println!("📝 Analyzing pasted bill text ({} chars)\n", text.len());
        analyzer.analyze_text(&text).await
    } else {
        let path = Path::new(&args[1]);
        let data = std::fs::read(path)?;
        let mime_type = mime_for(path);
        println!(
            "📝 Analyzing {} ({}, {} bytes)\n",
            path.display(),
            mime_type,
            data.len()
        );
        analyzer.analyze_image(mime_type, data).await
    };

    match outcome {
        Ok(report) => {
            println!("✅ Extraction result:\n");
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.status == AnalysisStatus::NoAmountsFound {
                println!(
                    "\n⚠️  No amounts detected{}",
                    report
                        .reason
                        .map(|r| format!(": {}", r))
                        .unwrap_or_default()
                );
            }
        }
        Err(e) => {
            eprintln!("❌ Analysis failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Guess a document MIME type from the file extension.
fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
