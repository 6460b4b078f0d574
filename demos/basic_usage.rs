//! Basic usage example for billscan.

use billscan::{AnalyzerConfig, BillAnalyzer, ModelConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    // Configure the model client
    let model_config = ModelConfig::default()
        .with_api_key(std::env::var("GEMINI_API_KEY").unwrap_or_default());

    // Create the analyzer with the default prompt and retry policy
    let analyzer = BillAnalyzer::gemini(model_config, AnalyzerConfig::default());

    println!("🧾 Analyzing sample bill text...\n");

    // Note the OCR-style typo ('4,OOO') the model is asked to repair
    let bill = "City Hospital\nTotal: INR 12,500\nPaid: 4,OOO\nBalance due: 8,500";

    match analyzer.analyze_text(bill).await {
        Ok(report) => {
            println!("✅ {}", serde_json::to_string_pretty(&report)?);
        }
        Err(e) => {
            eprintln!("❌ Analysis failed: {}", e);
        }
    }

    Ok(())
}
