//! Bill analyzer orchestrating prompt assembly, inference, and parsing.

use thiserror::Error;
use tracing::debug;

use crate::config::EXTRACTION_PROMPT;
use crate::inference::{
    ErrorClassifier, InferenceError, InferenceRequest, ModelEndpoint, Orchestrator,
    RetryHintClassifier, RetryPolicy, UpstreamFailure,
};
use crate::model::{GeminiClient, ModelConfig};

use super::report::BillAnalysis;

/// Analyzer errors.
#[derive(Error, Debug)]
pub enum AnalyzerError<E: UpstreamFailure> {
    #[error(transparent)]
    Inference(#[from] InferenceError<E>),
    #[error("model returned malformed report JSON: {0}")]
    MalformedReport(#[from] serde_json::Error),
}

/// Configuration for the bill analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Instruction text sent ahead of the document.
    pub prompt: String,
    /// Retry behavior for the model call.
    pub retry_policy: RetryPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            prompt: EXTRACTION_PROMPT.to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Override the extraction instruction.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }
}

/// Extracts structured amounts from a medical bill via a generative model.
///
/// # Example
///
/// ```rust,no_run
/// use billscan::{AnalyzerConfig, BillAnalyzer, ModelConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let model_config = ModelConfig::default().with_api_key("...");
///     let analyzer = BillAnalyzer::gemini(model_config, AnalyzerConfig::default());
///
///     let scan = std::fs::read("bill.png")?;
///     let report = analyzer.analyze_image("image/png", scan).await?;
///
///     println!("{}", serde_json::to_string_pretty(&report)?);
///     Ok(())
/// }
/// ```
pub struct BillAnalyzer<E, C> {
    orchestrator: Orchestrator<E, C>,
    config: AnalyzerConfig,
}

impl BillAnalyzer<GeminiClient, RetryHintClassifier> {
    /// Analyzer over the hosted Gemini endpoint with the default classifier.
    pub fn gemini(model_config: ModelConfig, config: AnalyzerConfig) -> Self {
        Self::new(GeminiClient::new(model_config), RetryHintClassifier, config)
    }
}

impl<E, C> BillAnalyzer<E, C>
where
    E: ModelEndpoint,
    C: ErrorClassifier<E::Error>,
{
    /// Create an analyzer over an arbitrary endpoint and classifier.
    pub fn new(endpoint: E, classifier: C, config: AnalyzerConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new(endpoint, classifier),
            config,
        }
    }

    /// Analyze a scanned bill (image or PDF) given as raw bytes.
    pub async fn analyze_image(
        &self,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<BillAnalysis, AnalyzerError<E::Error>> {
        // Instruction first, then the document, matching the part order the
        // extraction prompt was written for.
        let request =
            InferenceRequest::text(self.config.prompt.as_str()).with_binary(mime_type, data);
        self.analyze(request).await
    }

    /// Analyze a bill supplied as plain text.
    pub async fn analyze_text(
        &self,
        bill_text: &str,
    ) -> Result<BillAnalysis, AnalyzerError<E::Error>> {
        let request = InferenceRequest::text(self.config.prompt.as_str()).with_text(bill_text);
        self.analyze(request).await
    }

    async fn analyze(
        &self,
        request: InferenceRequest,
    ) -> Result<BillAnalysis, AnalyzerError<E::Error>> {
        let raw = self
            .orchestrator
            .invoke(&request, &self.config.retry_policy)
            .await?;

        debug!("model returned {} bytes of report text", raw.len());
        Ok(BillAnalysis::from_response_text(&raw)?)
    }
}
