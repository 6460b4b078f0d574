// Copyright 2026 The billscan Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # billscan
//!
//! AI-powered extraction of monetary amounts from medical bills.
//!
//! billscan sends a multimodal prompt (extraction instructions plus a
//! scanned document or pasted bill text) to a hosted generative model,
//! retries transparently when the upstream rate-limits, and parses the
//! returned JSON into a typed [`BillAnalysis`] report.
//!
//! The retry loop is upstream-directed: a `retry in <n>s` hint in the
//! rate-limit message sets the wait (plus a fixed safety margin), and a
//! default wait applies otherwise. Non-rate-limit failures surface on the
//! first occurrence, unretried.
//!
//! ## Example
//!
//! ```rust,no_run
//! use billscan::{AnalyzerConfig, BillAnalyzer, ModelConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model_config = ModelConfig::default()
//!         .with_api_key(std::env::var("GEMINI_API_KEY")?);
//!
//!     let analyzer = BillAnalyzer::gemini(model_config, AnalyzerConfig::default());
//!
//!     let scan = std::fs::read("bill.png")?;
//!     let report = analyzer.analyze_image("image/png", scan).await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```
//!
//! The lower-level [`Orchestrator`] can also be driven directly against any
//! [`ModelEndpoint`] when the structured report layer is not wanted:
//!
//! ```rust,no_run
//! use billscan::{GeminiClient, InferenceRequest, ModelConfig, Orchestrator,
//!     RetryHintClassifier, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GeminiClient::new(ModelConfig::default().with_api_key("..."));
//!     let orchestrator = Orchestrator::new(client, RetryHintClassifier);
//!
//!     let request = InferenceRequest::text("Summarize this bill in one line.");
//!     let text = orchestrator.invoke(&request, &RetryPolicy::default()).await?;
//!
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod inference;
pub mod model;

pub use analyzer::{
    Amount, AmountKind, AnalysisStatus, AnalyzerConfig, AnalyzerError, BillAnalysis, BillAnalyzer,
};
pub use inference::{
    AttemptOutcome, ErrorClass, ErrorClassifier, InferenceAttempt, InferenceError, InferencePart,
    InferenceRequest, ModelEndpoint, Orchestrator, RetryHintClassifier, RetryPolicy,
    UpstreamFailure,
};
pub use model::{GeminiClient, ModelConfig, ModelError};
