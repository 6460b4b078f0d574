//! Typed report parsed from the model's JSON output.

use serde::{Deserialize, Serialize};

/// Classification the model assigns to an extracted amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountKind {
    TotalBill,
    Paid,
    Due,
}

/// One extracted monetary amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amount {
    #[serde(rename = "type")]
    pub kind: AmountKind,
    pub value: f64,
    /// Exact text snippet the model found in the document.
    pub source: String,
}

/// Result status reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    NoAmountsFound,
}

/// Structured result of a bill analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillAnalysis {
    /// Detected currency code (e.g. INR, USD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub amounts: Vec<Amount>,
    pub status: AnalysisStatus,
    /// Model-provided explanation when no amounts were found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BillAnalysis {
    /// Parse a raw model response into a report.
    ///
    /// Models routinely wrap their JSON in markdown code fences despite
    /// instructions not to; fences are stripped before parsing.
    pub fn from_response_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_code_fences(text))
    }
}

/// Remove markdown code fences the model may wrap around its JSON.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
