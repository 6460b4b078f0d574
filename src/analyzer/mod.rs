//! Bill analysis on top of the inference orchestrator.

mod bill_analyzer;
mod report;

pub use bill_analyzer::{AnalyzerConfig, AnalyzerError, BillAnalyzer};
pub use report::{Amount, AmountKind, AnalysisStatus, BillAnalysis};
