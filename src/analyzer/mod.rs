// Analyzer module: per-location reduction, numeric indicators and the report queries.

pub mod covid_analysis;
pub mod indicators;
pub mod latest;

pub use covid_analysis::{AnalysisResult, Analyzer, AnalyzerImpl};
