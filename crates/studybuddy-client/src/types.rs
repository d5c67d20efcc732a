//! Typed request and response views for the generation endpoints
//!
//! The submitter itself sends whatever fields a form carries. These structs
//! describe the shape the backend accepts, for callers that want to start
//! from typed values and for test servers that want to decode requests.

use serde::{Deserialize, Serialize};

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /api/generate-synthetic-data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticDataRequest {
    /// Implementation guide filter, e.g. `SDTM`
    pub dataset_type: String,
    /// Domain code, e.g. `DM`
    pub domain: String,
    pub num_subjects: i64,
    pub therapeutic_area: String,
    /// Output format, e.g. `csv`
    pub data_format: String,
}

/// Body of `POST /api/generate-raw-dataset-package`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDatasetRequest {
    pub num_subjects: i64,
    pub therapeutic_area: String,
    pub domains: Vec<String>,
    pub study_story: String,
    pub output_format: String,
}

/// Body of `POST /api/generate-analysis-code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisCodeRequest {
    /// Target language, e.g. `sas` or `r`
    pub language: String,
    pub dataset_path: String,
    pub output_type: String,
    /// Treatment variable, e.g. `ARM`
    pub treatment_var: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// Success body returned by the generation endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}
