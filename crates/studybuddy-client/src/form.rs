//! Form kinds and request construction
//!
//! Building a request is pure: it depends only on the form kind and the
//! captured payload, and never touches the network.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{Result, StudyBuddyError};
use crate::payload::{parse_num_subjects, split_domains, FormPayload, DOMAINS, NUM_SUBJECTS};

/// The forms a submitter knows how to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Synthetic dataset for a single domain
    SyntheticData,
    /// Zipped package of raw EDC datasets
    RawDatasetPackage,
    /// Analysis program generation
    AnalysisCode,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [
        FormKind::SyntheticData,
        FormKind::RawDatasetPackage,
        FormKind::AnalysisCode,
    ];

    /// Endpoint path the form posts to
    pub fn endpoint(self) -> &'static str {
        match self {
            FormKind::SyntheticData => "/api/generate-synthetic-data",
            FormKind::RawDatasetPackage => "/api/generate-raw-dataset-package",
            FormKind::AnalysisCode => "/api/generate-analysis-code",
        }
    }

    /// Status text shown while the request is in flight
    pub fn status_text(self) -> &'static str {
        match self {
            FormKind::SyntheticData => "Generating...",
            FormKind::RawDatasetPackage => "Generating package...",
            FormKind::AnalysisCode => "Generating analysis code...",
        }
    }

    fn coerces_num_subjects(self) -> bool {
        matches!(
            self,
            FormKind::SyntheticData | FormKind::RawDatasetPackage
        )
    }

    fn coerces_domains(self) -> bool {
        matches!(self, FormKind::RawDatasetPackage)
    }

    /// Build the JSON request body for this form.
    ///
    /// Every field is carried over as a string, except `num_subjects`
    /// (integer) on the dataset forms and `domains` (string list) on the raw
    /// dataset form. A missing or unparsable coerced field is an error.
    pub fn build_request(self, payload: &FormPayload) -> Result<SubmissionRequest> {
        let mut body: Map<String, Value> = payload
            .iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();

        if self.coerces_num_subjects() {
            let raw = payload
                .get(NUM_SUBJECTS)
                .ok_or_else(|| StudyBuddyError::invalid_field(NUM_SUBJECTS, "field is missing"))?;
            body.insert(NUM_SUBJECTS.to_string(), parse_num_subjects(raw)?.into());
        }

        if self.coerces_domains() {
            let raw = payload
                .get(DOMAINS)
                .ok_or_else(|| StudyBuddyError::invalid_field(DOMAINS, "field is missing"))?;
            let domains = split_domains(raw).into_iter().map(Value::String).collect();
            body.insert(DOMAINS.to_string(), Value::Array(domains));
        }

        Ok(SubmissionRequest {
            kind: self,
            body: Value::Object(body),
        })
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormKind::SyntheticData => "synthetic-data",
            FormKind::RawDatasetPackage => "raw-dataset-package",
            FormKind::AnalysisCode => "analysis-code",
        };
        f.write_str(name)
    }
}

/// A coerced request body ready to be posted
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub kind: FormKind,
    pub body: Value,
}

impl SubmissionRequest {
    /// Endpoint path for this request
    pub fn endpoint(&self) -> &'static str {
        self.kind.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn synthetic_form() -> FormPayload {
        FormPayload::new()
            .with_field("dataset_type", "SDTM")
            .with_field("domain", "DM")
            .with_field("num_subjects", "10")
            .with_field("therapeutic_area", "Oncology")
            .with_field("data_format", "csv")
    }

    #[test]
    fn test_synthetic_request_coerces_num_subjects() {
        let request = FormKind::SyntheticData
            .build_request(&synthetic_form())
            .unwrap();

        assert_eq!(request.endpoint(), "/api/generate-synthetic-data");
        assert_eq!(
            request.body,
            json!({
                "dataset_type": "SDTM",
                "domain": "DM",
                "num_subjects": 10,
                "therapeutic_area": "Oncology",
                "data_format": "csv"
            })
        );
    }

    #[test]
    fn test_synthetic_request_leaves_domains_alone() {
        let payload = synthetic_form().with_field("domains", "DM, AE");
        let request = FormKind::SyntheticData.build_request(&payload).unwrap();
        assert_eq!(request.body["domains"], json!("DM, AE"));
    }

    #[test]
    fn test_raw_request_coerces_both_fields() {
        let payload = FormPayload::new()
            .with_field("num_subjects", "20")
            .with_field("therapeutic_area", "Oncology")
            .with_field("domains", " DM, AE ,,VS ")
            .with_field("study_story", "none")
            .with_field("output_format", "csv");

        let request = FormKind::RawDatasetPackage.build_request(&payload).unwrap();

        assert_eq!(request.endpoint(), "/api/generate-raw-dataset-package");
        assert_eq!(
            request.body,
            json!({
                "num_subjects": 20,
                "therapeutic_area": "Oncology",
                "domains": ["DM", "AE", "VS"],
                "study_story": "none",
                "output_format": "csv"
            })
        );
    }

    #[test]
    fn test_raw_request_empty_domains() {
        let payload = FormPayload::new()
            .with_field("num_subjects", "1")
            .with_field("domains", ",,");
        let request = FormKind::RawDatasetPackage.build_request(&payload).unwrap();
        assert_eq!(request.body["domains"], json!([]));
    }

    #[test]
    fn test_raw_request_requires_domains() {
        let payload = FormPayload::new().with_field("num_subjects", "1");
        let err = FormKind::RawDatasetPackage
            .build_request(&payload)
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid value for domains: field is missing");
    }

    #[test]
    fn test_invalid_num_subjects_is_rejected() {
        let payload = synthetic_form().with_field("num_subjects", "many");
        let err = FormKind::SyntheticData.build_request(&payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for num_subjects: 'many' is not a base-10 integer"
        );
    }

    #[test]
    fn test_missing_num_subjects_is_rejected() {
        let err = FormKind::SyntheticData
            .build_request(&FormPayload::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for num_subjects: field is missing"
        );
    }

    #[test]
    fn test_analysis_request_passes_fields_through() {
        let payload = FormPayload::new()
            .with_field("language", "sas")
            .with_field("dataset_path", "testing/test_data/DM.csv")
            .with_field("output_type", "demographics")
            .with_field("treatment_var", "ARM")
            .with_field("num_subjects", "not coerced here");

        let request = FormKind::AnalysisCode.build_request(&payload).unwrap();

        assert_eq!(request.endpoint(), "/api/generate-analysis-code");
        assert_eq!(request.body["num_subjects"], json!("not coerced here"));
        assert_eq!(request.body["language"], json!("sas"));
    }

    #[test]
    fn test_status_text() {
        assert_eq!(FormKind::SyntheticData.status_text(), "Generating...");
        assert_eq!(
            FormKind::RawDatasetPackage.status_text(),
            "Generating package..."
        );
        assert_eq!(
            FormKind::AnalysisCode.status_text(),
            "Generating analysis code..."
        );
    }

    #[test]
    fn test_endpoints_are_distinct() {
        let mut endpoints: Vec<_> = FormKind::ALL.iter().map(|k| k.endpoint()).collect();
        endpoints.dedup();
        assert_eq!(endpoints.len(), FormKind::ALL.len());
    }
}
