//! Final analysis record emitted for every call, success or failure.
//!
//! The pipeline never surfaces a fault to the caller: decode failures and
//! extraction failures are folded into the same record shape with
//! `detected: false`. JSON field names and order match the wire contract
//! consumed by the reporting backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of the image the detected regions cover.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    /// Never produced by the pipeline (failure records carry `Low`);
    /// kept so the wire schema's `N/A` spelling round-trips.
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
            Severity::NotApplicable => "N/A",
        };
        f.write_str(s)
    }
}

/// Dispatch priority derived from confidence and severity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        };
        f.write_str(s)
    }
}

/// Uniform analysis record.
///
/// Invariant: `detected == false` implies `num_detections == 0`,
/// `total_area == 0` and `priority == Low`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub detected: bool,
    /// Omitted by the legacy pothole-only entry point.
    #[serde(rename = "issueType", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    pub confidence: f64,
    pub severity: Severity,
    pub priority: Priority,
    pub num_detections: usize,
    pub total_area: u64,
    pub recommendation: String,
}

impl AnalysisResponse {
    /// Build a "nothing detected" or failure record with zeroed counts.
    pub fn not_detected(
        issue_type: Option<String>,
        confidence: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            detected: false,
            issue_type,
            confidence,
            severity: Severity::Low,
            priority: Priority::Low,
            num_detections: 0,
            total_area: 0,
            recommendation: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_detected_record_holds_invariant() {
        let r = AnalysisResponse::not_detected(Some("Pothole".into()), 0.2, "nothing here");
        assert!(!r.detected);
        assert_eq!(r.num_detections, 0);
        assert_eq!(r.total_area, 0);
        assert_eq!(r.priority, Priority::Low);
        assert_eq!(r.severity, Severity::Low);
    }

    #[test]
    fn issue_type_serializes_with_wire_name() {
        let r = AnalysisResponse::not_detected(Some("Streetlight".into()), 0.2, "msg");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["issueType"], "Streetlight");
        assert_eq!(json["severity"], "Low");
    }

    #[test]
    fn legacy_record_omits_issue_type() {
        let r = AnalysisResponse::not_detected(None, 0.0, "Failed to read image");
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("issueType"));
    }

    #[test]
    fn severity_na_spelling() {
        assert_eq!(
            serde_json::to_string(&Severity::NotApplicable).unwrap(),
            "\"N/A\""
        );
        assert_eq!(Severity::NotApplicable.to_string(), "N/A");
    }
}
