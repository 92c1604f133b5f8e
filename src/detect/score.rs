//! Scoring: confidence, severity, priority, recommendation.
//!
//! Pure functions shared by every category; only the confidence curve and
//! label text vary, and those live in the profile. The numeric rules are
//! tuning data carried over verbatim - do not "improve" them.

use crate::detect::profile::ExtractorProfile;
use crate::report::{Priority, Severity};

/// Confidence curve `min(cap, base + n * step)`.
///
/// Callers report `round2` of this value but feed the unrounded value to
/// [`priority`]; the decision table predates the display rounding and the
/// boundary behavior at 0.5 depends on it.
pub fn confidence(num_detections: usize, profile: &ExtractorProfile) -> f64 {
    profile
        .cap
        .min(profile.base + num_detections as f64 * profile.step)
}

/// Round to two decimals for the reported record.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Severity from the percentage of the image the detections cover.
/// Boundary values resolve upward: coverage of exactly 2% is Medium.
pub fn severity(total_area: f64, image_area: u64) -> Severity {
    let coverage = 100.0 * total_area / image_area as f64;
    if coverage < 2.0 {
        Severity::Low
    } else if coverage < 5.0 {
        Severity::Medium
    } else if coverage < 10.0 {
        Severity::High
    } else {
        Severity::Critical
    }
}

/// Priority decision table, evaluated top to bottom, first match wins.
///
/// The final `Medium` arm is reachable only at `confidence == 0.5` with
/// non-Low severity; it is a defined fallback, not dead code.
pub fn priority(confidence: f64, severity: Severity) -> Priority {
    use Severity::{Critical, High, Medium};

    if confidence > 0.7 && matches!(severity, Critical | High) {
        Priority::Urgent
    } else if confidence > 0.7 && severity == Medium {
        Priority::High
    } else if confidence > 0.5 && matches!(severity, High | Critical) {
        Priority::High
    } else if confidence > 0.5 && severity == Medium {
        Priority::Medium
    } else if severity == Severity::Low || confidence < 0.5 {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Fixed recommendation template per priority level.
pub fn recommendation(issue_label: &str, priority: Priority) -> String {
    let issue = issue_label.to_lowercase();
    match priority {
        Priority::Urgent => format!(
            "Immediate attention required. Multiple severe {issue} issues detected."
        ),
        Priority::High => {
            format!("High priority action needed. Significant {issue} issues detected.")
        }
        Priority::Medium => format!("Action recommended. Moderate {issue} issues detected."),
        Priority::Low => format!("Low priority. Minor {issue} issues detected."),
    }
}
