//! Response assembly: the absorption boundary for the whole pipeline.
//!
//! Every entry point here is infallible by contract. Decode failures and
//! extraction failures are folded into well-formed `detected: false`
//! records; nothing propagates to the caller as a fault. Each call is a
//! pure function of (image, category) with no state shared across calls.

use std::path::Path;

use image::DynamicImage;

use crate::category::{title_case, IssueCategory};
use crate::detect::{extract, score, DetectionOutcome, ExtractorProfile};
use crate::report::AnalysisResponse;

/// Analyze an image file for the given free-text category label.
///
/// An unreadable or undecodable file yields the `"Failed to read image"`
/// record; any downstream extraction fault yields an
/// `"Error during analysis: ..."` record. Both carry the title-cased
/// input label, not the routed category.
pub fn analyze_image(path: impl AsRef<Path>, category: &str) -> AnalysisResponse {
    let image = match image::open(path.as_ref()) {
        Ok(image) => image,
        Err(err) => {
            log::warn!(
                "could not decode {}: {err}",
                path.as_ref().display()
            );
            return AnalysisResponse::not_detected(
                Some(title_case(category)),
                0.0,
                "Failed to read image",
            );
        }
    };
    analyze_decoded(&image, category)
}

/// Analyze an already-decoded image for the given category label.
pub fn analyze_decoded(image: &DynamicImage, category: &str) -> AnalysisResponse {
    let routed = IssueCategory::from_label(category);
    let profile = ExtractorProfile::for_category(&routed);
    match extract(image, &profile) {
        Ok(outcome) => assemble(&outcome, &profile),
        Err(err) => {
            log::error!("extraction failed for category {routed}: {err}");
            AnalysisResponse::not_detected(
                Some(title_case(category)),
                0.0,
                format!("Error during analysis: {err}"),
            )
        }
    }
}

/// Legacy pothole-only entry point.
///
/// Runs exactly the pothole path of [`analyze_image`] but emits the older
/// single-purpose schema without the `issueType` field. Confidence,
/// severity, priority and the counts are identical to the general path.
pub fn analyze_for_potholes(path: impl AsRef<Path>) -> AnalysisResponse {
    let mut response = analyze_image(path, "pothole");
    response.issue_type = None;
    response
}

fn assemble(outcome: &DetectionOutcome, profile: &ExtractorProfile) -> AnalysisResponse {
    let num_detections = outcome.num_detections();
    if num_detections == 0 {
        return AnalysisResponse::not_detected(
            Some(profile.brief_label.clone()),
            profile.no_detection_confidence,
            profile.no_detection_message.clone(),
        );
    }

    // The priority table consumes the unrounded confidence; only the
    // reported value is rounded.
    let raw_confidence = score::confidence(num_detections, profile);
    let total_area = outcome.total_area();
    let severity = score::severity(total_area, outcome.image_area);
    let priority = score::priority(raw_confidence, severity);

    AnalysisResponse {
        detected: true,
        issue_type: Some(profile.label.clone()),
        confidence: score::round2(raw_confidence),
        severity,
        priority,
        num_detections,
        total_area: total_area as u64,
        recommendation: score::recommendation(&profile.brief_label, priority),
    }
}
