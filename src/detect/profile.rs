//! Per-category extraction profiles.
//!
//! All six categories share one extraction routine; what differs is this
//! configuration record: how the signal mask is built, which regions
//! survive, and how detection counts translate into confidence. The
//! router selects a profile, never a separate code path, so the
//! categories cannot drift apart structurally.

use crate::category::{title_case, IssueCategory};
use crate::imgproc::HsvRange;

/// Canny gradient thresholds shared by every edge-based profile.
pub const CANNY_LOW: f32 = 50.0;
pub const CANNY_HIGH: f32 = 150.0;

/// Gaussian sigma equivalent to the 5x5 smoothing kernel the thresholds
/// were tuned with.
pub const BLUR_SIGMA: f32 = 1.1;

/// How the binary signal mask is derived from the decoded image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SignalMask {
    /// Grayscale -> Gaussian blur -> Canny edge map.
    BlurredEdges { sigma: f32, low: f32, high: f32 },
    /// Grayscale -> Canny edge map, no smoothing.
    Edges { low: f32, high: f32 },
    /// Grayscale -> inverse binary threshold (selects dark regions).
    DarkRegions { threshold: u8 },
    /// Grayscale -> binary threshold (selects bright spots).
    BrightSpots { threshold: u8 },
    /// RGB -> HSV -> in-range mask.
    HueBand(HsvRange),
}

/// Which candidate regions survive extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegionFilter {
    MinArea(f64),
    /// Area floor plus a circularity floor (round-ish shapes).
    Circular { min_area: f64, min_circularity: f64 },
    /// Area floor plus a polygon-approximation vertex floor
    /// (rectangular/geometric shapes).
    Polygonal { min_area: f64, min_vertices: usize },
    /// Open interval on area (bright-spot sizing).
    AreaBand { min_area: f64, max_area: f64 },
}

/// Complete per-category configuration.
#[derive(Clone, Debug)]
pub struct ExtractorProfile {
    /// Label carried by a positive detection record.
    pub label: String,
    /// Label interpolated into recommendations and no-detection records.
    /// Differs from `label` only for construction, which reports as
    /// "Construction/Infrastructure" but recommends as "Construction".
    pub brief_label: String,
    pub no_detection_message: String,
    /// Confidence reported when nothing survives the filter.
    pub no_detection_confidence: f64,
    /// Confidence curve: `min(cap, base + n * step)`.
    pub base: f64,
    pub step: f64,
    pub cap: f64,
    pub mask: SignalMask,
    pub filter: RegionFilter,
}

impl ExtractorProfile {
    pub fn for_category(category: &IssueCategory) -> Self {
        match category {
            IssueCategory::Pothole => Self {
                label: "Pothole".into(),
                brief_label: "Pothole".into(),
                no_detection_message: "No pothole-like features detected".into(),
                no_detection_confidence: 0.2,
                base: 0.3,
                step: 0.15,
                cap: 0.95,
                mask: SignalMask::BlurredEdges {
                    sigma: BLUR_SIGMA,
                    low: CANNY_LOW,
                    high: CANNY_HIGH,
                },
                filter: RegionFilter::Circular {
                    min_area: 100.0,
                    min_circularity: 0.3,
                },
            },
            IssueCategory::Garbage => Self {
                label: "Garbage/Waste".into(),
                brief_label: "Garbage/Waste".into(),
                no_detection_message: "No garbage/waste features detected".into(),
                no_detection_confidence: 0.2,
                base: 0.4,
                step: 0.1,
                cap: 0.95,
                mask: SignalMask::DarkRegions { threshold: 100 },
                filter: RegionFilter::MinArea(500.0),
            },
            IssueCategory::Construction => Self {
                label: "Construction/Infrastructure".into(),
                brief_label: "Construction".into(),
                no_detection_message: "No construction/infrastructure issues detected".into(),
                no_detection_confidence: 0.2,
                base: 0.35,
                step: 0.12,
                cap: 0.95,
                mask: SignalMask::Edges {
                    low: CANNY_LOW,
                    high: CANNY_HIGH,
                },
                filter: RegionFilter::Polygonal {
                    min_area: 200.0,
                    min_vertices: 4,
                },
            },
            IssueCategory::Water => Self {
                label: "Water/Drainage".into(),
                brief_label: "Water/Drainage".into(),
                no_detection_message: "No water/drainage issues detected".into(),
                no_detection_confidence: 0.2,
                base: 0.3,
                step: 0.15,
                cap: 0.95,
                mask: SignalMask::HueBand(HsvRange {
                    hue: (100, 130),
                    saturation: (50, 255),
                    value: (50, 255),
                }),
                filter: RegionFilter::MinArea(300.0),
            },
            IssueCategory::Streetlight => Self {
                label: "Streetlight".into(),
                brief_label: "Streetlight".into(),
                no_detection_message: "No streetlight issues detected".into(),
                no_detection_confidence: 0.2,
                base: 0.4,
                step: 0.08,
                cap: 0.95,
                mask: SignalMask::BrightSpots { threshold: 200 },
                filter: RegionFilter::AreaBand {
                    min_area: 50.0,
                    max_area: 2000.0,
                },
            },
            IssueCategory::Other(raw) => {
                let label = title_case(raw);
                Self {
                    brief_label: label.clone(),
                    no_detection_message: format!(
                        "No {} issues detected",
                        raw.to_lowercase()
                    ),
                    no_detection_confidence: 0.15,
                    base: 0.3,
                    step: 0.1,
                    cap: 0.9,
                    mask: SignalMask::Edges {
                        low: CANNY_LOW,
                        high: CANNY_HIGH,
                    },
                    filter: RegionFilter::MinArea(150.0),
                    label,
                }
            }
        }
    }
}
