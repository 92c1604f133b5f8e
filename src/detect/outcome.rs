//! Intermediate detection types.

/// A contiguous region that survived the category's area/shape filter.
///
/// Regions are ephemeral: produced by the extractor, consumed by the
/// scoring pass within the same call, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateRegion {
    /// Enclosed pixel area.
    pub area: f64,
    /// Boundary length, computed only where the filter needs shape info.
    pub perimeter: Option<f64>,
    /// `4*pi*area / perimeter^2`, when the perimeter was computed.
    pub circularity: Option<f64>,
}

impl CandidateRegion {
    pub fn from_area(area: f64) -> Self {
        Self {
            area,
            perimeter: None,
            circularity: None,
        }
    }
}

/// Category-specific extraction result.
///
/// Invariant: every region listed here already passed the category's
/// minimum-area (and, where applicable, circularity / vertex-count)
/// filter. Rejected regions never enter the list.
#[derive(Clone, Debug, Default)]
pub struct DetectionOutcome {
    pub regions: Vec<CandidateRegion>,
    /// Total pixel area of the source image.
    pub image_area: u64,
}

impl DetectionOutcome {
    pub fn num_detections(&self) -> usize {
        self.regions.len()
    }

    /// Float sum of all surviving region areas.
    pub fn total_area(&self) -> f64 {
        self.regions.iter().map(|r| r.area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_area_sums_regions() {
        let outcome = DetectionOutcome {
            regions: vec![
                CandidateRegion::from_area(120.5),
                CandidateRegion::from_area(300.25),
            ],
            image_area: 10_000,
        };
        assert_eq!(outcome.num_detections(), 2);
        assert!((outcome.total_area() - 420.75).abs() < 1e-9);
    }
}
