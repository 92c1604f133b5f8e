//! Parameterized region extraction.
//!
//! One routine for every category: derive a binary signal mask per the
//! profile, trace the outermost contours, and keep the regions that pass
//! the profile's filter. Failures (a degenerate decoded grid) surface as
//! `Err`; the response assembler owns turning them into records.

use anyhow::{bail, Result};
use image::{DynamicImage, GenericImageView, GrayImage};
use imageproc::contours::Contour;
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::approximate_polygon_dp;

use crate::detect::outcome::{CandidateRegion, DetectionOutcome};
use crate::detect::profile::{ExtractorProfile, RegionFilter, SignalMask};
use crate::imgproc::{
    circularity, closed_perimeter, contour_area, hsv_range_mask, outer_contours,
};

/// Run the profile's extraction pass over a decoded image.
pub fn extract(image: &DynamicImage, profile: &ExtractorProfile) -> Result<DetectionOutcome> {
    let (width, height) = image.dimensions();
    let image_area = u64::from(width) * u64::from(height);
    if image_area == 0 {
        bail!("decoded image has zero pixel area");
    }

    let mask = signal_mask(image, profile.mask);
    let contours = outer_contours(&mask);
    log::debug!(
        "{}: {}x{} image, {} outer contours",
        profile.label,
        width,
        height,
        contours.len()
    );

    let regions: Vec<CandidateRegion> = contours
        .iter()
        .filter_map(|contour| apply_filter(contour, profile.filter))
        .collect();
    log::debug!(
        "{}: {} of {} contours survived the region filter",
        profile.label,
        regions.len(),
        contours.len()
    );

    Ok(DetectionOutcome {
        regions,
        image_area,
    })
}

fn signal_mask(image: &DynamicImage, mask: SignalMask) -> GrayImage {
    match mask {
        SignalMask::BlurredEdges { sigma, low, high } => {
            let blurred = gaussian_blur_f32(&image.to_luma8(), sigma);
            canny(&blurred, low, high)
        }
        SignalMask::Edges { low, high } => canny(&image.to_luma8(), low, high),
        SignalMask::DarkRegions { threshold: t } => {
            threshold(&image.to_luma8(), t, ThresholdType::BinaryInverted)
        }
        SignalMask::BrightSpots { threshold: t } => {
            threshold(&image.to_luma8(), t, ThresholdType::Binary)
        }
        SignalMask::HueBand(range) => hsv_range_mask(&image.to_rgb8(), range),
    }
}

/// Evaluate one contour against the profile's filter. Returns the
/// candidate region when it survives; shape attributes are computed only
/// where the filter needs them.
fn apply_filter(contour: &Contour<u32>, filter: RegionFilter) -> Option<CandidateRegion> {
    let area = contour_area(&contour.points);
    match filter {
        RegionFilter::MinArea(min_area) => {
            (area > min_area).then(|| CandidateRegion::from_area(area))
        }
        RegionFilter::AreaBand { min_area, max_area } => {
            (area > min_area && area < max_area).then(|| CandidateRegion::from_area(area))
        }
        RegionFilter::Circular {
            min_area,
            min_circularity,
        } => {
            if area <= min_area {
                return None;
            }
            let perimeter = closed_perimeter(&contour.points);
            if perimeter <= 0.0 {
                return None;
            }
            let roundness = circularity(area, perimeter);
            (roundness > min_circularity).then_some(CandidateRegion {
                area,
                perimeter: Some(perimeter),
                circularity: Some(roundness),
            })
        }
        RegionFilter::Polygonal {
            min_area,
            min_vertices,
        } => {
            if area <= min_area {
                return None;
            }
            let perimeter = closed_perimeter(&contour.points);
            let epsilon = 0.02 * perimeter;
            let vertices = approximate_polygon_dp(&contour.points, epsilon, true);
            (vertices.len() >= min_vertices).then_some(CandidateRegion {
                area,
                perimeter: Some(perimeter),
                circularity: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::IssueCategory;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
    use imageproc::rect::Rect;

    fn profile(category: IssueCategory) -> ExtractorProfile {
        ExtractorProfile::for_category(&category)
    }

    #[test]
    fn zero_area_image_is_an_extraction_failure() {
        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        let err = extract(&empty, &profile(IssueCategory::Pothole)).unwrap_err();
        assert!(err.to_string().contains("zero pixel area"));
    }

    #[test]
    fn uniform_gray_image_yields_no_regions_for_any_profile() {
        let flat = DynamicImage::ImageLuma8(GrayImage::from_pixel(120, 120, Luma([128u8])));
        for category in [
            IssueCategory::Pothole,
            IssueCategory::Garbage,
            IssueCategory::Construction,
            IssueCategory::Water,
            IssueCategory::Streetlight,
            IssueCategory::Other("unknown-thing".into()),
        ] {
            let outcome = extract(&flat, &profile(category.clone())).unwrap();
            assert_eq!(
                outcome.num_detections(),
                0,
                "expected no regions for {category:?}"
            );
            assert_eq!(outcome.image_area, 120 * 120);
        }
    }

    #[test]
    fn bright_spot_survives_streetlight_band() {
        let mut img = GrayImage::new(100, 100);
        draw_filled_rect_mut(&mut img, Rect::at(40, 40).of_size(20, 20), Luma([255u8]));
        let outcome = extract(
            &DynamicImage::ImageLuma8(img),
            &profile(IssueCategory::Streetlight),
        )
        .unwrap();
        assert_eq!(outcome.num_detections(), 1);
        let area = outcome.regions[0].area;
        assert!(area > 50.0 && area < 2000.0, "area {area} outside band");
    }

    #[test]
    fn oversized_bright_region_is_rejected_by_streetlight_band() {
        // 60x60 blob: area ~3500, above the 2000 ceiling.
        let mut img = GrayImage::new(100, 100);
        draw_filled_rect_mut(&mut img, Rect::at(20, 20).of_size(60, 60), Luma([255u8]));
        let outcome = extract(
            &DynamicImage::ImageLuma8(img),
            &profile(IssueCategory::Streetlight),
        )
        .unwrap();
        assert_eq!(outcome.num_detections(), 0);
    }

    #[test]
    fn dark_blob_on_light_ground_reads_as_garbage() {
        let mut img = GrayImage::from_pixel(100, 100, Luma([220u8]));
        draw_filled_rect_mut(&mut img, Rect::at(30, 30).of_size(30, 30), Luma([20u8]));
        let outcome = extract(
            &DynamicImage::ImageLuma8(img),
            &profile(IssueCategory::Garbage),
        )
        .unwrap();
        assert_eq!(outcome.num_detections(), 1);
        assert!(outcome.regions[0].area > 500.0);
    }

    #[test]
    fn round_pit_passes_the_circularity_gate() {
        let mut img = GrayImage::from_pixel(200, 200, Luma([200u8]));
        draw_filled_circle_mut(&mut img, (100, 100), 30, Luma([20u8]));
        let outcome = extract(
            &DynamicImage::ImageLuma8(img),
            &profile(IssueCategory::Pothole),
        )
        .unwrap();
        assert!(
            outcome.num_detections() >= 1,
            "expected at least one round region"
        );
        let region = &outcome.regions[0];
        assert!(region.area > 100.0);
        assert!(region.circularity.expect("circularity computed") > 0.3);
    }

    #[test]
    fn blue_fill_reads_as_water() {
        let img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 255]));
        let outcome = extract(
            &DynamicImage::ImageRgb8(img),
            &profile(IssueCategory::Water),
        )
        .unwrap();
        assert_eq!(outcome.num_detections(), 1);
        assert!(outcome.regions[0].area > 300.0);
    }

    #[test]
    fn rectangular_outline_reads_as_construction() {
        let mut img = GrayImage::new(200, 200);
        draw_filled_rect_mut(&mut img, Rect::at(50, 50).of_size(80, 60), Luma([255u8]));
        let outcome = extract(
            &DynamicImage::ImageLuma8(img),
            &profile(IssueCategory::Construction),
        )
        .unwrap();
        assert!(outcome.num_detections() >= 1);
        assert!(outcome.regions[0].area > 200.0);
    }
}
