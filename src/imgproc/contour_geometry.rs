//! Geometry over extracted contours.
//!
//! Contours come from `imageproc::contours::find_contours` as ordered
//! border point chains. Area uses the shoelace formula over the closed
//! polygon, perimeter is the closed arc length; both match the contour
//! semantics the detection thresholds were tuned against.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::geometry::arc_length;
use imageproc::point::Point;

/// Extract only the outermost contours of the non-zero regions in a
/// binary mask. Holes and nested borders are dropped.
pub fn outer_contours(mask: &GrayImage) -> Vec<Contour<u32>> {
    find_contours::<u32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect()
}

/// Shoelace area of the closed polygon spanned by a contour's points.
pub fn contour_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        twice_area += f64::from(p.x) * f64::from(q.y) - f64::from(q.x) * f64::from(p.y);
    }
    twice_area.abs() / 2.0
}

/// Perimeter of the contour treated as a closed curve.
pub fn closed_perimeter(points: &[Point<u32>]) -> f64 {
    arc_length(points, true)
}

/// Shape descriptor `4*pi*area / perimeter^2`: 1.0 for a perfect circle,
/// lower for elongated or irregular shapes. Zero-perimeter contours get 0.
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter <= 0.0 {
        return 0.0;
    }
    4.0 * std::f64::consts::PI * area / (perimeter * perimeter)
}
