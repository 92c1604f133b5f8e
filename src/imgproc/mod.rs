//! Shared raster primitives.
//!
//! Everything here operates on derived buffers: the decoded image is never
//! mutated in place. Blur, edge extraction and thresholding come from
//! `imageproc`; this module adds the pieces it does not ship - HSV range
//! masks and contour geometry (shoelace area, closed perimeter,
//! circularity).

mod contour_geometry;
mod hsv;

pub use contour_geometry::{circularity, closed_perimeter, contour_area, outer_contours};
pub use hsv::{hsv_range_mask, rgb_to_hsv, HsvRange};
