//! RGB to HSV conversion and range masking.
//!
//! Values use the OpenCV byte scale so threshold constants can be carried
//! over unchanged from the tuning data: H in 0..180 (half degrees),
//! S and V in 0..255.

use image::{GrayImage, RgbImage};

/// Inclusive HSV band. All three channels must fall inside for a pixel to
/// be selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HsvRange {
    pub hue: (u8, u8),
    pub saturation: (u8, u8),
    pub value: (u8, u8),
}

/// Convert one RGB sample to HSV on the OpenCV byte scale.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r_n = f32::from(r) / 255.0;
    let g_n = f32::from(g) / 255.0;
    let b_n = f32::from(b) / 255.0;

    let max = r_n.max(g_n).max(b_n);
    let min = r_n.min(g_n).min(b_n);
    let delta = max - min;

    // Hue in degrees, then halved into the 0..180 byte range.
    let h_deg = if delta < 1e-6 {
        0.0
    } else if (max - r_n).abs() < 1e-6 {
        60.0 * (((g_n - b_n) / delta) % 6.0)
    } else if (max - g_n).abs() < 1e-6 {
        60.0 * (((b_n - r_n) / delta) + 2.0)
    } else {
        60.0 * (((r_n - g_n) / delta) + 4.0)
    };
    let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

    let s = if max < 1e-6 { 0.0 } else { delta / max };

    let h = (h_deg / 2.0).round().min(179.0) as u8;
    let s = (s * 255.0).round() as u8;
    let v = (max * 255.0).round() as u8;
    (h, s, v)
}

/// Produce a binary mask (255 inside the band, 0 outside) from an RGB
/// image. Equivalent to an HSV conversion followed by an in-range test.
pub fn hsv_range_mask(image: &RgbImage, range: HsvRange) -> GrayImage {
    let mut mask = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);
        let inside = range.hue.0 <= h
            && h <= range.hue.1
            && range.saturation.0 <= s
            && s <= range.saturation.1
            && range.value.0 <= v
            && v <= range.value.1;
        if inside {
            mask.put_pixel(x, y, image::Luma([255u8]));
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_red() {
        let (h, s, v) = rgb_to_hsv(255, 0, 0);
        assert_eq!(h, 0);
        assert_eq!(s, 255);
        assert_eq!(v, 255);
    }

    #[test]
    fn pure_blue_sits_at_half_degree_120() {
        let (h, s, v) = rgb_to_hsv(0, 0, 255);
        assert_eq!(h, 120);
        assert_eq!(s, 255);
        assert_eq!(v, 255);
    }

    #[test]
    fn gray_has_no_saturation() {
        let (h, s, v) = rgb_to_hsv(128, 128, 128);
        assert_eq!(h, 0);
        assert_eq!(s, 0);
        assert_eq!(v, 128);
    }

    #[test]
    fn mask_selects_only_in_band_pixels() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgb([0, 0, 255])); // blue
        img.put_pixel(1, 0, image::Rgb([255, 0, 0])); // red
        let range = HsvRange {
            hue: (100, 130),
            saturation: (50, 255),
            value: (50, 255),
        };
        let mask = hsv_range_mask(&img, range);
        assert_eq!(mask.get_pixel(0, 0).0[0], 255);
        assert_eq!(mask.get_pixel(1, 0).0[0], 0);
    }
}
