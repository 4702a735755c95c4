//! Checkbox region sampling and density classification
//!
//! A checkbox is presumed to sit in an 11-point band starting one point above
//! the top of its question's text, inside a fixed column of the page. The
//! band is cropped from the section-page raster and classified by the
//! fraction of dark pixels it contains.

use crate::template::CheckboxColumn;
use image::DynamicImage;

/// Half-width of the band around the fill threshold flagged as marginal
pub const MARGINAL_BAND: f32 = 0.02;

/// Rectangle in top-origin page coordinates (points) presumed to contain a
/// checkbox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x_start: f32,
    pub y_top: f32,
    pub x_end: f32,
    pub y_bottom: f32,
}

impl Region {
    /// Band around an anchor inside one checkbox column: from
    /// `anchor_y - band_above` down to `anchor_y + band_below`.
    pub fn around_anchor(
        anchor_y: f32,
        column: &CheckboxColumn,
        band_above: f32,
        band_below: f32,
    ) -> Self {
        Self {
            x_start: column.x_start,
            y_top: anchor_y - band_above,
            x_end: column.x_end,
            y_bottom: anchor_y + band_below,
        }
    }

    /// Pixel rectangle (left, top, width, height) at the given magnification,
    /// clamped to the raster bounds. `None` when nothing of the region lies
    /// on the raster.
    pub fn to_pixels(
        &self,
        scale: f32,
        raster_width: u32,
        raster_height: u32,
    ) -> Option<(u32, u32, u32, u32)> {
        let left = (self.x_start * scale).round().clamp(0.0, raster_width as f32) as u32;
        let right = (self.x_end * scale).round().clamp(0.0, raster_width as f32) as u32;
        let top = (self.y_top * scale).round().clamp(0.0, raster_height as f32) as u32;
        let bottom = (self.y_bottom * scale).round().clamp(0.0, raster_height as f32) as u32;

        if right <= left || bottom <= top {
            return None;
        }

        Some((left, top, right - left, bottom - top))
    }
}

/// Classifier verdict for one checkbox region
#[derive(Debug, Clone, Copy)]
pub struct BoxRead {
    /// Whether the region reads as checked
    pub checked: bool,
    /// Raw fraction of dark pixels, for callers applying their own policy
    pub fill_ratio: f32,
    /// Whether the fill ratio landed within [`MARGINAL_BAND`] of the cutoff
    pub marginal: bool,
}

/// Crop a checkbox region out of the page raster
///
/// Returns `None` (with a warning) when the region falls entirely outside the
/// rendered page; the caller treats that read as absent.
pub fn sample_region(raster: &DynamicImage, scale: f32, region: &Region) -> Option<DynamicImage> {
    let (left, top, width, height) =
        match region.to_pixels(scale, raster.width(), raster.height()) {
            Some(rect) => rect,
            None => {
                tracing::warn!(?region, "checkbox region falls outside the rendered page");
                return None;
            }
        };

    Some(raster.crop_imm(left, top, width, height))
}

/// Decide whether a rasterized checkbox region is checked
///
/// Grayscale values strictly below `darkness_cutoff` count as dark; the
/// region is checked when the dark fraction strictly exceeds
/// `fill_threshold`. The threshold is global and non-adaptive; no noise
/// filtering is applied.
pub fn classify(raster: &DynamicImage, darkness_cutoff: u8, fill_threshold: f32) -> BoxRead {
    let gray = raster.to_luma8();
    let total = (gray.width() as u64 * gray.height() as u64) as usize;

    let dark = gray
        .pixels()
        .filter(|pixel| pixel.0[0] < darkness_cutoff)
        .count();

    let fill_ratio = if total == 0 {
        0.0
    } else {
        dark as f32 / total as f32
    };

    BoxRead {
        checked: fill_ratio > fill_threshold,
        fill_ratio,
        marginal: (fill_ratio - fill_threshold).abs() <= MARGINAL_BAND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FormTemplate;
    use image::{GrayImage, Luma};

    const CUTOFF: u8 = 200;
    const THRESHOLD: f32 = 0.12;

    /// 100x100 grayscale raster with the first `dark` pixels black
    fn raster_with_dark_pixels(dark: u32) -> DynamicImage {
        let img = GrayImage::from_fn(100, 100, |x, y| {
            if y * 100 + x < dark {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    fn uniform_raster(value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(50, 50, Luma([value])))
    }

    #[test]
    fn test_binarization_boundary() {
        // 199 is dark, 200 is light; the cutoff is a strict less-than.
        let just_dark = classify(&uniform_raster(199), CUTOFF, THRESHOLD);
        assert_eq!(just_dark.fill_ratio, 1.0);
        assert!(just_dark.checked);

        let just_light = classify(&uniform_raster(200), CUTOFF, THRESHOLD);
        assert_eq!(just_light.fill_ratio, 0.0);
        assert!(!just_light.checked);
    }

    #[test]
    fn test_fill_ratio_exactly_at_threshold_is_unchecked() {
        // 1200 of 10000 pixels dark: ratio == 0.12, strict inequality fails.
        let read = classify(&raster_with_dark_pixels(1200), CUTOFF, THRESHOLD);
        assert_eq!(read.fill_ratio, 0.12);
        assert!(!read.checked);
        assert!(read.marginal);
    }

    #[test]
    fn test_classifier_monotonic_around_threshold() {
        let below = classify(&raster_with_dark_pixels(1100), CUTOFF, THRESHOLD);
        assert!(!below.checked);
        assert!(below.marginal);

        let above = classify(&raster_with_dark_pixels(1300), CUTOFF, THRESHOLD);
        assert!(above.checked);
        assert!(above.marginal);
    }

    #[test]
    fn test_clear_verdicts_are_not_marginal() {
        let empty = classify(&raster_with_dark_pixels(0), CUTOFF, THRESHOLD);
        assert!(!empty.checked);
        assert!(!empty.marginal);

        let full = classify(&raster_with_dark_pixels(10_000), CUTOFF, THRESHOLD);
        assert!(full.checked);
        assert_eq!(full.fill_ratio, 1.0);
        assert!(!full.marginal);
    }

    #[test]
    fn test_region_geometry_at_default_scale() {
        // Anchor at y=100 with the YES column gives the documented
        // [465, 99, 480, 110] band, a 150x110 pixel crop at 10x.
        let template = FormTemplate::default();
        let region = Region::around_anchor(
            100.0,
            &template.yes_column,
            template.band_above,
            template.band_below,
        );
        assert_eq!(region.x_start, 465.0);
        assert_eq!(region.y_top, 99.0);
        assert_eq!(region.x_end, 480.0);
        assert_eq!(region.y_bottom, 110.0);

        let pixels = region.to_pixels(10.0, 6120, 7920).unwrap();
        assert_eq!(pixels, (4650, 990, 150, 110));
    }

    #[test]
    fn test_region_off_page_is_rejected() {
        let template = FormTemplate::default();
        let region = Region::around_anchor(
            1000.0,
            &template.yes_column,
            template.band_above,
            template.band_below,
        );
        // Band starts below a 792-point page rendered at 10x.
        assert_eq!(region.to_pixels(10.0, 6120, 7920), None);
    }

    #[test]
    fn test_region_partially_off_page_is_clamped() {
        let template = FormTemplate::default();
        let region = Region::around_anchor(
            0.5,
            &template.yes_column,
            template.band_above,
            template.band_below,
        );
        let (left, top, width, height) = region.to_pixels(10.0, 6120, 7920).unwrap();
        assert_eq!((left, top), (4650, 0));
        assert_eq!(width, 150);
        assert_eq!(height, 105);
    }

    #[test]
    fn test_sample_region_crops_expected_area() {
        // Page-sized raster, dark only inside the target band.
        let page = GrayImage::from_fn(6120, 7920, |x, y| {
            if (4650..4800).contains(&x) && (990..1100).contains(&y) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        let page = DynamicImage::ImageLuma8(page);

        let template = FormTemplate::default();
        let region = Region::around_anchor(
            100.0,
            &template.yes_column,
            template.band_above,
            template.band_below,
        );

        let sample = sample_region(&page, 10.0, &region).unwrap();
        assert_eq!((sample.width(), sample.height()), (150, 110));

        let read = classify(&sample, CUTOFF, THRESHOLD);
        assert_eq!(read.fill_ratio, 1.0);
        assert!(read.checked);
    }
}
