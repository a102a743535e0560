//! Pure calculation functions for fitting an image onto the canvas.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::FitMode;

/// Calculate the on-canvas display size of an image under a fit mode.
///
/// - `None`: intrinsic size times `scale`.
/// - `Cover`: the larger of the two canvas/image ratios, times `scale`.
/// - `Contain`: the smaller of the two ratios, times `scale`.
///
/// The limiting axis is picked by integer cross-multiplication and its length
/// is taken straight from the canvas, so at `scale == 1.0` that axis matches
/// the canvas exactly instead of drifting by a rounding error.
///
/// # Arguments
/// * `fit` - Fit policy
/// * `source` - Intrinsic image dimensions (width, height), both non-zero
/// * `canvas` - Canvas dimensions (width, height)
/// * `scale` - User zoom factor
///
/// # Returns
/// * `(width, height)` - Display dimensions in canvas pixels
///
/// # Examples
/// ```
/// # use instafit::imaging::display_dimensions;
/// # use instafit::FitMode;
/// // 2000x1000 landscape contained in 1080x1350 → 1080x540
/// assert_eq!(display_dimensions(FitMode::Contain, (2000, 1000), (1080, 1350), 1.0), (1080.0, 540.0));
///
/// // Same image covering the canvas → 2700x1350
/// assert_eq!(display_dimensions(FitMode::Cover, (2000, 1000), (1080, 1350), 1.0), (2700.0, 1350.0));
/// ```
pub fn display_dimensions(
    fit: FitMode,
    source: (u32, u32),
    canvas: (u32, u32),
    scale: f64,
) -> (f64, f64) {
    let (src_w, src_h) = source;
    let (cnv_w, cnv_h) = canvas;

    // W/iw <= H/ih  <=>  W*ih <= H*iw
    let width_ratio_smaller = cnv_w as u64 * src_h as u64 <= cnv_h as u64 * src_w as u64;

    let width_limits = match fit {
        FitMode::None => {
            return (src_w as f64 * scale, src_h as f64 * scale);
        }
        FitMode::Contain => width_ratio_smaller,
        FitMode::Cover => !width_ratio_smaller,
    };

    if width_limits {
        // Width matches the canvas, height follows the aspect ratio
        let h = src_h as f64 * cnv_w as f64 / src_w as f64;
        (cnv_w as f64 * scale, h * scale)
    } else {
        // Height matches the canvas, width follows the aspect ratio
        let w = src_w as f64 * cnv_h as f64 / src_h as f64;
        (w * scale, cnv_h as f64 * scale)
    }
}

/// Calculate the top-left corner of a box of `size` centered on `center`.
pub fn centered_origin(center: (f64, f64), size: (f64, f64)) -> (f64, f64) {
    (center.0 - size.0 / 2.0, center.1 - size.1 / 2.0)
}

/// Snap a slider value onto a bounded, stepped range.
///
/// Mirrors a range input: the value is clamped to `[min, max]`, then moved to
/// the nearest `min + k * step`. A value already on the grid is returned
/// untouched so exact inputs like `1.0` stay exact.
///
/// Returns `None` for non-finite input.
pub fn snap_to_step(value: f64, min: f64, max: f64, step: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let clamped = value.clamp(min, max);
    let steps = ((clamped - min) / step).round();
    let mut snapped = min + steps * step;
    if snapped > max {
        snapped -= step;
    }
    if (snapped - clamped).abs() <= step * 1e-6 {
        Some(clamped)
    } else {
        Some(snapped.clamp(min, max))
    }
}

/// Integer mean rounded half up, i.e. `floor(sum / count + 0.5)`.
///
/// `count` must be non-zero.
pub fn rounded_mean(sum: u64, count: u64) -> u8 {
    ((2 * sum + count) / (2 * count)).min(u8::MAX as u64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: (u32, u32) = (1080, 1350);

    // =========================================================================
    // display_dimensions tests
    // =========================================================================

    #[test]
    fn none_uses_intrinsic_size() {
        assert_eq!(
            display_dimensions(FitMode::None, (400, 300), CANVAS, 1.0),
            (400.0, 300.0)
        );
    }

    #[test]
    fn none_applies_scale() {
        assert_eq!(
            display_dimensions(FitMode::None, (400, 300), CANVAS, 2.5),
            (1000.0, 750.0)
        );
    }

    #[test]
    fn contain_landscape_matches_width() {
        // 2000x1000 → width-limited: 1080 x 540
        assert_eq!(
            display_dimensions(FitMode::Contain, (2000, 1000), CANVAS, 1.0),
            (1080.0, 540.0)
        );
    }

    #[test]
    fn contain_tall_portrait_matches_height() {
        // 500x1000 → height-limited: 675 x 1350
        assert_eq!(
            display_dimensions(FitMode::Contain, (500, 1000), CANVAS, 1.0),
            (675.0, 1350.0)
        );
    }

    #[test]
    fn contain_upscales_small_images() {
        // 108x135 has the canvas aspect: both axes hit exactly
        assert_eq!(
            display_dimensions(FitMode::Contain, (108, 135), CANVAS, 1.0),
            (1080.0, 1350.0)
        );
    }

    #[test]
    fn cover_landscape_matches_height() {
        // 2000x1000 → height-limited: 2700 x 1350
        assert_eq!(
            display_dimensions(FitMode::Cover, (2000, 1000), CANVAS, 1.0),
            (2700.0, 1350.0)
        );
    }

    #[test]
    fn cover_tall_portrait_matches_width() {
        // 500x1000 → width-limited: 1080 x 2160
        assert_eq!(
            display_dimensions(FitMode::Cover, (500, 1000), CANVAS, 1.0),
            (1080.0, 2160.0)
        );
    }

    #[test]
    fn cover_applies_scale_after_fit() {
        assert_eq!(
            display_dimensions(FitMode::Cover, (2000, 1000), CANVAS, 0.5),
            (1350.0, 675.0)
        );
    }

    #[test]
    fn contain_awkward_ratio_stays_inside() {
        // 7x3 gives a non-terminating ratio on the free axis
        let (w, h) = display_dimensions(FitMode::Contain, (7, 3), CANVAS, 1.0);
        assert_eq!(w, 1080.0);
        assert!(h <= 1350.0);
    }

    // =========================================================================
    // centered_origin tests
    // =========================================================================

    #[test]
    fn origin_centers_box() {
        assert_eq!(centered_origin((540.0, 675.0), (1080.0, 540.0)), (0.0, 405.0));
    }

    #[test]
    fn origin_can_be_negative() {
        assert_eq!(centered_origin((0.0, 0.0), (100.0, 50.0)), (-50.0, -25.0));
    }

    // =========================================================================
    // snap_to_step tests
    // =========================================================================

    #[test]
    fn snap_keeps_on_grid_values_exact() {
        assert_eq!(snap_to_step(1.0, 0.1, 3.0, 0.01), Some(1.0));
    }

    #[test]
    fn snap_clamps_to_bounds() {
        assert_eq!(snap_to_step(10.0, 0.1, 3.0, 0.01), Some(3.0));
        assert_eq!(snap_to_step(-1.0, 0.1, 3.0, 0.01), Some(0.1));
    }

    #[test]
    fn snap_rounds_to_nearest_step() {
        let v = snap_to_step(1.234, 0.1, 3.0, 0.01).unwrap();
        assert!((v - 1.23).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn snap_never_exceeds_max_on_uneven_grid() {
        // Grid 0, 0.4, 0.8, 1.2 with max 1.0: 1.0 rounds to 1.2, past max
        let v = snap_to_step(1.0, 0.0, 1.0, 0.4).unwrap();
        assert!(v <= 1.0, "got {v}");
        assert!((v - 0.8).abs() < 1e-9);
    }

    #[test]
    fn snap_rejects_non_finite() {
        assert_eq!(snap_to_step(f64::NAN, 0.1, 3.0, 0.01), None);
        assert_eq!(snap_to_step(f64::INFINITY, 0.1, 3.0, 0.01), None);
    }

    // =========================================================================
    // rounded_mean tests
    // =========================================================================

    #[test]
    fn mean_exact() {
        assert_eq!(rounded_mean(40, 4), 10);
    }

    #[test]
    fn mean_rounds_half_up() {
        // 1.5 → 2, 2.5 → 3
        assert_eq!(rounded_mean(3, 2), 2);
        assert_eq!(rounded_mean(5, 2), 3);
    }

    #[test]
    fn mean_rounds_down_below_half() {
        // 10/3 = 3.33 → 3
        assert_eq!(rounded_mean(10, 3), 3);
    }
}
