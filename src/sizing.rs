//! Pure sizing math for the gallery preview dialog.
//!
//! All functions here are pure and testable without a viewport or images.

use crate::config::DialogConfig;
use crate::types::{Dimensions, Viewport};

/// Rendered dialog box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogBox {
    pub width: f64,
    pub height: f64,
}

/// Size the dialog for an image of `natural` size.
///
/// Each axis is `min(natural + padding, viewport - margin)`, computed
/// independently, so an oversized image never pushes the dialog past the
/// viewport. The result is never negative, even for viewports smaller than
/// the margin.
///
/// # Examples
/// ```
/// # use simple_folio::sizing::dialog_box;
/// # use simple_folio::config::DialogConfig;
/// # use simple_folio::types::{Dimensions, Viewport};
/// let config = DialogConfig::default(); // padding 48x160, margin 32x32
/// let viewport = Viewport { width: 1280.0, height: 800.0 };
///
/// // Small image: natural size plus chrome
/// let b = dialog_box(Dimensions::new(400, 300), viewport, &config);
/// assert_eq!((b.width, b.height), (448.0, 460.0));
///
/// // Huge image: clamped to the viewport minus margin
/// let b = dialog_box(Dimensions::new(4000, 3000), viewport, &config);
/// assert_eq!((b.width, b.height), (1248.0, 768.0));
/// ```
pub fn dialog_box(natural: Dimensions, viewport: Viewport, config: &DialogConfig) -> DialogBox {
    let [pad_x, pad_y] = config.padding;
    let [margin_x, margin_y] = config.margin;

    DialogBox {
        width: clamp_axis(natural.width as f64 + pad_x, viewport.width - margin_x),
        height: clamp_axis(natural.height as f64 + pad_y, viewport.height - margin_y),
    }
}

fn clamp_axis(wanted: f64, available: f64) -> f64 {
    wanted.min(available).max(0.0)
}

/// Scale `natural` down to fit inside the dialog's content area, keeping its
/// aspect ratio. Images that already fit are returned unchanged.
pub fn fit_image(natural: Dimensions, dialog: DialogBox, config: &DialogConfig) -> (f64, f64) {
    let [pad_x, pad_y] = config.padding;
    let avail_w = (dialog.width - pad_x).max(0.0);
    let avail_h = (dialog.height - pad_y).max(0.0);
    let (w, h) = (natural.width as f64, natural.height as f64);

    if w == 0.0 || h == 0.0 {
        return (0.0, 0.0);
    }

    let scale = (avail_w / w).min(avail_h / h).min(1.0);
    (w * scale, h * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DialogConfig {
        DialogConfig {
            padding: [40.0, 100.0],
            margin: [64.0, 64.0],
            ..DialogConfig::default()
        }
    }

    fn viewport(width: f64, height: f64) -> Viewport {
        Viewport { width, height }
    }

    // =========================================================================
    // dialog_box tests
    // =========================================================================

    #[test]
    fn small_image_gets_natural_size_plus_padding() {
        let b = dialog_box(Dimensions::new(300, 200), viewport(1920.0, 1080.0), &config());
        assert_eq!(b, DialogBox { width: 340.0, height: 300.0 });
    }

    #[test]
    fn oversized_image_clamps_both_axes() {
        let b = dialog_box(Dimensions::new(6000, 4000), viewport(1920.0, 1080.0), &config());
        assert_eq!(b, DialogBox { width: 1856.0, height: 1016.0 });
    }

    #[test]
    fn axes_clamp_independently() {
        // Tall narrow image: width fits, height clamps
        let b = dialog_box(Dimensions::new(200, 3000), viewport(1280.0, 800.0), &config());
        assert_eq!(b.width, 240.0);
        assert_eq!(b.height, 736.0);

        // Wide short image: height fits, width clamps
        let b = dialog_box(Dimensions::new(5000, 100), viewport(1280.0, 800.0), &config());
        assert_eq!(b.width, 1216.0);
        assert_eq!(b.height, 200.0);
    }

    #[test]
    fn tiny_viewport_never_negative() {
        let b = dialog_box(Dimensions::new(800, 600), viewport(20.0, 10.0), &config());
        assert_eq!(b, DialogBox { width: 0.0, height: 0.0 });
    }

    #[test]
    fn placeholder_dimensions_fit_default_viewport() {
        let cfg = DialogConfig::default();
        let b = dialog_box(cfg.placeholder_dimensions(), Viewport::default(), &cfg);
        assert_eq!(b.width, 848.0);
        assert_eq!(b.height, 760.0);
    }

    // =========================================================================
    // fit_image tests
    // =========================================================================

    #[test]
    fn fit_image_keeps_small_images() {
        let cfg = config();
        let natural = Dimensions::new(300, 200);
        let b = dialog_box(natural, viewport(1920.0, 1080.0), &cfg);
        assert_eq!(fit_image(natural, b, &cfg), (300.0, 200.0));
    }

    #[test]
    fn fit_image_scales_down_preserving_aspect() {
        let cfg = config();
        let natural = Dimensions::new(4000, 2000);
        let b = dialog_box(natural, viewport(1280.0, 800.0), &cfg);
        // content area 1176 x 636 → width-bound: scale 0.294
        let (w, h) = fit_image(natural, b, &cfg);
        assert!((w - 1176.0).abs() < 1e-9);
        assert!((h - 588.0).abs() < 1e-9);
    }

    #[test]
    fn fit_image_zero_sized_image() {
        let cfg = config();
        let b = DialogBox { width: 500.0, height: 500.0 };
        assert_eq!(fit_image(Dimensions::new(0, 10), b, &cfg), (0.0, 0.0));
    }
}
