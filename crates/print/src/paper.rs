//! Paper geometry: preset sizes, orientation, and the content scale.

use serde::{Deserialize, Serialize};

use ringside_core::layout::Canvas;

/// CSS reference pixels per millimetre (96 DPI).
pub const PX_PER_MM: f64 = 96.0 / 25.4;

/// Content never scales below this, however small the paper.
pub const MIN_PRINT_SCALE: f64 = 0.1;

/// Preset paper sizes, portrait-referenced in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    A5,
    Custom { width_mm: f64, height_mm: f64 },
}

impl PaperSize {
    fn portrait_mm(self) -> (f64, f64) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::Letter => (215.9, 279.4),
            Self::A5 => (148.0, 210.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Width and height in millimetres for the given orientation.
    ///
    /// Custom sizes are portrait-referenced like the presets, so landscape
    /// swaps them too.
    pub fn dimensions_mm(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.portrait_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// One print run's options: the paper, its orientation, and the bleed
/// margin reserved around the content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintOptions {
    #[serde(default)]
    pub paper: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub bleed_mm: f64,
}

pub fn mm_to_px(mm: f64) -> f64 {
    mm * PX_PER_MM
}

/// The uniform scale fitting the canvas inside the paper minus bleed.
///
/// Floored at [`MIN_PRINT_SCALE`] so an oversized bleed or tiny paper never
/// collapses the content to nothing; a canvas smaller than the paper scales
/// up past 1.
pub fn content_scale(canvas: &Canvas, options: PrintOptions) -> f64 {
    let (paper_w_mm, paper_h_mm) = options.paper.dimensions_mm(options.orientation);
    let avail_w = mm_to_px(paper_w_mm) - 2.0 * mm_to_px(options.bleed_mm);
    let avail_h = mm_to_px(paper_h_mm) - 2.0 * mm_to_px(options.bleed_mm);
    let scale = (avail_w / canvas.width).min(avail_h / canvas.height);
    if scale.is_finite() {
        scale.max(MIN_PRINT_SCALE)
    } else {
        MIN_PRINT_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_portrait_referenced() {
        assert_eq!(
            PaperSize::A4.dimensions_mm(Orientation::Portrait),
            (210.0, 297.0)
        );
        assert_eq!(
            PaperSize::A4.dimensions_mm(Orientation::Landscape),
            (297.0, 210.0)
        );
        assert_eq!(
            PaperSize::Letter.dimensions_mm(Orientation::Portrait),
            (215.9, 279.4)
        );
        assert_eq!(
            PaperSize::A5.dimensions_mm(Orientation::Portrait),
            (148.0, 210.0)
        );
    }

    #[test]
    fn custom_sizes_pass_through() {
        let paper = PaperSize::Custom {
            width_mm: 100.0,
            height_mm: 50.0,
        };
        assert_eq!(paper.dimensions_mm(Orientation::Portrait), (100.0, 50.0));
        assert_eq!(paper.dimensions_mm(Orientation::Landscape), (50.0, 100.0));
    }

    #[test]
    fn a_full_hd_canvas_shrinks_onto_a4_portrait() {
        let scale = content_scale(&Canvas::default(), PrintOptions::default());
        let expected = 210.0 * PX_PER_MM / 1920.0;
        assert!((scale - expected).abs() < 1e-9);
        assert!(scale > MIN_PRINT_SCALE && scale < 1.0);
    }

    #[test]
    fn a_small_canvas_scales_up() {
        let canvas = Canvas {
            width: 100.0,
            height: 100.0,
            ..Canvas::default()
        };
        let scale = content_scale(&canvas, PrintOptions::default());
        assert!(scale > 1.0);
    }

    #[test]
    fn bleed_subtracts_from_both_edges() {
        let options = PrintOptions {
            bleed_mm: 5.0,
            ..PrintOptions::default()
        };
        let scale = content_scale(&Canvas::default(), options);
        let expected = (210.0 - 10.0) * PX_PER_MM / 1920.0;
        assert!((scale - expected).abs() < 1e-9);
    }

    #[test]
    fn oversized_bleed_floors_the_scale() {
        let options = PrintOptions {
            bleed_mm: 200.0,
            ..PrintOptions::default()
        };
        let scale = content_scale(&Canvas::default(), options);
        assert_eq!(scale, MIN_PRINT_SCALE);
    }

    #[test]
    fn paper_sizes_serialize_as_names_or_custom_maps() {
        assert_eq!(
            serde_json::to_value(PaperSize::A4).unwrap(),
            serde_json::json!("a4")
        );
        assert_eq!(
            serde_json::to_value(PaperSize::Custom {
                width_mm: 100.0,
                height_mm: 50.0
            })
            .unwrap(),
            serde_json::json!({ "custom": { "width_mm": 100.0, "height_mm": 50.0 } })
        );
        let parsed: PaperSize = serde_json::from_str("\"letter\"").unwrap();
        assert_eq!(parsed, PaperSize::Letter);
    }
}
