//! Pointer geometry for the editing surface: device-pixel to canvas-fraction
//! conversion, clamped move/resize gestures, and the zoom/pan viewport.
//!
//! All gesture functions are pure: they take the frame captured when the
//! gesture started plus the cumulative pointer delta, so repeated calls
//! during one drag are idempotent for a given pointer position.

use serde::{Deserialize, Serialize};

use crate::element::{Frame, MIN_SIZE_FRAC};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum zoom factor for the editing surface.
pub const MIN_ZOOM: f64 = 0.25;

/// Maximum zoom factor for the editing surface.
pub const MAX_ZOOM: f64 = 4.0;

/// Pixel threshold under which a resize gesture stops shrinking an element.
/// Converted to a fraction at the current rendered canvas size.
pub const MIN_ELEMENT_PX: f64 = 16.0;

// ---------------------------------------------------------------------------
// Device-pixel conversion
// ---------------------------------------------------------------------------

/// The canvas's rendered bounding box in device pixels (already zoom-scaled).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A point in fractional canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FracPoint {
    pub x: f64,
    pub y: f64,
}

/// Convert an absolute pointer position to fractional canvas coordinates,
/// clamped into the unit square.
pub fn to_fraction(pointer_x: f64, pointer_y: f64, rect: &CanvasRect) -> FracPoint {
    FracPoint {
        x: ((pointer_x - rect.left) / rect.width).clamp(0.0, 1.0),
        y: ((pointer_y - rect.top) / rect.height).clamp(0.0, 1.0),
    }
}

/// Convert a pointer movement in device pixels to a fractional delta.
pub fn delta_fraction(dx_px: f64, dy_px: f64, rect: &CanvasRect) -> (f64, f64) {
    (dx_px / rect.width, dy_px / rect.height)
}

/// The per-axis minimum element size at the current rendered canvas size:
/// [`MIN_ELEMENT_PX`] converted to a fraction, never below the model floor.
pub fn min_fraction(rect: &CanvasRect) -> (f64, f64) {
    (
        (MIN_ELEMENT_PX / rect.width).max(MIN_SIZE_FRAC),
        (MIN_ELEMENT_PX / rect.height).max(MIN_SIZE_FRAC),
    )
}

// ---------------------------------------------------------------------------
// Move / resize
// ---------------------------------------------------------------------------

/// Corner resize handles. Edge handles are deliberately unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl ResizeHandle {
    fn touches_west(self) -> bool {
        matches!(self, Self::NorthWest | Self::SouthWest)
    }

    fn touches_north(self) -> bool {
        matches!(self, Self::NorthWest | Self::NorthEast)
    }
}

/// Move a frame by a fractional delta; position clamps so the element stays
/// inside the unit square, size never changes.
pub fn move_frame(start: Frame, delta: (f64, f64)) -> Frame {
    Frame {
        x: (start.x + delta.0).clamp(0.0, 1.0 - start.width),
        y: (start.y + delta.1).clamp(0.0, 1.0 - start.height),
        ..start
    }
}

/// Resize a frame by dragging one corner handle.
///
/// Only the edges the handle touches move. `min` is the per-axis size floor
/// (see [`min_fraction`]). With `aspect_lock` the height is derived from the
/// width using the pre-drag ratio, keeping the edge opposite the handle
/// pinned. The result is clamped into the unit square.
pub fn resize_frame(
    start: Frame,
    handle: ResizeHandle,
    delta: (f64, f64),
    min: (f64, f64),
    aspect_lock: bool,
) -> Frame {
    let (dx, dy) = delta;
    let right = start.x + start.width;
    let bottom = start.y + start.height;

    let (mut x, mut y, mut w, mut h) = (start.x, start.y, start.width, start.height);

    if handle.touches_west() {
        x += dx;
        w -= dx;
    } else {
        w += dx;
    }
    if handle.touches_north() {
        y += dy;
        h -= dy;
    } else {
        h += dy;
    }

    // Size floors: push the dragged edge back, keep the opposite edge pinned.
    let (min_w, min_h) = (min.0.max(MIN_SIZE_FRAC), min.1.max(MIN_SIZE_FRAC));
    if w < min_w {
        w = min_w;
        if handle.touches_west() {
            x = right - w;
        }
    }

    if aspect_lock {
        h = w * start.ratio();
        if handle.touches_north() {
            y = bottom - h;
        }
    }

    if h < min_h {
        h = min_h;
        if handle.touches_north() {
            y = bottom - h;
        }
    }

    Frame {
        x,
        y,
        width: w,
        height: h,
    }
    .clamped()
}

// ---------------------------------------------------------------------------
// Viewport (zoom / pan)
// ---------------------------------------------------------------------------

/// The editing surface transform: zoom factor plus a raw screen-space pan
/// offset. Purely ephemeral UI state, never persisted with a layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`, re-deriving
    /// the pan so the anchor point's canvas-space position is invariant:
    /// `pan' = anchor - (anchor - pan) * new / old`.
    pub fn set_zoom(&mut self, factor: f64, anchor_x: f64, anchor_y: f64) {
        let old = self.zoom;
        let new = if factor.is_finite() {
            factor.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            old
        };
        let ratio = new / old;
        self.pan_x = anchor_x - (anchor_x - self.pan_x) * ratio;
        self.pan_y = anchor_y - (anchor_y - self.pan_y) * ratio;
        self.zoom = new;
    }

    /// Raw pan offset on top of the zoom transform.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: CanvasRect = CanvasRect {
        left: 100.0,
        top: 50.0,
        width: 960.0,
        height: 540.0,
    };

    fn frame(x: f64, y: f64, w: f64, h: f64) -> Frame {
        Frame {
            x,
            y,
            width: w,
            height: h,
        }
    }

    fn assert_in_unit_square(f: Frame) {
        assert!(f.x >= 0.0, "x = {}", f.x);
        assert!(f.y >= 0.0, "y = {}", f.y);
        assert!(f.x + f.width <= 1.0 + 1e-9, "right = {}", f.x + f.width);
        assert!(f.y + f.height <= 1.0 + 1e-9, "bottom = {}", f.y + f.height);
    }

    // -- to_fraction ---------------------------------------------------------

    #[test]
    fn pointer_maps_to_fractions() {
        let p = to_fraction(100.0 + 480.0, 50.0 + 135.0, &RECT);
        assert_eq!(p.x, 0.5);
        assert_eq!(p.y, 0.25);
    }

    #[test]
    fn pointer_outside_canvas_clamps() {
        let p = to_fraction(0.0, 9999.0, &RECT);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 1.0);
    }

    // -- move_frame ----------------------------------------------------------

    #[test]
    fn move_applies_delta() {
        let f = move_frame(frame(0.1, 0.1, 0.2, 0.2), (0.3, 0.25));
        assert_eq!((f.x, f.y), (0.4, 0.35));
        assert_eq!((f.width, f.height), (0.2, 0.2));
    }

    #[test]
    fn move_clamps_at_edges() {
        let f = move_frame(frame(0.7, 0.7, 0.2, 0.2), (5.0, -5.0));
        assert_eq!((f.x, f.y), (0.8, 0.0));
    }

    #[test]
    fn clamping_invariant_holds_for_move_resize_sequences() {
        // Walk a frame through a nasty gesture sequence; the invariant must
        // hold after every step.
        let mut f = frame(0.4, 0.4, 0.2, 0.2);
        let min = min_fraction(&RECT);
        let steps: &[(f64, f64)] = &[
            (0.9, 0.9),
            (-2.0, 0.1),
            (0.0, -3.0),
            (0.55, 0.0),
            (-0.01, 0.77),
        ];
        for &(dx, dy) in steps {
            f = move_frame(f, (dx, dy));
            assert_in_unit_square(f);
            f = resize_frame(f, ResizeHandle::SouthEast, (dx, dy), min, false);
            assert_in_unit_square(f);
            f = resize_frame(f, ResizeHandle::NorthWest, (dy, dx), min, false);
            assert_in_unit_square(f);
        }
    }

    // -- resize_frame --------------------------------------------------------

    #[test]
    fn southeast_handle_grows_width_and_height() {
        let f = resize_frame(
            frame(0.1, 0.1, 0.2, 0.2),
            ResizeHandle::SouthEast,
            (0.1, 0.15),
            (0.01, 0.01),
            false,
        );
        assert_eq!((f.x, f.y), (0.1, 0.1));
        assert!((f.width - 0.3).abs() < 1e-9);
        assert!((f.height - 0.35).abs() < 1e-9);
    }

    #[test]
    fn northwest_handle_moves_origin() {
        let f = resize_frame(
            frame(0.3, 0.3, 0.4, 0.4),
            ResizeHandle::NorthWest,
            (0.1, 0.1),
            (0.01, 0.01),
            false,
        );
        assert!((f.x - 0.4).abs() < 1e-9);
        assert!((f.y - 0.4).abs() < 1e-9);
        assert!((f.width - 0.3).abs() < 1e-9);
        assert!((f.height - 0.3).abs() < 1e-9);
    }

    #[test]
    fn resize_enforces_pixel_floor() {
        let min = min_fraction(&RECT);
        let f = resize_frame(
            frame(0.4, 0.4, 0.2, 0.2),
            ResizeHandle::SouthEast,
            (-1.0, -1.0),
            min,
            false,
        );
        assert!((f.width - min.0).abs() < 1e-9);
        assert!((f.height - min.1).abs() < 1e-9);
        // Opposite (north-west) corner stays pinned.
        assert_eq!((f.x, f.y), (0.4, 0.4));
    }

    #[test]
    fn west_floor_keeps_right_edge_pinned() {
        let f = resize_frame(
            frame(0.2, 0.2, 0.3, 0.3),
            ResizeHandle::SouthWest,
            (5.0, 0.0),
            (0.05, 0.05),
            false,
        );
        assert!((f.width - 0.05).abs() < 1e-9);
        assert!(((f.x + f.width) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn aspect_lock_preserves_predrag_ratio() {
        let start = frame(0.1, 0.1, 0.4, 0.2); // ratio 0.5
        let f = resize_frame(
            start,
            ResizeHandle::SouthEast,
            (0.2, 0.0),
            (0.01, 0.01),
            true,
        );
        assert!((f.width - 0.6).abs() < 1e-9);
        assert!((f.height - 0.3).abs() < 1e-9);
    }

    #[test]
    fn aspect_lock_on_north_handle_pins_bottom_edge() {
        let start = frame(0.2, 0.2, 0.4, 0.4);
        let bottom = start.y + start.height;
        let f = resize_frame(
            start,
            ResizeHandle::NorthEast,
            (0.1, 0.0),
            (0.01, 0.01),
            true,
        );
        assert!(((f.y + f.height) - bottom).abs() < 1e-9);
    }

    // -- viewport ------------------------------------------------------------

    #[test]
    fn zoom_clamps_to_bounds() {
        let mut vp = Viewport::default();
        vp.set_zoom(10.0, 0.0, 0.0);
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.set_zoom(0.01, 0.0, 0.0);
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_keeps_anchor_invariant() {
        // The anchor's canvas-space coordinate is (anchor - pan) / zoom; it
        // must be unchanged by a zoom-to-cursor step.
        let mut vp = Viewport {
            zoom: 1.0,
            pan_x: 40.0,
            pan_y: -10.0,
        };
        let (ax, ay) = (300.0, 200.0);
        let before = ((ax - vp.pan_x) / vp.zoom, (ay - vp.pan_y) / vp.zoom);
        vp.set_zoom(2.0, ax, ay);
        let after = ((ax - vp.pan_x) / vp.zoom, (ay - vp.pan_y) / vp.zoom);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn pan_is_additive() {
        let mut vp = Viewport::default();
        vp.pan_by(5.0, -3.0);
        vp.pan_by(1.0, 1.0);
        assert_eq!((vp.pan_x, vp.pan_y), (6.0, -2.0));
    }
}
