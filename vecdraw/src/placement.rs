//! Mapping of one text line from normalized device space onto pixels.
//!
//! Normalized space spans `-1.0..=1.0` on both axes with +y up. Pixel space
//! has its origin in the top-left corner with +y down. `size` 1.0 makes one
//! line as tall as the target.

use tiny_skia::Transform;

use crate::types::{Distortion, TextMode, TextParams};

/// Vertical scale of a line, fixed before the font is consulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineScale {
    pub line_height_px: f32,
    /// Font em size to rasterize at.
    pub em_px: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Font measurements of one line at [`LineScale::em_px`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    /// Sum of advance widths, in unscaled pixels.
    pub advance: f32,
    /// Distance from baseline to the top, positive.
    pub ascent: f32,
    /// Distance from baseline to the bottom, negative.
    pub descent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePlacement {
    /// Glyph-space pen start (left end of the baseline), relative to the anchor.
    pub origin: (f32, f32),
    /// Maps glyph space onto the pixel buffer.
    pub transform: Transform,
    /// Normalized x of the unrotated line's left edge.
    pub left: f32,
    /// Normalized width of the line.
    pub extent: f32,
}

impl LinePlacement {
    pub fn half_width(&self) -> f32 {
        self.extent / 2.0
    }
}

pub fn line_scale(
    params: &TextParams<'_>,
    distortion: &Distortion,
    height_px: f32,
    text_shrink: f32,
) -> LineScale {
    let line_height_px = params.size * distortion.obj_size * height_px;
    LineScale {
        line_height_px,
        em_px: line_height_px * text_shrink,
        scale_x: params.aspect,
        scale_y: distortion.obj_height,
    }
}

/// Horizontal shift of the pen start for `mode`, for a line `width` wide.
pub fn mode_shift(mode: TextMode, width: f32) -> f32 {
    match mode {
        TextMode::Left => 0.0,
        TextMode::Center => -width / 2.0,
        TextMode::Right => -width,
    }
}

pub fn place_line(
    params: &TextParams<'_>,
    distortion: &Distortion,
    scale: &LineScale,
    metrics: &LineMetrics,
    width_px: f32,
    height_px: f32,
) -> LinePlacement {
    let anchor_x = (params.x + 1.0) / 2.0 * width_px;
    let anchor_y = (1.0 - params.y) / 2.0 * height_px;

    // offset is in line heights, +up; glyph space is +down
    let center_y = -params.offset * scale.line_height_px;
    let baseline = center_y + (metrics.ascent + metrics.descent) / 2.0;
    let origin_x = mode_shift(params.mode, metrics.advance);

    let rotation = params.rotation + distortion.rotation;
    let shear_x = params.shear_x + distortion.shear_x;
    let shear_y = params.shear_y + distortion.shear_y;

    let transform = Transform::from_translate(anchor_x, anchor_y)
        .pre_scale(1.0, distortion.scene_height)
        .pre_concat(Transform::from_rotate(-rotation.to_degrees()))
        .pre_concat(Transform::from_skew(-shear_x, -shear_y))
        .pre_scale(scale.scale_x, scale.scale_y);

    let extent = metrics.advance * scale.scale_x * 2.0 / width_px;
    let left = params.x + mode_shift(params.mode, extent);
    LinePlacement {
        origin: (origin_x, baseline),
        transform,
        left,
        extent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: f32 = 200.0;
    const H: f32 = 100.0;

    fn metrics() -> LineMetrics {
        LineMetrics {
            advance: 40.0,
            ascent: 30.0,
            descent: -10.0,
        }
    }

    fn place(params: &TextParams<'_>) -> LinePlacement {
        let d = Distortion::default();
        let scale = line_scale(params, &d, H, 0.75);
        place_line(params, &d, &scale, &metrics(), W, H)
    }

    fn map(t: Transform, x: f32, y: f32) -> (f32, f32) {
        let mut p = [tiny_skia::Point::from_xy(x, y)];
        t.map_points(&mut p);
        (p[0].x, p[0].y)
    }

    #[test]
    fn full_size_line_spans_target_height() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 1.0);
        let s = line_scale(&params, &Distortion::default(), H, 0.8);
        assert_eq!(s.line_height_px, H);
        assert_eq!(s.em_px, 80.0);
    }

    #[test]
    fn shrink_is_configurable() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.5);
        let a = line_scale(&params, &Distortion::default(), H, 0.7);
        let b = line_scale(&params, &Distortion::default(), H, 0.8);
        assert_eq!(a.line_height_px, b.line_height_px);
        assert!(b.em_px > a.em_px);
    }

    #[test]
    fn anchor_maps_to_pixel_center() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let p = place(&params);
        assert_eq!(map(p.transform, 0.0, 0.0), (W / 2.0, H / 2.0));
    }

    #[test]
    fn positive_y_is_up() {
        let params = TextParams::new(-1.0, 1.0, TextMode::Left, "x", 0.2);
        let p = place(&params);
        assert_eq!(map(p.transform, 0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn line_is_vertically_centered_on_anchor() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let p = place(&params);
        let m = metrics();
        let top = p.origin.1 - m.ascent;
        let bottom = p.origin.1 - m.descent;
        assert_eq!((top + bottom) / 2.0, 0.0);
    }

    #[test]
    fn offset_moves_one_line_height_up() {
        let mut params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let base = place(&params).origin.1;
        params.offset = 1.0;
        let up = place(&params).origin.1;
        assert!((base - up - 0.2 * H).abs() < 1e-4);
    }

    #[test]
    fn aspect_scales_horizontally_only() {
        let mut params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let plain = place(&params);
        params.aspect = 2.0;
        let wide = place(&params);
        assert_eq!(wide.extent, plain.extent * 2.0);
        let (x0, y0) = map(plain.transform, 10.0, 10.0);
        let (x1, y1) = map(wide.transform, 10.0, 10.0);
        assert_eq!(y0, y1);
        assert_eq!(x1 - W / 2.0, (x0 - W / 2.0) * 2.0);
    }

    #[test]
    fn right_mode_ends_at_anchor() {
        let params = TextParams::new(0.5, 0.0, TextMode::Right, "x", 0.2);
        let p = place(&params);
        assert!((p.left + p.extent - 0.5).abs() < 1e-6);
        let end = map(p.transform, p.origin.0 + metrics().advance, 0.0);
        assert!((end.0 - 0.75 * W).abs() < 1e-3);
    }

    #[test]
    fn quarter_turn_points_up() {
        let mut params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        params.rotation = std::f32::consts::FRAC_PI_2;
        let p = place(&params);
        let (x, y) = map(p.transform, 10.0, 0.0);
        assert!((x - W / 2.0).abs() < 1e-3);
        assert!((y - (H / 2.0 - 10.0)).abs() < 1e-3);
    }

    #[test]
    fn distortion_scales_size() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let d = Distortion {
            obj_size: 2.0,
            ..Default::default()
        };
        let s = line_scale(&params, &d, H, 0.75);
        assert!((s.line_height_px - 0.4 * H).abs() < 1e-4);
    }

    fn place_distorted(params: &TextParams<'_>, d: &Distortion) -> (LineScale, LinePlacement) {
        let scale = line_scale(params, d, H, 0.75);
        let p = place_line(params, d, &scale, &metrics(), W, H);
        (scale, p)
    }

    fn assert_near(got: (f32, f32), want: (f32, f32)) {
        assert!(
            (got.0 - want.0).abs() < 1e-3 && (got.1 - want.1).abs() < 1e-3,
            "got {:?}, want {:?}",
            got,
            want
        );
    }

    #[test]
    fn scene_height_stretches_after_rotation() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let d = Distortion {
            scene_height: 2.0,
            ..Default::default()
        };
        let (_, p) = place_distorted(&params, &d);
        assert_near(map(p.transform, 0.0, 10.0), (W / 2.0, H / 2.0 + 20.0));
        assert_near(map(p.transform, 10.0, 0.0), (W / 2.0 + 10.0, H / 2.0));

        // applied in scene space: a quarter-turned line is stretched along its length
        let mut turned = params;
        turned.rotation = std::f32::consts::FRAC_PI_2;
        let (_, p) = place_distorted(&turned, &d);
        assert_near(map(p.transform, 10.0, 0.0), (W / 2.0, H / 2.0 - 20.0));
    }

    #[test]
    fn obj_height_stretches_glyphs_vertically() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let d = Distortion {
            obj_height: 2.0,
            ..Default::default()
        };
        let (s, p) = place_distorted(&params, &d);
        assert_eq!(s.scale_y, 2.0);
        assert!((s.line_height_px - 0.2 * H).abs() < 1e-4);
        assert_near(map(p.transform, 0.0, 10.0), (W / 2.0, H / 2.0 + 20.0));
        assert_near(map(p.transform, 10.0, 0.0), (W / 2.0 + 10.0, H / 2.0));
    }

    #[test]
    fn distortion_rotation_adds_to_line_rotation() {
        let mut params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let d = Distortion {
            rotation: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        let (_, p) = place_distorted(&params, &d);
        assert_near(map(p.transform, 10.0, 0.0), (W / 2.0, H / 2.0 - 10.0));

        params.rotation = std::f32::consts::FRAC_PI_4;
        let d = Distortion {
            rotation: std::f32::consts::FRAC_PI_4,
            ..Default::default()
        };
        let (_, p) = place_distorted(&params, &d);
        assert_near(map(p.transform, 10.0, 0.0), (W / 2.0, H / 2.0 - 10.0));
    }

    #[test]
    fn distortion_shear_x_leans_tops_right() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let d = Distortion {
            shear_x: 1.0,
            ..Default::default()
        };
        let (_, p) = place_distorted(&params, &d);
        // glyph-space -y is up
        assert_near(map(p.transform, 0.0, -10.0), (W / 2.0 + 10.0, H / 2.0 - 10.0));
        assert_near(map(p.transform, 10.0, 0.0), (W / 2.0 + 10.0, H / 2.0));
    }

    #[test]
    fn distortion_shear_y_raises_the_line_end() {
        let params = TextParams::new(0.0, 0.0, TextMode::Left, "x", 0.2);
        let d = Distortion {
            shear_y: 1.0,
            ..Default::default()
        };
        let (_, p) = place_distorted(&params, &d);
        assert_near(map(p.transform, 10.0, 0.0), (W / 2.0 + 10.0, H / 2.0 - 10.0));
        assert_near(map(p.transform, 0.0, -10.0), (W / 2.0, H / 2.0 - 10.0));
    }

    proptest! {
        #[test]
        fn prop_modes_differ_by_half_width(
            x in -1.0f32..1.0,
            size in 0.01f32..2.0,
            aspect in 0.1f32..4.0,
        ) {
            let mut params = TextParams::new(x, 0.0, TextMode::Left, "x", size);
            params.aspect = aspect;
            let left = place(&params);
            params.mode = TextMode::Center;
            let center = place(&params);
            params.mode = TextMode::Right;
            let right = place(&params);

            let hw = center.half_width();
            let tol = 1e-5 * (1.0 + hw);
            prop_assert!((left.left - center.left - hw).abs() < tol);
            prop_assert!((center.left - right.left - hw).abs() < tol);
            prop_assert!((left.left - x).abs() < tol);
        }
    }
}
