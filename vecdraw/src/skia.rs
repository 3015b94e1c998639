//! tiny-skia + fontdue backend.
//!
//! Paths are rasterized by tiny-skia in the user space set up with
//! [`Canvas::scale`] (pixels by default). Text is rasterized glyph by glyph
//! with fontdue and composited as small pixmaps through the line transform
//! computed in [`crate::placement`].

use std::f32::consts::PI;
use std::sync::Arc;

use fontdue::Font;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, Mask, Pixmap, PixmapMut, PixmapPaint, Rect, Stroke,
    Transform,
};

use crate::canvas::Canvas;
use crate::config::RenderConfig;
use crate::error::{DrawError, Result};
use crate::helpers::{make_paint, map_cap, map_compose, to_skia_color};
use crate::path::{build_path_from_cmds, PathCmd};
use crate::placement::{line_scale, place_line, LineMetrics, LinePlacement};
use crate::surface::Surface;
use crate::types::{Colour, ColourCompose, Distortion, DrawMode, LineCap, TextParams};

/// Paint state kept by a target between [`Draw`] handles.
#[derive(Clone)]
pub(crate) struct DrawState {
    pub colour: Colour,
    pub outline_colour: Colour,
    pub outline_width: f32,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub compose: ColourCompose,
    pub ctm: Transform,
    pub font: Option<Arc<Font>>,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            colour: Colour::WHITE,
            outline_colour: Colour::BLACK,
            outline_width: 0.0,
            line_width: 1.0,
            line_cap: LineCap::None,
            compose: ColourCompose::Default,
            ctm: Transform::identity(),
            font: None,
        }
    }
}

/// Drawing handle of a [`Target`](crate::Target).
pub struct Draw<'a> {
    pub(crate) surface: &'a mut Surface,
    pub(crate) state: &'a mut DrawState,
    pub(crate) config: &'a RenderConfig,
    pub(crate) clip: Option<&'a Mask>,
}

/// One rasterized glyph, positioned along the pen.
struct Glyph {
    x: f32,
    y: f32,
    width: usize,
    height: usize,
    coverage: Vec<u8>,
}

impl Draw<'_> {
    fn pixmap(&mut self) -> Result<PixmapMut<'_>> {
        self.surface
            .pixmap_mut()
            .ok_or_else(|| DrawError::backend("surface cannot be mapped for drawing"))
    }

    fn blend(&self) -> BlendMode {
        map_compose(self.state.compose)
    }

    fn measure(font: &Font, text: &str, em_px: f32) -> LineMetrics {
        let advance: f32 = text
            .chars()
            .filter(|c| !c.is_control())
            .map(|c| font.metrics(c, em_px).advance_width)
            .sum();
        let (ascent, descent) = font
            .horizontal_line_metrics(em_px)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((0.0, 0.0));
        LineMetrics {
            advance,
            ascent,
            descent,
        }
    }

    fn rasterize(font: &Font, text: &str, em_px: f32, placement: &LinePlacement) -> Vec<Glyph> {
        let (origin_x, baseline) = placement.origin;
        let mut pen = origin_x;
        let mut glyphs = Vec::new();
        for c in text.chars() {
            if c.is_control() {
                continue;
            }
            let (metrics, coverage) = font.rasterize(c, em_px);
            if metrics.width > 0 && metrics.height > 0 {
                glyphs.push(Glyph {
                    x: pen + metrics.xmin as f32,
                    y: baseline - (metrics.height as f32 + metrics.ymin as f32),
                    width: metrics.width,
                    height: metrics.height,
                    coverage,
                });
            }
            pen += metrics.advance_width;
        }
        glyphs
    }

    /// Tint a coverage bitmap into a premultiplied pixmap.
    fn tint(glyph: &Glyph, colour: Colour, antialias: bool) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(glyph.width as u32, glyph.height as u32)?;
        let c = to_skia_color(colour);
        for (px, &cov) in pixmap.data_mut().chunks_exact_mut(4).zip(&glyph.coverage) {
            let cov = if antialias {
                cov as f32 / 255.0
            } else if cov >= 128 {
                1.0
            } else {
                0.0
            };
            let a = c.alpha() * cov;
            px[0] = (c.red() * a * 255.0).round() as u8;
            px[1] = (c.green() * a * 255.0).round() as u8;
            px[2] = (c.blue() * a * 255.0).round() as u8;
            px[3] = (a * 255.0).round() as u8;
        }
        Some(pixmap)
    }

    fn composite(&mut self, glyphs: &[Glyph], colour: Colour, transform: Transform) -> Result<()> {
        let antialias = self.config.antialias;
        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: self.blend(),
            quality: FilterQuality::Bilinear,
        };
        let clip = self.clip;
        let mut pm = self.pixmap()?;
        for glyph in glyphs {
            if let Some(tinted) = Self::tint(glyph, colour, antialias) {
                log::trace!("Glyph {}x{} at {},{}", glyph.width, glyph.height, glyph.x, glyph.y);
                pm.draw_pixmap(
                    0,
                    0,
                    tinted.as_ref(),
                    &paint,
                    transform.pre_translate(glyph.x, glyph.y),
                    clip,
                );
            }
        }
        Ok(())
    }

    /// Stamp the outline around the glyphs, then fill them.
    fn draw_glyphs(&mut self, glyphs: &[Glyph], transform: Transform) -> Result<()> {
        let outline = self.state.outline_width;
        if outline > 0.0 && self.state.outline_colour.a > 0.0 {
            let samples = self.config.outline_samples.max(1);
            let colour = self.state.outline_colour;
            for k in 0..samples {
                let angle = 2.0 * PI * k as f32 / samples as f32;
                let shifted = transform.post_translate(outline * angle.cos(), outline * angle.sin());
                self.composite(glyphs, colour, shifted)?;
            }
        }
        let colour = self.state.colour;
        self.composite(glyphs, colour, transform)
    }
}

impl Canvas for Draw<'_> {
    fn scale(&mut self, w: f32, h: f32) {
        self.state.ctm = self.state.ctm.pre_scale(w, h);
    }

    fn set_colour_compose(&mut self, mode: ColourCompose) {
        log::trace!("Compose mode: {}", mode);
        self.state.compose = mode;
    }

    fn set_colour(&mut self, colour: Colour) {
        self.state.colour = colour;
    }

    fn set_outline_colour(&mut self, colour: Colour) {
        self.state.outline_colour = colour;
    }

    fn set_outline_width(&mut self, width: f32) {
        self.state.outline_width = width;
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn paint(&mut self) -> Result<()> {
        let rect = Rect::from_xywh(
            0.0,
            0.0,
            self.surface.width() as f32,
            self.surface.height() as f32,
        )
        .ok_or_else(|| DrawError::backend("degenerate surface rectangle"))?;
        let paint = make_paint(self.state.colour, self.blend(), false);
        let clip = self.clip;
        self.pixmap()?
            .fill_rect(rect, &paint, Transform::identity(), clip);
        Ok(())
    }

    fn draw_path(&mut self, cmds: &[PathCmd], mode: DrawMode) -> Result<()> {
        let Some(path) = build_path_from_cmds(cmds) else {
            return Ok(());
        };
        let paint = make_paint(self.state.colour, self.blend(), self.config.antialias);
        let ctm = self.state.ctm;
        let clip = self.clip;
        let mut stroke = Stroke::default();
        stroke.width = self.state.line_width;
        stroke.line_cap = map_cap(self.state.line_cap);

        let mut pm = self.pixmap()?;
        if mode.fills() {
            pm.fill_path(&path, &paint, FillRule::Winding, ctm, clip);
        }
        if mode.strokes() {
            pm.stroke_path(&path, &paint, &stroke, ctm, clip);
        }
        Ok(())
    }

    fn draw_text_internal(
        &mut self,
        params: &TextParams<'_>,
        distortion: Option<&Distortion>,
    ) -> Result<f32> {
        let font = self
            .state
            .font
            .clone()
            .ok_or_else(|| DrawError::backend("no font selected"))?;
        let distortion = distortion.copied().unwrap_or_default();
        let width_px = self.surface.width() as f32;
        let height_px = self.surface.height() as f32;

        let scale = line_scale(params, &distortion, height_px, self.config.text_shrink);
        if scale.em_px <= 0.0 {
            log::debug!("Skipping text with non-positive size: {}", params);
            return Ok(0.0);
        }

        let metrics = Self::measure(&font, params.text, scale.em_px);
        let placement = place_line(params, &distortion, &scale, &metrics, width_px, height_px);
        let glyphs = Self::rasterize(&font, params.text, scale.em_px, &placement);
        log::debug!(
            "Text line: {} -> em={}px, extent={}, glyphs={}",
            params,
            scale.em_px,
            placement.extent,
            glyphs.len()
        );

        self.draw_glyphs(&glyphs, placement.transform)?;
        Ok(placement.extent)
    }
}
