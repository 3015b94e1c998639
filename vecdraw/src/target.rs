use std::sync::Arc;

use fontdue::Font;
use tiny_skia::{FillRule, Mask, PathBuilder, Rect, Transform};

use crate::config::RenderConfig;
use crate::error::{DrawError, Result};
use crate::skia::{Draw, DrawState};
use crate::surface::Surface;
use crate::types::Colour;

/// A renderable and readable image: one [`Surface`] plus the drawing state
/// of its canvas.
///
/// ```no_run
/// use vecdraw::{Canvas, Colour, Target, TextMode};
///
/// let mut target = Target::create(640, 360)?;
/// target.set_font(vecdraw::load_font("DejaVuSans.ttf")?);
/// let mut draw = target.draw();
/// draw.set_colour(Colour::rgb(1.0, 1.0, 0.0));
/// draw.draw_text(0.0, 0.0, TextMode::Center, "Hello\nworld", 0.2, 1.0, 0.0, 0.0, 0.0)?;
/// # Ok::<(), vecdraw::DrawError>(())
/// ```
pub struct Target {
    surface: Surface,
    state: DrawState,
    config: RenderConfig,
    /// Keeps drawing out of the row padding.
    clip: Option<Mask>,
}

impl Target {
    pub fn create(width: u32, height: u32) -> Result<Self> {
        Self::create_with_config(width, height, RenderConfig::default())
    }

    pub fn create_with_config(width: u32, height: u32, config: RenderConfig) -> Result<Self> {
        if !(config.text_shrink.is_finite() && config.text_shrink > 0.0) {
            return Err(DrawError::invalid(format!(
                "text shrink must be positive, got {}",
                config.text_shrink
            )));
        }
        let surface = Surface::new(width, height, config.row_alignment)?;
        let clip = if surface.physical_width() > surface.width() {
            Some(padding_clip(&surface)?)
        } else {
            None
        };
        log::debug!(
            "Target: created {}x{} (physical width {})",
            width,
            height,
            surface.physical_width()
        );
        Ok(Target {
            surface,
            state: DrawState::default(),
            config,
            clip,
        })
    }

    /// Get a drawing handle. Paint state persists across handles.
    pub fn draw(&mut self) -> Draw<'_> {
        Draw {
            surface: &mut self.surface,
            state: &mut self.state,
            config: &self.config,
            clip: self.clip.as_ref(),
        }
    }

    pub fn set_font(&mut self, font: Arc<Font>) {
        self.state.font = Some(font);
    }

    pub fn font(&self) -> Option<&Arc<Font>> {
        self.state.font.as_ref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn physical_width(&self) -> u32 {
        self.surface.physical_width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn pixel_data(&self) -> &[u8] {
        self.surface.pixel_data()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        self.surface.pixel(x, y)
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }
}

fn padding_clip(surface: &Surface) -> Result<Mask> {
    let exhausted = || DrawError::ResourceExhausted {
        width: surface.width(),
        height: surface.height(),
    };
    let mut mask = Mask::new(surface.physical_width(), surface.height()).ok_or_else(exhausted)?;
    let rect = Rect::from_xywh(0.0, 0.0, surface.width() as f32, surface.height() as f32)
        .ok_or_else(|| DrawError::invalid("degenerate surface rectangle"))?;
    let path = PathBuilder::from_rect(rect);
    mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    Ok(mask)
}

impl Drop for Target {
    fn drop(&mut self) {
        log::debug!("Target: destroying {}x{}", self.width(), self.height());
    }
}
