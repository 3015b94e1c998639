//! The drawing contract a rendering backend implements.

use crate::error::Result;
use crate::layout;
use crate::path::PathCmd;
use crate::types::{Colour, ColourCompose, Distortion, DrawMode, LineCap, TextMode, TextParams};

/// Path, paint-state and single-line text primitives of one backend.
///
/// Multi-line text is provided on top of [`draw_text_internal`](Self::draw_text_internal)
/// by [`draw_text`](Self::draw_text); backends only ever see one line at a time.
pub trait Canvas {
    /// Post-multiply the user transform by a scale.
    fn scale(&mut self, w: f32, h: f32);
    fn set_colour_compose(&mut self, mode: ColourCompose);
    fn set_colour(&mut self, colour: Colour);
    fn set_outline_colour(&mut self, colour: Colour);
    /// Text outline width in pixels. Zero disables outlines.
    fn set_outline_width(&mut self, width: f32);
    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);

    /// Fill the whole target with the current colour.
    fn paint(&mut self) -> Result<()>;

    /// Rasterize a command list in the current user space.
    fn draw_path(&mut self, cmds: &[PathCmd], mode: DrawMode) -> Result<()>;

    /// Draw one line of text and return its horizontal extent in normalized units.
    ///
    /// `params.text` never contains a line separator when called through
    /// [`draw_text`](Self::draw_text).
    fn draw_text_internal(&mut self, params: &TextParams<'_>, distortion: Option<&Distortion>)
        -> Result<f32>;

    /// Draw a possibly multi-line UTF-8 text.
    ///
    /// Lines are spread symmetrically around `y`. The result is the sum of
    /// the per-line extents.
    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        x: f32,
        y: f32,
        mode: TextMode,
        text: &str,
        size: f32,
        aspect: f32,
        rotation: f32,
        shear_x: f32,
        shear_y: f32,
    ) -> Result<f32> {
        let params = TextParams {
            text,
            x,
            y,
            mode,
            size,
            offset: 0.0,
            aspect,
            rotation,
            shear_x,
            shear_y,
        };
        layout::draw_text(self, &params)
    }

    fn set_colour_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.set_colour(Colour::new(r, g, b, a));
    }

    /// Start a path scoped to this canvas.
    fn new_path(&mut self) -> Path<'_, Self>
    where
        Self: Sized,
    {
        Path::new(self)
    }
}

/// Path under construction, borrowing its canvas for one draw sequence.
pub struct Path<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    cmds: Vec<PathCmd>,
}

impl<'a, C: Canvas + ?Sized> Path<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        Path {
            canvas,
            cmds: Vec::new(),
        }
    }

    pub fn push(&mut self, cmd: PathCmd) -> &mut Self {
        self.cmds.push(cmd);
        self
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.cmds.push(PathCmd::MoveTo(x, y));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.cmds.push(PathCmd::LineTo(x, y));
        self
    }

    /// Circular arc around (xc, yc), from angle `a1` to `a2` (radians).
    pub fn arc(&mut self, xc: f32, yc: f32, r: f32, a1: f32, a2: f32) -> &mut Self {
        self.cmds.push(PathCmd::Arc { xc, yc, r, a1, a2 });
        self
    }

    pub fn bezier(&mut self, x: f32, y: f32, dx: f32, dy: f32) -> &mut Self {
        self.cmds.push(PathCmd::Bezier { x, y, dx, dy });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.cmds.clear();
        self
    }

    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    /// Render the path. The commands are kept for further draws.
    pub fn draw(&mut self, mode: DrawMode) -> Result<()> {
        if mode == DrawMode::None || self.cmds.is_empty() {
            return Ok(());
        }
        self.canvas.draw_path(&self.cmds, mode)
    }
}
