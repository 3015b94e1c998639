use std::fmt;

/// Straight-alpha colour with channels conventionally in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    pub const TRANSPARENT: Colour = Colour::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Colour = Colour::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Colour = Colour::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Colour { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Colour::new(r, g, b, 1.0)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}, {}, {}}}", self.r, self.g, self.b, self.a)
    }
}

/// Which horizontal point of a text line coincides with the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    None,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColourCompose {
    #[default]
    Default,
    Add,
    Subtract,
    Overwrite,
}

impl fmt::Display for ColourCompose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColourCompose::Default => "COLOUR_COMPOSE_DEFAULT",
            ColourCompose::Add => "COLOUR_COMPOSE_ADD",
            ColourCompose::Subtract => "COLOUR_COMPOSE_SUBTRACT",
            ColourCompose::Overwrite => "COLOUR_COMPOSE_OVERWRITE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    None,
    #[default]
    Stroke,
    Fill,
    StrokeAndFill,
}

impl DrawMode {
    pub fn fills(self) -> bool {
        matches!(self, DrawMode::Fill | DrawMode::StrokeAndFill)
    }

    pub fn strokes(self) -> bool {
        matches!(self, DrawMode::Stroke | DrawMode::StrokeAndFill)
    }
}

/// Parameters of one line of text handed to [`Canvas::draw_text_internal`].
///
/// `x` and `y` are in normalized device space (`-1.0..=1.0`, +y up). `size`
/// is relative to the full target height. `offset` is the line index relative
/// to the vertical center of its block, filled in by the layout engine.
///
/// [`Canvas::draw_text_internal`]: crate::Canvas::draw_text_internal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextParams<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    pub mode: TextMode,
    pub size: f32,
    pub offset: f32,
    pub aspect: f32,
    pub rotation: f32,
    pub shear_x: f32,
    pub shear_y: f32,
}

impl<'a> TextParams<'a> {
    pub fn new(x: f32, y: f32, mode: TextMode, text: &'a str, size: f32) -> Self {
        TextParams {
            text,
            x,
            y,
            mode,
            size,
            offset: 0.0,
            aspect: 1.0,
            rotation: 0.0,
            shear_x: 0.0,
            shear_y: 0.0,
        }
    }

    /// Same placement, different line content and offset.
    pub fn line<'b>(&self, text: &'b str, offset: f32) -> TextParams<'b> {
        TextParams {
            text,
            x: self.x,
            y: self.y,
            mode: self.mode,
            size: self.size,
            offset,
            aspect: self.aspect,
            rotation: self.rotation,
            shear_x: self.shear_x,
            shear_y: self.shear_y,
        }
    }
}

impl fmt::Display for TextParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text=\"{}\", pos={}x{}, mode={:?}, size={}, offset={}, aspect={}, rot={}, shear={}x{}",
            self.text.escape_debug(),
            self.x,
            self.y,
            self.mode,
            self.size,
            self.offset,
            self.aspect,
            self.rotation,
            self.shear_x,
            self.shear_y
        )
    }
}

/// Extra transform layered over [`TextParams`] by backends that need it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distortion {
    /// Size correction of the object
    pub obj_size: f32,
    /// Vertical correction applied after rotation
    pub scene_height: f32,
    /// Additional rotation, radians
    pub rotation: f32,
    /// Height correction of the object
    pub obj_height: f32,
    pub shear_x: f32,
    pub shear_y: f32,
}

impl Default for Distortion {
    fn default() -> Self {
        Distortion {
            obj_size: 1.0,
            scene_height: 1.0,
            rotation: 0.0,
            obj_height: 1.0,
            shear_x: 0.0,
            shear_y: 0.0,
        }
    }
}

impl fmt::Display for Distortion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size={}, scene_height={}, rot={}, height={}, shear={}x{}",
            self.obj_size, self.scene_height, self.rotation, self.obj_height, self.shear_x, self.shear_y
        )
    }
}
