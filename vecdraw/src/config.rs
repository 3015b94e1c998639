/// Rendering knobs fixed when a [`Target`](crate::Target) is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Font em size as a fraction of the nominal line height.
    pub text_shrink: f32,
    pub antialias: bool,
    /// Row stride alignment, in pixels. 1 means no padding.
    pub row_alignment: u32,
    /// Number of stamping directions used for text outlines.
    pub outline_samples: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            text_shrink: 0.75,
            antialias: true,
            row_alignment: 1,
            outline_samples: 8,
        }
    }
}

impl RenderConfig {
    pub fn with_text_shrink(mut self, shrink: f32) -> Self {
        self.text_shrink = shrink;
        self
    }

    pub fn with_antialias(mut self, enabled: bool) -> Self {
        self.antialias = enabled;
        self
    }

    pub fn with_row_alignment(mut self, pixels: u32) -> Self {
        self.row_alignment = pixels;
        self
    }

    pub fn with_outline_samples(mut self, samples: u32) -> Self {
        self.outline_samples = samples;
        self
    }
}
