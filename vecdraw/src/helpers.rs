// --- Helpers ---
use std::ffi::CStr;
use std::os::raw::c_char;
use tiny_skia::{BlendMode, Color, Paint};

use crate::types::{Colour, ColourCompose, DrawMode, LineCap, TextMode};

pub fn map_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::None => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    }
}

pub fn map_compose(mode: ColourCompose) -> BlendMode {
    match mode {
        ColourCompose::Default => BlendMode::SourceOver,
        ColourCompose::Add => BlendMode::Plus,
        ColourCompose::Subtract => BlendMode::DestinationOut,
        ColourCompose::Overwrite => BlendMode::Source,
    }
}

/// Clamp a [`Colour`] into the rasterizer's colour type.
pub fn to_skia_color(c: Colour) -> Color {
    let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    Color::from_rgba(clamp(c.r), clamp(c.g), clamp(c.b), clamp(c.a)).unwrap_or(Color::TRANSPARENT)
}

/// Create a tiny-skia Paint with the given colour and blend mode.
#[inline]
pub fn make_paint(colour: Colour, blend: BlendMode, aa: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(colour));
    paint.blend_mode = blend;
    paint.anti_alias = aa;
    paint
}

// Integer codes used across the C ABI.

pub fn text_mode_from_u8(mode: u8) -> TextMode {
    match mode {
        1 => TextMode::Center,
        2 => TextMode::Right,
        _ => TextMode::Left,
    }
}

pub fn cap_from_u8(cap: u8) -> LineCap {
    match cap {
        1 => LineCap::Round,
        2 => LineCap::Square,
        _ => LineCap::None,
    }
}

pub fn compose_from_u8(mode: u8) -> ColourCompose {
    match mode {
        1 => ColourCompose::Add,
        2 => ColourCompose::Subtract,
        3 => ColourCompose::Overwrite,
        _ => ColourCompose::Default,
    }
}

/// Values match the bit layout: 1 = stroke, 2 = fill.
pub fn draw_mode_from_u8(mode: u8) -> DrawMode {
    match mode & 0b11 {
        1 => DrawMode::Stroke,
        2 => DrawMode::Fill,
        3 => DrawMode::StrokeAndFill,
        _ => DrawMode::None,
    }
}

pub unsafe fn parse_c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}
