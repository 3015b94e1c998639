//! Backend-agnostic 2D vector drawing onto an in-memory pixel surface.
//!
//! A [`Target`] owns a [`Surface`] (the pixel buffer) and the paint state of
//! its canvas. [`Target::draw`] hands out a [`Draw`] handle implementing the
//! [`Canvas`] trait: paths, fills, strokes and text placed in normalized
//! device coordinates. Multi-line text is split and spread vertically by
//! [`layout`] before each line reaches the backend.
//!
//! The pixel buffer is premultiplied RGBA8, readable through
//! [`Target::pixel_data`] for upload elsewhere (e.g. into a GPU texture).

pub mod canvas;
pub mod config;
pub mod error;
pub mod ffi;
pub mod font;
mod helpers;
pub mod layout;
pub mod path;
pub mod placement;
pub mod skia;
pub mod surface;
pub mod target;
pub mod types;

pub use canvas::{Canvas, Path};
pub use config::RenderConfig;
pub use error::{DrawError, Result};
pub use font::{font_from_bytes, load_font};
pub use path::PathCmd;
pub use skia::Draw;
pub use surface::{Surface, BYTES_PER_PIXEL};
pub use target::Target;
pub use types::{Colour, ColourCompose, Distortion, DrawMode, LineCap, TextMode, TextParams};
