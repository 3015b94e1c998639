//! Multi-line text layout.
//!
//! Splits a text at line separators and hands every line to the backend's
//! single-line primitive with an `offset` that spreads the block
//! symmetrically around the anchor: for `N` lines the offsets run from
//! `(N-1)/2` down to `-(N-1)/2` in steps of exactly one.
//!
//! Only `'\n'` splits. Other control characters stay in the line content and
//! it is up to the backend what, if anything, they render as.

use std::str::Split;

use crate::canvas::Canvas;
use crate::error::{DrawError, Result};
use crate::types::TextParams;

pub const LINE_SEPARATOR: char = '\n';

/// Number of lines `text` is drawn as: separators + 1.
pub fn line_count(text: &str) -> usize {
    text.bytes().filter(|&b| b == LINE_SEPARATOR as u8).count() + 1
}

/// Offset of the first line of an `n`-line block.
pub fn first_offset(n: usize) -> f32 {
    (n as f32 - 1.0) / 2.0
}

/// Iterator over the lines of a text paired with their vertical offsets.
pub struct Lines<'a> {
    parts: Split<'a, char>,
    offset: f32,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (&'a str, f32);

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.parts.next()?;
        let offset = self.offset;
        self.offset -= 1.0;
        Some((line, offset))
    }
}

pub fn lines(text: &str) -> Lines<'_> {
    Lines {
        parts: text.split(LINE_SEPARATOR),
        offset: first_offset(line_count(text)),
    }
}

fn validate(params: &TextParams<'_>) -> Result<()> {
    let fields = [
        ("x", params.x),
        ("y", params.y),
        ("size", params.size),
        ("aspect", params.aspect),
        ("rotation", params.rotation),
        ("shear_x", params.shear_x),
        ("shear_y", params.shear_y),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(DrawError::invalid(format!("{name} must be finite, got {value}")));
        }
    }
    Ok(())
}

/// Draw `params.text` line by line on `canvas`.
///
/// `params.offset` is ignored; each line gets its own. Returns the sum of the
/// per-line results. Backend errors are returned as-is and lines already
/// drawn stay drawn.
pub fn draw_text<C: Canvas + ?Sized>(canvas: &mut C, params: &TextParams<'_>) -> Result<f32> {
    validate(params)?;
    log::debug!(
        "Drawing text: '{}', mode={:?}, size={}, aspect={}",
        params.text.escape_debug(),
        params.mode,
        params.size,
        params.aspect
    );

    if !params.text.contains(LINE_SEPARATOR) {
        log::trace!("Drawing text: one-line text.");
        return canvas.draw_text_internal(&params.line(params.text, 0.0), None);
    }

    log::debug!("Drawing text: lines={}", line_count(params.text));
    let mut result = 0.0;
    for (line, offset) in lines(params.text) {
        log::trace!("Drawing text: line '{}' at offset {}", line.escape_debug(), offset);
        result += canvas.draw_text_internal(&params.line(line, offset), None)?;
    }
    Ok(result)
}
