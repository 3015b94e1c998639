use tiny_skia::PixmapMut;

use crate::error::{DrawError, Result};
use crate::types::Colour;

/// Premultiplied RGBA8.
pub const BYTES_PER_PIXEL: usize = 4;

/// Fixed-size pixel buffer backing a [`Target`](crate::Target).
///
/// Rows are `physical_width` pixels long. Only the first `width` pixels of a
/// row are visible content; the rest is alignment padding.
pub struct Surface {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    physical_width: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32, row_alignment: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DrawError::invalid(format!(
                "surface size must be non-zero, got {width}x{height}"
            )));
        }
        if row_alignment == 0 {
            return Err(DrawError::invalid("row alignment must be at least 1"));
        }
        let exhausted = DrawError::ResourceExhausted { width, height };

        let physical_width = width
            .checked_next_multiple_of(row_alignment)
            .ok_or_else(|| exhausted.clone())?;
        let len = (physical_width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| exhausted.clone())?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| exhausted)?;
        pixels.resize(len, 0);

        log::trace!(
            "Surface: allocated {}x{} (physical width {}, {} bytes)",
            width,
            height,
            physical_width,
            len
        );
        Ok(Surface {
            pixels,
            width,
            height,
            physical_width,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in pixels. Never smaller than [`width`](Self::width).
    pub fn physical_width(&self) -> u32 {
        self.physical_width
    }

    pub fn pixel_data(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Read back one visible pixel, un-premultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.physical_width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.pixels[i..i + BYTES_PER_PIXEL];
        let a = px[3] as f32;
        if a == 0.0 {
            return Some(Colour::TRANSPARENT);
        }
        let unmul = |c: u8| (c as f32 / a).min(1.0);
        Some(Colour::new(unmul(px[0]), unmul(px[1]), unmul(px[2]), a / 255.0))
    }

    /// Get a PixmapMut wrapping the whole physical buffer.
    pub(crate) fn pixmap_mut(&mut self) -> Option<PixmapMut<'_>> {
        PixmapMut::from_bytes(&mut self.pixels, self.physical_width, self.height)
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        log::trace!("Surface: releasing {}x{}", self.width, self.height);
    }
}
