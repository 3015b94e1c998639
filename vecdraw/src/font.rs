use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};

use crate::error::{DrawError, Result};

pub fn font_from_bytes(data: &[u8]) -> Result<Arc<Font>> {
    Font::from_bytes(data, FontSettings::default())
        .map(Arc::new)
        .map_err(|e| DrawError::invalid(format!("cannot parse font: {e}")))
}

pub fn load_font(path: impl AsRef<Path>) -> Result<Arc<Font>> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| DrawError::invalid(format!("cannot read font {}: {e}", path.display())))?;
    log::debug!("Loaded font file {} ({} bytes)", path.display(), data.len());
    font_from_bytes(&data)
}
