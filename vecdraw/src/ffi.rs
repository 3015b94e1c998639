//! C ABI over handle registries.
//!
//! Targets and fonts live in process-wide maps keyed by positive integer
//! handles. Every export looks its handle up, so an unknown or already
//! destroyed handle is reported through the return value and never touches
//! memory. Each target sits behind its own lock; distinct targets can be
//! driven from distinct threads.

use std::collections::HashMap;
use std::os::raw::{c_char, c_int, c_uchar};
use std::slice;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use fontdue::Font;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};

use crate::canvas::{Canvas, Path};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::font::{font_from_bytes, load_font};
use crate::helpers::{cap_from_u8, compose_from_u8, draw_mode_from_u8, parse_c_str, text_mode_from_u8};
use crate::path::decode_path;
use crate::target::Target;
use crate::types::Colour;

static TARGET_MAP: Lazy<RwLock<HashMap<i32, Mutex<Target>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));
static NEXT_TARGET_ID: AtomicI32 = AtomicI32::new(1);

static FONT_MAP: Lazy<RwLock<HashMap<i32, Arc<Font>>>> = Lazy::new(|| RwLock::new(HashMap::new()));
static NEXT_FONT_ID: AtomicI32 = AtomicI32::new(1);

fn with_target<F, R>(handle: i32, f: F) -> Option<R>
where
    F: FnOnce(&mut Target) -> R,
{
    let map = TARGET_MAP.read();
    let target = map.get(&handle);
    if target.is_none() {
        log::warn!("Unknown target handle {}", handle);
    }
    target.map(|lock| f(&mut lock.lock()))
}

fn status(handle: i32, result: Option<Result<()>>) -> c_int {
    match result {
        Some(Ok(())) => 0,
        Some(Err(e)) => {
            log::warn!("Target {}: {}", handle, e);
            -1
        }
        None => -1,
    }
}

fn register_font(font: Arc<Font>) -> i32 {
    let id = NEXT_FONT_ID.fetch_add(1, Ordering::Relaxed);
    FONT_MAP.write().insert(id, font);
    id
}

// --- Target lifecycle ---

/// Returns a target handle, or -1 if the target cannot be created.
#[no_mangle]
pub extern "C" fn CreateTarget(width: c_int, height: c_int, row_alignment: c_int) -> c_int {
    if width <= 0 || height <= 0 || row_alignment <= 0 {
        log::warn!("CreateTarget: invalid geometry {}x{} / {}", width, height, row_alignment);
        return -1;
    }
    let config = RenderConfig::default().with_row_alignment(row_alignment as u32);
    match Target::create_with_config(width as u32, height as u32, config) {
        Ok(target) => {
            let id = NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed);
            TARGET_MAP.write().insert(id, Mutex::new(target));
            id
        }
        Err(e) => {
            log::warn!("CreateTarget: {}", e);
            -1
        }
    }
}

#[no_mangle]
pub extern "C" fn DestroyTarget(handle: c_int) -> c_int {
    if TARGET_MAP.write().remove(&handle).is_some() {
        0
    } else {
        -1
    }
}

#[no_mangle]
pub extern "C" fn GetWidth(handle: c_int) -> c_int {
    with_target(handle, |t| t.width() as c_int).unwrap_or(-1)
}

#[no_mangle]
pub extern "C" fn GetPhysicalWidth(handle: c_int) -> c_int {
    with_target(handle, |t| t.physical_width() as c_int).unwrap_or(-1)
}

#[no_mangle]
pub extern "C" fn GetHeight(handle: c_int) -> c_int {
    with_target(handle, |t| t.height() as c_int).unwrap_or(-1)
}

/// Premultiplied RGBA rows of `GetPhysicalWidth` pixels each.
///
/// The pointer stays valid until the target is destroyed. The caller must not
/// read through it while another thread draws on the same target.
#[no_mangle]
pub extern "C" fn GetPixelData(handle: c_int) -> *const c_uchar {
    with_target(handle, |t| t.pixel_data().as_ptr()).unwrap_or(std::ptr::null())
}

// --- Font management ---

/// # Safety
/// `data` must point to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn RegisterFont(data: *const c_uchar, len: c_int) -> c_int {
    if data.is_null() || len <= 0 {
        return -1;
    }
    let font_data = slice::from_raw_parts(data, len as usize);
    match font_from_bytes(font_data) {
        Ok(font) => register_font(font),
        Err(e) => {
            log::warn!("RegisterFont: {}", e);
            -1
        }
    }
}

/// # Safety
/// `path` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn LoadFont(path: *const c_char) -> c_int {
    let Some(p) = parse_c_str(path) else {
        return -1;
    };
    match load_font(p) {
        Ok(font) => register_font(font),
        Err(e) => {
            log::warn!("LoadFont: {}", e);
            -1
        }
    }
}

/// Targets already using the font keep it alive.
#[no_mangle]
pub extern "C" fn UnloadFont(font: c_int) -> c_int {
    if FONT_MAP.write().remove(&font).is_some() {
        0
    } else {
        -1
    }
}

#[no_mangle]
pub extern "C" fn SetFont(handle: c_int, font: c_int) -> c_int {
    let Some(font) = FONT_MAP.read().get(&font).cloned() else {
        return -1;
    };
    status(handle, with_target(handle, |t| {
        t.set_font(font);
        Ok(())
    }))
}

// --- Paint state ---

#[no_mangle]
pub extern "C" fn SetColour(handle: c_int, r: f32, g: f32, b: f32, a: f32) {
    with_target(handle, |t| t.draw().set_colour(Colour::new(r, g, b, a)));
}

#[no_mangle]
pub extern "C" fn SetOutlineColour(handle: c_int, r: f32, g: f32, b: f32, a: f32) {
    with_target(handle, |t| t.draw().set_outline_colour(Colour::new(r, g, b, a)));
}

#[no_mangle]
pub extern "C" fn SetOutlineWidth(handle: c_int, width: f32) {
    with_target(handle, |t| t.draw().set_outline_width(width));
}

#[no_mangle]
pub extern "C" fn SetLineWidth(handle: c_int, width: f32) {
    with_target(handle, |t| t.draw().set_line_width(width));
}

#[no_mangle]
pub extern "C" fn SetLineCap(handle: c_int, cap: u8) {
    with_target(handle, |t| t.draw().set_line_cap(cap_from_u8(cap)));
}

#[no_mangle]
pub extern "C" fn SetColourCompose(handle: c_int, mode: u8) {
    with_target(handle, |t| t.draw().set_colour_compose(compose_from_u8(mode)));
}

#[no_mangle]
pub extern "C" fn Scale(handle: c_int, w: f32, h: f32) {
    with_target(handle, |t| t.draw().scale(w, h));
}

// --- Drawing ---

#[no_mangle]
pub extern "C" fn Paint(handle: c_int) -> c_int {
    status(handle, with_target(handle, |t| t.draw().paint()))
}

#[no_mangle]
pub extern "C" fn Clear(handle: c_int) {
    with_target(handle, |t| t.clear());
}

/// Returns the accumulated line extent, or NaN on failure.
///
/// # Safety
/// `text` must be null or a NUL-terminated string.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn DrawText(
    handle: c_int,
    x: f32,
    y: f32,
    mode: u8,
    text: *const c_char,
    size: f32,
    aspect: f32,
    rotation: f32,
    shear_x: f32,
    shear_y: f32,
) -> f32 {
    let Some(input_text) = parse_c_str(text) else {
        log::warn!("DrawText: text is null or not UTF-8");
        return f32::NAN;
    };
    let mode = text_mode_from_u8(mode);
    let result = with_target(handle, |t| {
        t.draw()
            .draw_text(x, y, mode, input_text, size, aspect, rotation, shear_x, shear_y)
    });
    match result {
        Some(Ok(width)) => width,
        Some(Err(e)) => {
            log::warn!("DrawText on target {}: {}", handle, e);
            f32::NAN
        }
        None => f32::NAN,
    }
}

/// Draw a byte-encoded path, see [`decode_path`] for the format.
///
/// # Safety
/// `data` must point to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn DrawPath(handle: c_int, data: *const u8, len: c_int, mode: u8) -> c_int {
    if data.is_null() || len < 0 {
        return -1;
    }
    let cmds = decode_path(slice::from_raw_parts(data, len as usize));
    status(handle, with_target(handle, |t| {
        let mut draw = t.draw();
        let mut path = Path::new(&mut draw);
        for cmd in cmds {
            path.push(cmd);
        }
        path.draw(draw_mode_from_u8(mode))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn lifecycle() {
        let h = CreateTarget(10, 4, 8);
        assert!(h > 0);
        assert_eq!(GetWidth(h), 10);
        assert_eq!(GetPhysicalWidth(h), 16);
        assert_eq!(GetHeight(h), 4);
        assert!(!GetPixelData(h).is_null());
        assert_eq!(DestroyTarget(h), 0);
        assert_eq!(DestroyTarget(h), -1);
        assert_eq!(GetWidth(h), -1);
        assert!(GetPixelData(h).is_null());
    }

    #[test]
    fn invalid_geometry_yields_no_handle() {
        assert_eq!(CreateTarget(0, 4, 1), -1);
        assert_eq!(CreateTarget(4, -1, 1), -1);
        assert_eq!(CreateTarget(4, 4, 0), -1);
    }

    #[test]
    fn paint_through_handle() {
        let h = CreateTarget(2, 2, 1);
        SetColour(h, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(Paint(h), 0);
        let px = unsafe { slice::from_raw_parts(GetPixelData(h), 16) };
        assert_eq!(&px[..4], &[0, 0, 255, 255]);
        Clear(h);
        let px = unsafe { slice::from_raw_parts(GetPixelData(h), 16) };
        assert!(px.iter().all(|&b| b == 0));
        DestroyTarget(h);
    }

    #[test]
    fn null_text_is_rejected() {
        let h = CreateTarget(4, 4, 1);
        let w = unsafe { DrawText(h, 0.0, 0.0, 1, std::ptr::null(), 1.0, 1.0, 0.0, 0.0, 0.0) };
        assert!(w.is_nan());
        DestroyTarget(h);
    }

    #[test]
    fn text_without_font_fails() {
        let h = CreateTarget(4, 4, 1);
        let text = CString::new("a\nb").unwrap();
        let w = unsafe { DrawText(h, 0.0, 0.0, 1, text.as_ptr(), 1.0, 1.0, 0.0, 0.0, 0.0) };
        assert!(w.is_nan());
        DestroyTarget(h);
    }

    #[test]
    fn bad_fonts_are_not_registered() {
        let junk = [1u8, 2, 3, 4];
        assert_eq!(unsafe { RegisterFont(junk.as_ptr(), junk.len() as c_int) }, -1);
        assert_eq!(unsafe { RegisterFont(std::ptr::null(), 4) }, -1);
        let missing = CString::new("/nonexistent/font.ttf").unwrap();
        assert_eq!(unsafe { LoadFont(missing.as_ptr()) }, -1);
        assert_eq!(UnloadFont(-5), -1);
    }

    #[test]
    fn unreadable_font_paths_are_rejected() {
        assert_eq!(unsafe { LoadFont(std::ptr::null()) }, -1);
        let not_utf8 = CString::new(vec![b'/', 0xff, 0xfe, b'.', b't', b't', b'f']).unwrap();
        assert_eq!(unsafe { LoadFont(not_utf8.as_ptr()) }, -1);
    }

    #[test]
    fn encoded_arc_with_huge_angle_finishes() {
        let h = CreateTarget(16, 16, 1);
        let mut data = vec![0x02u8];
        for v in [8.0f32, 8.0, 4.0, 1.0e9, 0.0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(unsafe { DrawPath(h, data.as_ptr(), data.len() as c_int, 2) }, 0);
        DestroyTarget(h);
    }

    #[test]
    fn set_font_needs_known_font() {
        let h = CreateTarget(4, 4, 1);
        assert_eq!(SetFont(h, -5), -1);
        DestroyTarget(h);
    }

    #[test]
    fn encoded_path_is_drawn() {
        let h = CreateTarget(10, 10, 1);
        SetColour(h, 1.0, 1.0, 1.0, 1.0);
        let mut data = Vec::new();
        for (op, x, y) in [(0u8, 1.0f32, 1.0f32), (1, 9.0, 1.0), (1, 9.0, 9.0), (1, 1.0, 9.0)] {
            data.push(op);
            data.extend_from_slice(&x.to_le_bytes());
            data.extend_from_slice(&y.to_le_bytes());
        }
        data.push(0x04);
        assert_eq!(unsafe { DrawPath(h, data.as_ptr(), data.len() as c_int, 2) }, 0);
        let px = unsafe { slice::from_raw_parts(GetPixelData(h), 10 * 10 * 4) };
        let center = (5 * 10 + 5) * 4;
        assert_eq!(px[center + 3], 255);
        assert_eq!(px[3], 0);
        DestroyTarget(h);
    }

    #[test]
    fn unknown_handle_reports_failure() {
        assert_eq!(Paint(-42), -1);
        let data = [0x04u8];
        assert_eq!(unsafe { DrawPath(-42, data.as_ptr(), 1, 2) }, -1);
    }
}
