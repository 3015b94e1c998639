use std::f32::consts::PI;

use tiny_skia::{Path, PathBuilder};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Arc {
        xc: f32,
        yc: f32,
        r: f32,
        a1: f32,
        a2: f32,
    },
    /// Cubic ending at (x, y) with end tangent (dx, dy).
    Bezier {
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    },
    Close,
}

impl PathCmd {
    fn is_finite(&self) -> bool {
        match *self {
            PathCmd::MoveTo(x, y) | PathCmd::LineTo(x, y) => x.is_finite() && y.is_finite(),
            PathCmd::Arc { xc, yc, r, a1, a2 } => [xc, yc, r, a1, a2].iter().all(|v| v.is_finite()),
            PathCmd::Bezier { x, y, dx, dy } => [x, y, dx, dy].iter().all(|v| v.is_finite()),
            PathCmd::Close => true,
        }
    }
}

const MIN_ARC_STEPS: usize = 8;
const MAX_ARC_STEPS: usize = 256;

/// Sample points along an arc, sweeping towards increasing angles.
///
/// The sweep is `a2 - a1` wrapped into `[0, 2π)`, except that a non-zero
/// multiple of 2π draws the full circle.
pub(crate) fn arc_points(xc: f32, yc: f32, r: f32, a1: f32, a2: f32) -> Vec<(f32, f32)> {
    // f64 keeps the difference of two large finite angles finite
    let turn = f64::from(2.0 * PI);
    let diff = f64::from(a2) - f64::from(a1);
    let mut sweep = diff.rem_euclid(turn) as f32;
    if sweep == 0.0 && diff != 0.0 {
        sweep = 2.0 * PI;
    }
    let steps = ((sweep / 0.05) as usize).clamp(MIN_ARC_STEPS, MAX_ARC_STEPS);
    (0..=steps)
        .map(|i| {
            let t = a1 + sweep * i as f32 / steps as f32;
            (xc + r * t.cos(), yc + r * t.sin())
        })
        .collect()
}

/// Build a rasterizer path. Returns `None` for paths with nothing to draw,
/// including any path holding a NaN or infinite operand.
pub(crate) fn build_path_from_cmds(cmds: &[PathCmd]) -> Option<Path> {
    if let Some(bad) = cmds.iter().find(|c| !c.is_finite()) {
        log::debug!("Dropping path with non-finite command {:?}", bad);
        return None;
    }
    let mut pb = PathBuilder::new();
    let mut current: Option<(f32, f32)> = None;
    let mut start = (0.0, 0.0);
    let mut tangent: Option<(f32, f32)> = None;

    for cmd in cmds {
        match *cmd {
            PathCmd::MoveTo(x, y) => {
                pb.move_to(x, y);
                current = Some((x, y));
                start = (x, y);
                tangent = None;
            }
            PathCmd::LineTo(x, y) => {
                if current.is_some() {
                    pb.line_to(x, y);
                } else {
                    pb.move_to(x, y);
                    start = (x, y);
                }
                current = Some((x, y));
                tangent = None;
            }
            PathCmd::Arc { xc, yc, r, a1, a2 } => {
                let pts = arc_points(xc, yc, r, a1, a2);
                if let Some(&(fx, fy)) = pts.first() {
                    if current.is_some() {
                        pb.line_to(fx, fy);
                    } else {
                        pb.move_to(fx, fy);
                        start = (fx, fy);
                    }
                }
                for &(x, y) in pts.iter().skip(1) {
                    pb.line_to(x, y);
                }
                current = pts.last().copied();
                tangent = None;
            }
            PathCmd::Bezier { x, y, dx, dy } => {
                match current {
                    Some((px, py)) => {
                        let (tx, ty) = tangent.unwrap_or((0.0, 0.0));
                        pb.cubic_to(px + tx, py + ty, x - dx, y - dy, x, y);
                    }
                    None => {
                        pb.move_to(x, y);
                        start = (x, y);
                    }
                }
                current = Some((x, y));
                tangent = Some((dx, dy));
            }
            PathCmd::Close => {
                if current.is_some() {
                    pb.close();
                    current = Some(start);
                }
                tangent = None;
            }
        }
    }
    pb.finish()
}

/// Decode a path from a compact byte buffer.
///
/// Segment format (little-endian f32 operands):
///   0x00  Move    x y               (8 bytes)
///   0x01  Line    x y               (8 bytes)
///   0x02  Arc     xc yc r a1 a2     (20 bytes)
///   0x03  Bezier  x y dx dy         (16 bytes)
///   0x04  Close                     (0 bytes)
///
/// Decoding stops at the first unknown opcode or truncated segment.
pub fn decode_path(data: &[u8]) -> Vec<PathCmd> {
    fn operands<const N: usize>(data: &[u8], i: &mut usize) -> Option<[f32; N]> {
        let bytes = data.get(*i..*i + N * 4)?;
        let mut out = [0.0f32; N];
        for (v, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *v = f32::from_le_bytes(chunk.try_into().ok()?);
        }
        *i += N * 4;
        Some(out)
    }

    let mut cmds = Vec::new();
    let mut i = 0usize;
    while i < data.len() {
        let op = data[i];
        i += 1;
        let cmd = match op {
            0x00 => operands::<2>(data, &mut i).map(|[x, y]| PathCmd::MoveTo(x, y)),
            0x01 => operands::<2>(data, &mut i).map(|[x, y]| PathCmd::LineTo(x, y)),
            0x02 => operands::<5>(data, &mut i)
                .map(|[xc, yc, r, a1, a2]| PathCmd::Arc { xc, yc, r, a1, a2 }),
            0x03 => operands::<4>(data, &mut i).map(|[x, y, dx, dy]| PathCmd::Bezier { x, y, dx, dy }),
            0x04 => Some(PathCmd::Close),
            _ => None,
        };
        match cmd {
            Some(cmd) => cmds.push(cmd),
            None => break,
        }
    }
    cmds
}
