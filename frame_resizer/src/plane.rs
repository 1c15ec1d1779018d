//! Frames decomposed into tightly packed sample planes.

use crate::error::{ResizeError, alloc_zeroed};
use crate::format::PixelFormat;
use crate::frame::FrameRef;
use crate::options::Rect;

/// One 2-D array of interleaved `u8` samples with no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Plane {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl Plane {
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, ResizeError> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(ResizeError::Allocation(usize::MAX))?;
        Ok(Self {
            width,
            height,
            channels,
            data: alloc_zeroed(len)?,
        })
    }

    pub fn row_bytes(&self) -> usize {
        self.width * self.channels
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let rb = self.row_bytes();
        &self.data[y * rb..(y + 1) * rb]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let rb = self.row_bytes();
        &mut self.data[y * rb..(y + 1) * rb]
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let idx = (y * self.width + x) * self.channels;
        &self.data[idx..idx + self.channels]
    }

    pub fn try_clone(&self) -> Result<Self, ResizeError> {
        let mut data = alloc_zeroed(self.data.len())?;
        data.copy_from_slice(&self.data);
        Ok(Self { data, ..*self })
    }
}

/// A frame in its native colour space, split into planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Planes {
    /// Interleaved RGB-family samples in `format` channel order.
    Packed { format: PixelFormat, plane: Plane },
    /// Full resolution luma and half resolution chroma.
    Yuv { y: Plane, u: Plane, v: Plane },
}

impl Planes {
    /// Copies the `rect` region of `frame` out into planes.
    ///
    /// `rect` must lie inside the frame and, for 4:2:0 frames, start on an
    /// even coordinate.
    pub fn extract(frame: &FrameRef<'_>, rect: Rect) -> Result<Self, ResizeError> {
        let stride = frame.stride();
        let data = frame.data();
        let (x, y) = (rect.x as usize, rect.y as usize);
        let (w, h) = (rect.width as usize, rect.height as usize);

        match frame.format() {
            PixelFormat::Nv12 => {
                let luma = copy_region(data, 0, stride, x, y, w, h, 1)?;
                let (cx, cy, cw, ch) = chroma_region(x, y, w, h);
                let base = stride * frame.height() as usize;
                let mut u = Plane::new(cw, ch, 1)?;
                let mut v = Plane::new(cw, ch, 1)?;
                for row in 0..ch {
                    let start = base + (cy + row) * stride + cx * 2;
                    let src = &data[start..start + cw * 2];
                    let (u_row, v_row) = (u.row_mut(row), v.row_mut(row));
                    for (i, pair) in src.chunks_exact(2).enumerate() {
                        u_row[i] = pair[0];
                        v_row[i] = pair[1];
                    }
                }
                Ok(Planes::Yuv { y: luma, u, v })
            }
            PixelFormat::Yuv420 => {
                let luma = copy_region(data, 0, stride, x, y, w, h, 1)?;
                let (cx, cy, cw, ch) = chroma_region(x, y, w, h);
                let c_stride = stride.div_ceil(2);
                let u_base = stride * frame.height() as usize;
                let v_base = u_base + c_stride * (frame.height() as usize).div_ceil(2);
                let u = copy_region(data, u_base, c_stride, cx, cy, cw, ch, 1)?;
                let v = copy_region(data, v_base, c_stride, cx, cy, cw, ch, 1)?;
                Ok(Planes::Yuv { y: luma, u, v })
            }
            format => {
                let plane = copy_region(data, 0, stride, x, y, w, h, format.channels())?;
                Ok(Planes::Packed { format, plane })
            }
        }
    }

    /// Applies `f` to every plane, keeping the variant.
    pub fn try_map<F>(self, mut f: F) -> Result<Self, ResizeError>
    where
        F: FnMut(Plane, bool) -> Result<Plane, ResizeError>,
    {
        Ok(match self {
            Planes::Packed { format, plane } => Planes::Packed {
                format,
                plane: f(plane, false)?,
            },
            Planes::Yuv { y, u, v } => Planes::Yuv {
                y: f(y, false)?,
                u: f(u, true)?,
                v: f(v, true)?,
            },
        })
    }

    /// Luma (or packed) plane dimensions.
    pub fn dims(&self) -> (usize, usize) {
        match self {
            Planes::Packed { plane, .. } => (plane.width, plane.height),
            Planes::Yuv { y, .. } => (y.width, y.height),
        }
    }
}

/// Chroma plane region covering the luma region at `(x, y)` of `w` x `h`.
fn chroma_region(x: usize, y: usize, w: usize, h: usize) -> (usize, usize, usize, usize) {
    (x / 2, y / 2, w.div_ceil(2), h.div_ceil(2))
}

#[allow(clippy::too_many_arguments)]
fn copy_region(
    data: &[u8],
    base: usize,
    stride: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    channels: usize,
) -> Result<Plane, ResizeError> {
    let mut plane = Plane::new(w, h, channels)?;
    let row_bytes = plane.row_bytes();
    for row in 0..h {
        let start = base + (y + row) * stride + x * channels;
        plane
            .row_mut(row)
            .copy_from_slice(&data[start..start + row_bytes]);
    }
    Ok(plane)
}
