//! Colour space and channel order conversion, BT.601 limited range.

use crate::error::{ResizeError, alloc_zeroed};
use crate::format::{ChannelLayout, DataType, PixelFormat};
use crate::frame::FrameBuffer;
use crate::plane::{Plane, Planes};

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Converts one BT.601 studio-swing sample to `[r, g, b]`.
#[inline]
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;
    [
        clamp_u8((298 * c + 409 * e + 128) >> 8),
        clamp_u8((298 * c - 100 * d - 208 * e + 128) >> 8),
        clamp_u8((298 * c + 516 * d + 128) >> 8),
    ]
}

#[inline]
pub(crate) fn rgb_to_y(r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    clamp_u8(((66 * r + 129 * g + 25 * b + 128) >> 8) + 16)
}

#[inline]
pub(crate) fn rgb_to_uv(r: u8, g: u8, b: u8) -> (u8, u8) {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    (
        clamp_u8(((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128),
        clamp_u8(((112 * r - 94 * g - 18 * b + 128) >> 8) + 128),
    )
}

/// Reads `[r, g, b, a]` from a packed pixel, alpha defaulting to opaque.
#[inline]
fn read_rgba(px: &[u8], layout: ChannelLayout) -> [u8; 4] {
    [
        px[layout.r],
        px[layout.g],
        px[layout.b],
        layout.a.map_or(255, |a| px[a]),
    ]
}

/// Assembles `planes` into a tightly strided frame of `format` / `data_type`.
pub(crate) fn into_frame(
    planes: Planes,
    format: PixelFormat,
    data_type: DataType,
) -> Result<FrameBuffer, ResizeError> {
    let (w, h) = planes.dims();
    let (width, height) = (
        u32::try_from(w).map_err(|_| ResizeError::invalid("output width overflows"))?,
        u32::try_from(h).map_err(|_| ResizeError::invalid("output height overflows"))?,
    );

    let Some(dst_layout) = format.layout() else {
        let (y, u, v) = to_yuv_planes(planes)?;
        return write_yuv(width, height, format, &y, &u, &v);
    };

    let packed = to_packed(planes, format, dst_layout)?;
    match data_type {
        DataType::Uint8 => FrameBuffer::packed(width, height, format, packed.data),
        DataType::Float32 => {
            let mut data = alloc_zeroed(packed.data.len() * DataType::Float32.size())?;
            for (out, &v) in data.chunks_exact_mut(4).zip(&packed.data) {
                out.copy_from_slice(&(v as f32 / 255.0).to_ne_bytes());
            }
            let stride = packed.row_bytes() * DataType::Float32.size();
            FrameBuffer::with_data_type(width, height, format, data_type, stride, data)
        }
    }
}

fn to_packed(
    planes: Planes,
    format: PixelFormat,
    dst: ChannelLayout,
) -> Result<Plane, ResizeError> {
    let ch = format.channels();
    match planes {
        Planes::Packed { format: src_format, plane } if src_format == format => Ok(plane),
        Planes::Packed { format: src_format, plane } => {
            // layout() is Some for every packed format
            let src = src_format
                .layout()
                .ok_or_else(|| ResizeError::invalid(format!("{src_format} is not packed")))?;
            let mut out = Plane::new(plane.width, plane.height, ch)?;
            for (px, dst_px) in plane
                .data
                .chunks_exact(plane.channels)
                .zip(out.data.chunks_exact_mut(ch))
            {
                write_packed(dst_px, dst, read_rgba(px, src));
            }
            Ok(out)
        }
        Planes::Yuv { y, u, v } => {
            let mut out = Plane::new(y.width, y.height, ch)?;
            for row in 0..y.height {
                let (luma, u_row, v_row) = (y.row(row), u.row(row / 2), v.row(row / 2));
                let out_row = out.row_mut(row);
                for (x, dst_px) in out_row.chunks_exact_mut(ch).enumerate() {
                    let [r, g, b] = yuv_to_rgb(luma[x], u_row[x / 2], v_row[x / 2]);
                    write_packed(dst_px, dst, [r, g, b, 255]);
                }
            }
            Ok(out)
        }
    }
}

#[inline]
fn write_packed(px: &mut [u8], layout: ChannelLayout, [r, g, b, a]: [u8; 4]) {
    px[layout.r] = r;
    px[layout.g] = g;
    px[layout.b] = b;
    if let Some(i) = layout.a {
        px[i] = a;
    }
}

fn to_yuv_planes(planes: Planes) -> Result<(Plane, Plane, Plane), ResizeError> {
    let (format, src) = match planes {
        Planes::Yuv { y, u, v } => return Ok((y, u, v)),
        Planes::Packed { format, plane } => (format, plane),
    };
    let layout = format
        .layout()
        .ok_or_else(|| ResizeError::invalid(format!("{format} is not packed")))?;
    let (w, h) = (src.width, src.height);
    let mut y = Plane::new(w, h, 1)?;
    let mut u = Plane::new(w.div_ceil(2), h.div_ceil(2), 1)?;
    let mut v = Plane::new(w.div_ceil(2), h.div_ceil(2), 1)?;

    for (px, out) in src.data.chunks_exact(src.channels).zip(y.data.iter_mut()) {
        let [r, g, b, _] = read_rgba(px, layout);
        *out = rgb_to_y(r, g, b);
    }

    for cy in 0..u.height {
        for cx in 0..u.width {
            let mut sum = [0u32; 3];
            let mut n = 0u32;
            for sy in (cy * 2)..(cy * 2 + 2).min(h) {
                for sx in (cx * 2)..(cx * 2 + 2).min(w) {
                    let [r, g, b, _] = read_rgba(src.pixel(sx, sy), layout);
                    sum[0] += r as u32;
                    sum[1] += g as u32;
                    sum[2] += b as u32;
                    n += 1;
                }
            }
            let avg = |s: u32| ((s + n / 2) / n) as u8;
            let (cu, cv) = rgb_to_uv(avg(sum[0]), avg(sum[1]), avg(sum[2]));
            let idx = cy * u.width + cx;
            u.data[idx] = cu;
            v.data[idx] = cv;
        }
    }
    Ok((y, u, v))
}

fn write_yuv(
    width: u32,
    height: u32,
    format: PixelFormat,
    y: &Plane,
    u: &Plane,
    v: &Plane,
) -> Result<FrameBuffer, ResizeError> {
    let stride = format
        .min_row_bytes(width, DataType::Uint8)
        .ok_or_else(|| ResizeError::invalid("row size overflows"))?;
    let len = format
        .required_len(stride, height)
        .ok_or_else(|| ResizeError::invalid("frame size overflows"))?;
    let mut data = alloc_zeroed(len)?;

    for row in 0..y.height {
        data[row * stride..row * stride + y.width].copy_from_slice(y.row(row));
    }

    let base = stride * y.height;
    match format {
        PixelFormat::Nv12 => {
            for row in 0..u.height {
                let start = base + row * stride;
                let dst = &mut data[start..start + u.width * 2];
                for (i, pair) in dst.chunks_exact_mut(2).enumerate() {
                    pair[0] = u.row(row)[i];
                    pair[1] = v.row(row)[i];
                }
            }
        }
        _ => {
            let c_stride = stride.div_ceil(2);
            let v_base = base + c_stride * u.height;
            for row in 0..u.height {
                let (us, vs) = (base + row * c_stride, v_base + row * c_stride);
                data[us..us + u.width].copy_from_slice(u.row(row));
                data[vs..vs + v.width].copy_from_slice(v.row(row));
            }
        }
    }
    FrameBuffer::new(width, height, format, stride, data)
}
