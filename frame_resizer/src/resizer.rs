use crate::convert;
use crate::error::ResizeError;
use crate::format::{DataType, PixelFormat};
use crate::frame::{FrameBuffer, FrameRef};
use crate::geometry;
use crate::options::{Crop, CropMode, Rect, ResizeOptions};
use crate::plane::Planes;
use crate::resample;

/// Anything that fulfils the resize contract.
///
/// Hosts pick an implementation at startup, either the built-in
/// [`FrameResizer`] or a dynamically loaded [`crate::plugin_loader::Plugin`],
/// and hand it around as `&dyn Resize`.
pub trait Resize {
    /// Produces a new frame as described by `request`, never touching the source.
    fn resize(&self, request: &ResizeRequest<'_>) -> Result<FrameBuffer, ResizeError>;
}

/// One resize call: a borrowed source frame and what to turn it into.
#[derive(Debug, Clone, Copy)]
pub struct ResizeRequest<'a> {
    source: FrameRef<'a>,
    options: ResizeOptions,
}

impl<'a> ResizeRequest<'a> {
    /// Builds a request from fully specified options.
    pub fn new(source: FrameRef<'a>, options: ResizeOptions) -> Self {
        Self { source, options }
    }

    /// Builds a plain scale-and-convert request.
    pub fn scale(
        source: FrameRef<'a>,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Self {
        Self::new(source, ResizeOptions::new(width, height, format))
    }

    /// The source frame.
    pub fn source(&self) -> &FrameRef<'a> {
        &self.source
    }

    /// The requested output.
    pub fn options(&self) -> &ResizeOptions {
        &self.options
    }

    /// Checks the request and resolves the source region to read.
    pub fn validate(&self) -> Result<Rect, ResizeError> {
        let opts = &self.options;
        let src = &self.source;

        if opts.width == 0 || opts.height == 0 {
            return Err(ResizeError::invalid(format!(
                "target dimensions must be non-zero, got {}x{}",
                opts.width, opts.height
            )));
        }
        if src.data_type() != DataType::Uint8 {
            return Err(ResizeError::invalid(format!(
                "{:?} source frames are not supported",
                src.data_type()
            )));
        }
        if opts.pixel_format.is_yuv() && opts.data_type != DataType::Uint8 {
            return Err(ResizeError::invalid(format!(
                "{} output only supports uint8 samples",
                opts.pixel_format
            )));
        }

        let mut rect = match opts.crop {
            Crop::Mode(CropMode::Full) => Rect {
                x: 0,
                y: 0,
                width: src.width(),
                height: src.height(),
            },
            Crop::Mode(CropMode::Center) => {
                let (tw, th) = opts.scaled_dims();
                center_crop(src.width(), src.height(), tw, th)
            }
            Crop::Rect(rect) => {
                let inside = rect.width > 0
                    && rect.height > 0
                    && rect.x.checked_add(rect.width).is_some_and(|r| r <= src.width())
                    && rect.y.checked_add(rect.height).is_some_and(|b| b <= src.height());
                if !inside {
                    return Err(ResizeError::invalid(format!(
                        "crop {rect:?} is outside the {}x{} source",
                        src.width(),
                        src.height()
                    )));
                }
                rect
            }
        };

        if src.format().is_yuv() {
            rect.x &= !1;
            rect.y &= !1;
        }
        Ok(rect)
    }
}

/// Largest centred region of a `sw` x `sh` source with the `tw:th` aspect ratio.
fn center_crop(sw: u32, sh: u32, tw: u32, th: u32) -> Rect {
    let (sw64, sh64, tw64, th64) = (sw as u64, sh as u64, tw as u64, th as u64);
    if sw64 * th64 > sh64 * tw64 {
        let width = ((sh64 * tw64 + th64 / 2) / th64).clamp(1, sw64) as u32;
        Rect {
            x: (sw - width) / 2,
            y: 0,
            width,
            height: sh,
        }
    } else {
        let height = ((sw64 * th64 + tw64 / 2) / tw64).clamp(1, sh64) as u32;
        Rect {
            x: 0,
            y: (sh - height) / 2,
            width: sw,
            height,
        }
    }
}

/// The built-in resampling and conversion engine.
///
/// Holds no state, so one value can serve any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameResizer;

impl FrameResizer {
    /// Creates a resizer.
    pub fn new() -> Self {
        Self
    }
}

impl Resize for FrameResizer {
    fn resize(&self, request: &ResizeRequest<'_>) -> Result<FrameBuffer, ResizeError> {
        let rect = request.validate()?;
        let src = request.source();
        let opts = request.options();

        tracing::debug!(
            src_w = src.width(),
            src_h = src.height(),
            src_format = %src.format(),
            dst_w = opts.width,
            dst_h = opts.height,
            dst_format = %opts.pixel_format,
            data_type = ?opts.data_type,
            "resizing frame"
        );

        let planes = Planes::extract(src, rect)?;
        tracing::trace!(?rect, "extracted source planes");

        let (sw, sh) = opts.scaled_dims();
        let (sw, sh) = (sw as usize, sh as usize);
        let planes = planes.try_map(|plane, chroma| {
            let (w, h) = if chroma {
                (sw.div_ceil(2), sh.div_ceil(2))
            } else {
                (sw, sh)
            };
            resample::resample(&plane, w, h, opts.algorithm)
        })?;

        let planes = planes.try_map(|plane, _| {
            let mut plane = geometry::rotate(plane, opts.rotation)?;
            if opts.mirror {
                geometry::mirror_left_right_in_place(&mut plane);
            }
            Ok(plane)
        })?;

        convert::into_frame(planes, opts.pixel_format, opts.data_type)
    }
}
