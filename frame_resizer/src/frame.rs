use crate::error::ResizeError;
use crate::format::{DataType, PixelFormat};

/// An owned frame: dimensions, layout and a contiguous byte region.
///
/// The region is always at least as long as `format` requires for
/// `stride` and `height`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data_type: DataType,
    stride: usize,
    data: Vec<u8>,
}

/// A borrowed frame with the same invariants as [`FrameBuffer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRef<'a> {
    width: u32,
    height: u32,
    format: PixelFormat,
    data_type: DataType,
    stride: usize,
    data: &'a [u8],
}

fn validate(
    width: u32,
    height: u32,
    format: PixelFormat,
    data_type: DataType,
    stride: usize,
    len: usize,
) -> Result<(), ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::invalid(format!(
            "frame dimensions must be non-zero, got {width}x{height}"
        )));
    }
    if format.is_yuv() && data_type != DataType::Uint8 {
        return Err(ResizeError::invalid(format!(
            "{format} frames only support uint8 samples"
        )));
    }
    let min_stride = format
        .min_row_bytes(width, data_type)
        .ok_or_else(|| ResizeError::invalid("row size overflows"))?;
    if stride < min_stride {
        return Err(ResizeError::invalid(format!(
            "stride {stride} is smaller than the {min_stride} bytes a {width} px {format} row needs"
        )));
    }
    let required = format
        .required_len(stride, height)
        .ok_or_else(|| ResizeError::invalid("frame size overflows"))?;
    if len < required {
        return Err(ResizeError::invalid(format!(
            "buffer holds {len} bytes, {required} required"
        )));
    }
    Ok(())
}

impl FrameBuffer {
    /// Wraps `data` as a uint8 frame after checking the layout invariants.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, ResizeError> {
        Self::with_data_type(width, height, format, DataType::Uint8, stride, data)
    }

    /// Wraps `data` with an explicit sample type.
    pub fn with_data_type(
        width: u32,
        height: u32,
        format: PixelFormat,
        data_type: DataType,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, ResizeError> {
        validate(width, height, format, data_type, stride, data.len())?;
        Ok(Self {
            width,
            height,
            format,
            data_type,
            stride,
            data,
        })
    }

    /// Wraps tightly packed uint8 data, deriving the stride from the width.
    pub fn packed(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, ResizeError> {
        let stride = format
            .min_row_bytes(width, DataType::Uint8)
            .ok_or_else(|| ResizeError::invalid("row size overflows"))?;
        Self::new(width, height, format, stride, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Channel sample type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Row stride of the first plane, in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The raw byte region.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Gives up the byte region.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Borrows this frame.
    pub fn as_frame_ref(&self) -> FrameRef<'_> {
        FrameRef {
            width: self.width,
            height: self.height,
            format: self.format,
            data_type: self.data_type,
            stride: self.stride,
            data: &self.data,
        }
    }
}

impl<'a> FrameRef<'a> {
    /// Borrows `data` as a uint8 frame after checking the layout invariants.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        data: &'a [u8],
    ) -> Result<Self, ResizeError> {
        Self::with_data_type(width, height, format, DataType::Uint8, stride, data)
    }

    /// Borrows `data` with an explicit sample type.
    pub fn with_data_type(
        width: u32,
        height: u32,
        format: PixelFormat,
        data_type: DataType,
        stride: usize,
        data: &'a [u8],
    ) -> Result<Self, ResizeError> {
        validate(width, height, format, data_type, stride, data.len())?;
        Ok(Self {
            width,
            height,
            format,
            data_type,
            stride,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Channel sample type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Row stride of the first plane, in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The borrowed byte region.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Copies the frame into an owned buffer.
    pub fn to_owned_frame(&self) -> Result<FrameBuffer, ResizeError> {
        let mut data = crate::error::alloc_zeroed(self.data.len())?;
        data.copy_from_slice(self.data);
        Ok(FrameBuffer {
            width: self.width,
            height: self.height,
            format: self.format,
            data_type: self.data_type,
            stride: self.stride,
            data,
        })
    }
}
