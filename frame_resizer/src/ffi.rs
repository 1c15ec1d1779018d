use crate::error::ResizeError;
use crate::format::{DataType, PixelFormat};
use crate::frame::{FrameBuffer, FrameRef};

/// Signature of the `resize_frame` symbol exported by resize plugins.
///
/// Reads `src`, parses `params` as TOML [`crate::options::ResizeOptions`],
/// and on success fills `out` with a frame the caller must hand back to
/// [`ReleaseFn`]. Returns a [`Status`] code.
pub type ResizeFn =
    unsafe extern "C" fn(*const RawFrame, *const std::os::raw::c_char, *mut RawFrame) -> u32;

/// Signature of the `release_frame` symbol exported by resize plugins.
pub type ReleaseFn = unsafe extern "C" fn(*mut RawFrame);

/// C description of a frame crossing the plugin boundary.
///
/// For frames produced by a plugin, `capacity` is the allocation size that
/// `release_frame` needs to free `data`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row stride of the first plane, in bytes.
    pub stride: usize,
    /// [`PixelFormat`] code, see [`format_code`].
    pub format: u32,
    /// [`DataType`] code, see [`data_type_code`].
    pub data_type: u32,
    /// Start of the byte region.
    pub data: *mut u8,
    /// Bytes in use.
    pub len: usize,
    /// Bytes allocated.
    pub capacity: usize,
}

impl RawFrame {
    /// A descriptor pointing at nothing.
    pub const fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            stride: 0,
            format: 0,
            data_type: 0,
            data: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }

    /// Describes a borrowed frame. The descriptor must not outlive `frame`
    /// and the callee must not write through it.
    pub fn borrowed(frame: &FrameRef<'_>) -> Self {
        Self {
            width: frame.width(),
            height: frame.height(),
            stride: frame.stride(),
            format: format_code(frame.format()),
            data_type: data_type_code(frame.data_type()),
            data: frame.data().as_ptr().cast_mut(),
            len: frame.data().len(),
            capacity: frame.data().len(),
        }
    }

    /// Hands ownership of `frame`'s buffer to the descriptor.
    ///
    /// The buffer is leaked until [`RawFrame::into_owned`] takes it back.
    pub fn from_owned(frame: FrameBuffer) -> Self {
        let (width, height, stride) = (frame.width(), frame.height(), frame.stride());
        let (format, data_type) = (format_code(frame.format()), data_type_code(frame.data_type()));
        let mut data = std::mem::ManuallyDrop::new(frame.into_data());
        Self {
            width,
            height,
            stride,
            format,
            data_type,
            data: data.as_mut_ptr(),
            len: data.len(),
            capacity: data.capacity(),
        }
    }

    /// Views the described memory as a validated frame.
    ///
    /// # Safety
    /// `data` must be valid for reads of `len` bytes for `'a`, and nothing
    /// may write through it meanwhile.
    pub unsafe fn as_frame_ref<'a>(&self) -> Result<FrameRef<'a>, ResizeError> {
        if self.data.is_null() {
            return Err(ResizeError::invalid("frame data pointer is null"));
        }
        let format = format_from_code(self.format)?;
        let data_type = data_type_from_code(self.data_type)?;
        // SAFETY: non-null, and the caller guarantees `len` readable bytes for 'a.
        let data = unsafe { std::slice::from_raw_parts(self.data, self.len) };
        FrameRef::with_data_type(self.width, self.height, format, data_type, self.stride, data)
    }

    /// Takes back a buffer produced by [`RawFrame::from_owned`].
    ///
    /// # Safety
    /// The descriptor must come from [`RawFrame::from_owned`] in the same
    /// allocator and must not be used again afterwards.
    pub unsafe fn into_owned(self) -> Vec<u8> {
        // SAFETY: (ptr, len, capacity) came from a leaked Vec<u8>.
        unsafe { Vec::from_raw_parts(self.data, self.len, self.capacity) }
    }
}

/// Result codes returned across the C ABI.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Success, the out frame is filled.
    Ok = 0,
    /// Malformed request.
    InvalidInput = 1,
    /// Output could not be allocated.
    Allocation = 2,
    /// Params string is not valid UTF-8 TOML options.
    InvalidParams = 3,
    /// A required pointer was null.
    NullPointer = 4,
}

impl Status {
    /// Decodes a status code, treating unknown codes as invalid input.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Status::Ok,
            2 => Status::Allocation,
            3 => Status::InvalidParams,
            4 => Status::NullPointer,
            _ => Status::InvalidInput,
        }
    }

    /// Turns a failure code into the matching error; `Ok` maps to `Ok(())`.
    pub fn into_result(self) -> Result<(), ResizeError> {
        match self {
            Status::Ok => Ok(()),
            Status::Allocation => Err(ResizeError::Allocation(0)),
            Status::InvalidInput => Err(ResizeError::invalid("plugin rejected the frame")),
            Status::InvalidParams => Err(ResizeError::invalid("plugin rejected the params")),
            Status::NullPointer => Err(ResizeError::invalid("plugin received a null pointer")),
        }
    }
}

impl From<&ResizeError> for Status {
    fn from(err: &ResizeError) -> Self {
        match err {
            ResizeError::InvalidInput(_) => Status::InvalidInput,
            ResizeError::Allocation(_) => Status::Allocation,
        }
    }
}

/// Wire code of a pixel format.
pub const fn format_code(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Rgba => 0,
        PixelFormat::Argb => 1,
        PixelFormat::Bgra => 2,
        PixelFormat::Abgr => 3,
        PixelFormat::Rgb => 4,
        PixelFormat::Bgr => 5,
        PixelFormat::Nv12 => 6,
        PixelFormat::Yuv420 => 7,
    }
}

/// Pixel format for a wire code.
pub fn format_from_code(code: u32) -> Result<PixelFormat, ResizeError> {
    PixelFormat::ALL
        .into_iter()
        .find(|f| format_code(*f) == code)
        .ok_or_else(|| ResizeError::invalid(format!("unknown pixel format code {code}")))
}

/// Wire code of a data type.
pub const fn data_type_code(data_type: DataType) -> u32 {
    match data_type {
        DataType::Uint8 => 0,
        DataType::Float32 => 1,
    }
}

/// Data type for a wire code.
pub fn data_type_from_code(code: u32) -> Result<DataType, ResizeError> {
    match code {
        0 => Ok(DataType::Uint8),
        1 => Ok(DataType::Float32),
        _ => Err(ResizeError::invalid(format!("unknown data type code {code}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_codes_are_unique() {
        for format in PixelFormat::ALL {
            assert_eq!(format_from_code(format_code(format)).unwrap(), format);
        }
        assert!(format_from_code(99).is_err());
        assert!(data_type_from_code(2).is_err());
    }

    #[test]
    fn status_mirrors_errors() {
        assert_eq!(Status::from(&ResizeError::Allocation(8)), Status::Allocation);
        assert_eq!(Status::from_code(Status::InvalidParams as u32), Status::InvalidParams);
        assert!(Status::from_code(77).into_result().is_err());
        assert!(Status::Ok.into_result().is_ok());
        assert!(Status::Allocation.into_result().unwrap_err().is_retryable());
    }

    #[test]
    fn owned_descriptor_gives_buffer_back() {
        let frame = FrameBuffer::packed(1, 2, PixelFormat::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let raw = RawFrame::from_owned(frame);
        assert_eq!((raw.width, raw.height, raw.stride), (1, 2, 3));
        // SAFETY: raw was built by from_owned just above.
        let view = unsafe { raw.as_frame_ref() }.unwrap();
        assert_eq!(view.data(), &[1, 2, 3, 4, 5, 6]);
        // SAFETY: same descriptor, used once.
        let data = unsafe { raw.into_owned() };
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn null_descriptor_is_rejected() {
        // SAFETY: a null pointer is checked before any read.
        let err = unsafe { RawFrame::empty().as_frame_ref() }.unwrap_err();
        assert!(matches!(err, ResizeError::InvalidInput(_)));
    }
}
