use serde::{Deserialize, Serialize};

use crate::error::ResizeError;

/// In-memory layout of a frame's colour channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Packed `[R, G, B, A]`.
    Rgba,
    /// Packed `[A, R, G, B]`.
    Argb,
    /// Packed `[B, G, R, A]`.
    Bgra,
    /// Packed `[A, B, G, R]`.
    Abgr,
    /// Packed `[R, G, B]`.
    Rgb,
    /// Packed `[B, G, R]`.
    Bgr,
    /// Semi-planar YUV 4:2:0: a Y plane followed by one interleaved UV plane.
    Nv12,
    /// Planar YUV 4:2:0 (I420): Y, then U, then V.
    Yuv420,
}

/// Position of each colour channel inside one packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChannelLayout {
    pub r: usize,
    pub g: usize,
    pub b: usize,
    pub a: Option<usize>,
}

impl PixelFormat {
    /// Every supported format, packed ones first.
    pub const ALL: [PixelFormat; 8] = [
        PixelFormat::Rgba,
        PixelFormat::Argb,
        PixelFormat::Bgra,
        PixelFormat::Abgr,
        PixelFormat::Rgb,
        PixelFormat::Bgr,
        PixelFormat::Nv12,
        PixelFormat::Yuv420,
    ];

    /// Returns true for the interleaved RGB-family formats.
    pub const fn is_packed(self) -> bool {
        !self.is_yuv()
    }

    /// Returns true for the 4:2:0 YUV formats.
    pub const fn is_yuv(self) -> bool {
        matches!(self, Self::Nv12 | Self::Yuv420)
    }

    /// Returns true if the format carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba | Self::Argb | Self::Bgra | Self::Abgr)
    }

    /// Number of interleaved channels per pixel in the first plane.
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgba | Self::Argb | Self::Bgra | Self::Abgr => 4,
            Self::Rgb | Self::Bgr => 3,
            Self::Nv12 | Self::Yuv420 => 1,
        }
    }

    pub(crate) const fn layout(self) -> Option<ChannelLayout> {
        let layout = match self {
            Self::Rgba => ChannelLayout { r: 0, g: 1, b: 2, a: Some(3) },
            Self::Argb => ChannelLayout { r: 1, g: 2, b: 3, a: Some(0) },
            Self::Bgra => ChannelLayout { r: 2, g: 1, b: 0, a: Some(3) },
            Self::Abgr => ChannelLayout { r: 3, g: 2, b: 1, a: Some(0) },
            Self::Rgb => ChannelLayout { r: 0, g: 1, b: 2, a: None },
            Self::Bgr => ChannelLayout { r: 2, g: 1, b: 0, a: None },
            Self::Nv12 | Self::Yuv420 => return None,
        };
        Some(layout)
    }

    /// Minimum number of bytes in one row of the first plane.
    ///
    /// For NV12 this is rounded up to an even count so the interleaved
    /// chroma row, which shares the stride, fits.
    pub fn min_row_bytes(self, width: u32, data_type: DataType) -> Option<usize> {
        let w = width as usize;
        match self {
            Self::Nv12 => w.checked_add(w % 2),
            Self::Yuv420 => Some(w),
            _ => w
                .checked_mul(self.channels())
                .and_then(|n| n.checked_mul(data_type.size())),
        }
    }

    /// Minimum buffer length for a frame of this format.
    pub fn required_len(self, stride: usize, height: u32) -> Option<usize> {
        let h = height as usize;
        let luma = stride.checked_mul(h)?;
        let chroma_rows = h.div_ceil(2);
        match self {
            Self::Nv12 => luma.checked_add(stride.checked_mul(chroma_rows)?),
            Self::Yuv420 => {
                let plane = stride.div_ceil(2).checked_mul(chroma_rows)?;
                luma.checked_add(plane.checked_mul(2)?)
            }
            _ => Some(luma),
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Rgba => "rgba",
            Self::Argb => "argb",
            Self::Bgra => "bgra",
            Self::Abgr => "abgr",
            Self::Rgb => "rgb",
            Self::Bgr => "bgr",
            Self::Nv12 => "nv12",
            Self::Yuv420 => "yuv420",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for PixelFormat {
    type Err = ResizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PixelFormat::ALL
            .into_iter()
            .find(|f| f.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ResizeError::InvalidInput(format!("unknown pixel format `{s}`")))
    }
}

/// Sample type of each channel in a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// One byte per channel, `0..=255`.
    #[default]
    Uint8,
    /// One native-endian `f32` per channel, `0.0..=1.0`.
    Float32,
}

impl DataType {
    /// Size in bytes of one channel sample.
    pub const fn size(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Float32 => 4,
        }
    }
}
