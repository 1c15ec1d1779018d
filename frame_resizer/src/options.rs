use serde::{Deserialize, Serialize};

use crate::format::{DataType, PixelFormat};

/// Resampling filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Picks the closest source sample.
    Nearest,
    /// Blends the four surrounding source samples.
    #[default]
    Bilinear,
}

/// Clockwise rotation applied after scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    #[serde(rename = "0deg")]
    Deg0,
    /// Quarter turn clockwise.
    #[serde(rename = "90deg")]
    Deg90,
    /// Half turn.
    #[serde(rename = "180deg")]
    Deg180,
    /// Three quarter turns clockwise.
    #[serde(rename = "270deg")]
    Deg270,
}

impl Rotation {
    /// Returns true if the rotation swaps width and height.
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// A rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Region of the source that gets scaled, applied before everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Crop {
    /// A named crop mode.
    Mode(CropMode),
    /// An explicit rectangle that must lie inside the source.
    Rect(Rect),
}

impl Crop {
    /// The whole source, stretched to the target size.
    pub const FULL: Crop = Crop::Mode(CropMode::Full);
    /// The largest centred region with the target aspect ratio.
    pub const CENTER: Crop = Crop::Mode(CropMode::Center);
}

impl Default for Crop {
    fn default() -> Self {
        Crop::FULL
    }
}

/// Named crop modes, spelled as plain strings in params files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// The whole source.
    Full,
    /// The largest centred region with the target aspect ratio.
    Center,
}

/// Everything a caller can ask of one resize besides the source frame.
///
/// `width` and `height` are the final output dimensions, after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output pixel format.
    #[serde(default = "default_pixel_format")]
    pub pixel_format: PixelFormat,
    /// Output sample type.
    #[serde(default)]
    pub data_type: DataType,
    /// Resampling filter.
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Source region to scale.
    ///
    /// Defaults to the whole frame, stretched to the target size. Camera
    /// frame-processor resize plugins centre-crop to the target aspect ratio
    /// when no crop is given; params ported from them need `crop = "center"`
    /// to keep that framing.
    #[serde(default)]
    pub crop: Crop,
    /// Clockwise rotation after scaling.
    #[serde(default)]
    pub rotation: Rotation,
    /// Mirror horizontally after rotation.
    #[serde(default)]
    pub mirror: bool,
}

fn default_pixel_format() -> PixelFormat {
    PixelFormat::Rgba
}

impl ResizeOptions {
    /// Plain scale to `width` x `height` in `pixel_format`.
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        Self {
            width,
            height,
            pixel_format,
            data_type: DataType::Uint8,
            algorithm: Algorithm::default(),
            crop: Crop::FULL,
            rotation: Rotation::Deg0,
            mirror: false,
        }
    }

    /// Parses options from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serializes options to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Dimensions the scaler targets, before rotation.
    pub(crate) fn scaled_dims(&self) -> (u32, u32) {
        if self.rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_params_use_defaults() {
        let opts = ResizeOptions::from_toml_str("width = 8\nheight = 6\n").unwrap();
        assert_eq!(opts, ResizeOptions::new(8, 6, PixelFormat::Rgba));
        assert_eq!(opts.algorithm, Algorithm::Bilinear);
        assert_eq!(opts.crop, Crop::FULL);
    }

    #[test]
    fn full_params() {
        let opts = ResizeOptions::from_toml_str(
            r#"
            width = 320
            height = 240
            pixel_format = "bgr"
            data_type = "float32"
            algorithm = "nearest"
            rotation = "90deg"
            mirror = true
            crop = { x = 2, y = 4, width = 100, height = 50 }
            "#,
        )
        .unwrap();
        assert_eq!(opts.pixel_format, PixelFormat::Bgr);
        assert_eq!(opts.data_type, DataType::Float32);
        assert_eq!(opts.algorithm, Algorithm::Nearest);
        assert_eq!(opts.rotation, Rotation::Deg90);
        assert!(opts.mirror);
        assert_eq!(
            opts.crop,
            Crop::Rect(Rect { x: 2, y: 4, width: 100, height: 50 })
        );
        assert_eq!(opts.scaled_dims(), (240, 320));
    }

    #[test]
    fn crop_modes_parse_from_strings() {
        let opts =
            ResizeOptions::from_toml_str("width = 1\nheight = 1\ncrop = \"center\"").unwrap();
        assert_eq!(opts.crop, Crop::CENTER);
    }

    #[test]
    fn rejects_unknown_rotation() {
        let parsed = ResizeOptions::from_toml_str("width = 1\nheight = 1\nrotation = \"45deg\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn toml_round_trip_keeps_meaning() {
        let mut opts = ResizeOptions::new(4, 2, PixelFormat::Nv12);
        opts.rotation = Rotation::Deg270;
        let text = opts.to_toml_string().unwrap();
        let back = ResizeOptions::from_toml_str(&text).unwrap();
        assert_eq!(back.crop, Crop::FULL);
        assert_eq!(back.rotation, Rotation::Deg270);
        assert_eq!(back.pixel_format, PixelFormat::Nv12);
    }

    #[test]
    fn rect_crop_and_float_survive_toml() {
        let mut opts = ResizeOptions::new(4, 2, PixelFormat::Rgb);
        opts.data_type = DataType::Float32;
        opts.mirror = true;
        opts.crop = Crop::Rect(Rect { x: 1, y: 2, width: 5, height: 3 });
        let back = ResizeOptions::from_toml_str(&opts.to_toml_string().unwrap()).unwrap();
        assert_eq!(back, opts);
    }
}
