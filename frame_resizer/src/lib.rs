#![deny(missing_docs)]

//! Camera frame resizing and pixel format conversion, with dynamic plugin support.

/// Error types used by the resizer and the CLI.
pub mod error;

/// C ABI frame descriptors and status codes shared with plugins.
pub mod ffi;

/// Pixel formats and channel sample types.
pub mod format;

/// Owned and borrowed frame buffers.
pub mod frame;

/// What a resize call should produce.
pub mod options;

/// Dynamic plugin loading and FFI bindings.
pub mod plugin_loader;

/// The resize contract and the built-in engine.
pub mod resizer;

mod convert;
mod geometry;
mod plane;
mod resample;

pub use error::ResizeError;
pub use format::{DataType, PixelFormat};
pub use frame::{FrameBuffer, FrameRef};
pub use options::{Algorithm, Crop, CropMode, Rect, ResizeOptions, Rotation};
pub use resizer::{FrameResizer, Resize, ResizeRequest};
