use thiserror::Error;

/// Errors produced by a resize call.
///
/// A failed call never yields a partial frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    /// The request is malformed: zero dimensions, a short stride or buffer,
    /// a crop outside the source, or an unsupported format combination.
    /// Retrying without correcting the input fails the same way.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An output or scratch buffer of the given size could not be reserved.
    #[error("Allocation of {0} bytes failed")]
    Allocation(usize),
}

impl ResizeError {
    /// Returns true if the call may succeed once memory is released elsewhere.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResizeError::Allocation(_))
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ResizeError::InvalidInput(msg.into())
    }
}

/// Application-level errors produced by the frame_resizer binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input image file does not exist.
    #[error("Input file does not exist: {0}")]
    MissingInput(String),

    /// Params file does not exist.
    #[error("Params file does not exist: {0}")]
    MissingParams(String),

    /// Plugin dynamic library does not exist.
    #[error("Plugin library does not exist: {0}")]
    MissingPlugin(String),

    /// I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error occurred while decoding or encoding an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error occurred while loading a dynamic plugin library.
    #[error("Plugin load error: {0}")]
    Plugin(#[from] libloading::Error),

    /// Params file contains invalid UTF-8 data.
    #[error("Invalid UTF-8 in params file")]
    InvalidParamsUtf8,

    /// Params file is not valid resize options.
    #[error("Invalid params: {0}")]
    InvalidParams(#[from] toml::de::Error),

    /// The resize itself failed.
    #[error(transparent)]
    Resize(#[from] ResizeError),

    /// The output frame cannot be encoded as an image file.
    #[error("Cannot encode {0} output as an image, write to a .raw file instead")]
    Unencodable(String),
}

/// Reserves a zeroed buffer of exactly `len` bytes, reporting failure
/// instead of aborting.
pub(crate) fn alloc_zeroed(len: usize) -> Result<Vec<u8>, ResizeError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ResizeError::Allocation(len))?;
    buf.resize(len, 0);
    Ok(buf)
}
