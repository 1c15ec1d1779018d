use libloading::{Library, Symbol};
use std::ffi::CString;
use std::path::Path;

use crate::error::ResizeError;
use crate::ffi::{RawFrame, ReleaseFn, ResizeFn, Status};
use crate::frame::FrameBuffer;
use crate::resizer::{Resize, ResizeRequest};

/// Dynamically loaded resize plugin.
///
/// The function pointers stay valid as long as the library is loaded, which
/// is as long as this value lives.
pub struct Plugin {
    resize: ResizeFn,
    release: ReleaseFn,
    _lib: Library,
}

impl Plugin {
    /// Loads a plugin dynamic library and resolves `resize_frame` and `release_frame`.
    ///
    /// # SAFETY
    /// The caller must ensure that the library at `path`:
    /// - exports both symbols with the exact `ResizeFn` / `ReleaseFn` ABI and signature,
    /// - follows the FFI contract for them (only reads the source, fills `out`
    ///   with a buffer `release_frame` can free),
    /// - runs no unsound initialisation code on load.
    pub unsafe fn load(path: &Path) -> Result<Self, libloading::Error> {
        // SAFETY: forwarded to the caller, see above.
        unsafe {
            let lib = Library::new(path)?;
            let resize: Symbol<ResizeFn> = lib.get(b"resize_frame")?;
            let release: Symbol<ReleaseFn> = lib.get(b"release_frame")?;
            let (resize, release) = (*resize, *release);

            Ok(Self {
                resize,
                release,
                _lib: lib,
            })
        }
    }
}

impl Resize for Plugin {
    fn resize(&self, request: &ResizeRequest<'_>) -> Result<FrameBuffer, ResizeError> {
        let params = request
            .options()
            .to_toml_string()
            .map_err(|e| ResizeError::invalid(format!("cannot encode params: {e}")))?;
        let params = CString::new(params).map_err(|_| ResizeError::invalid("params contain NUL"))?;

        let src = RawFrame::borrowed(request.source());
        let mut out = RawFrame::empty();

        // SAFETY:
        // - `src` describes memory borrowed from the request, alive for the call;
        //   the plugin contract forbids writes through it.
        // - `params` is a NUL-terminated string that outlives the call.
        // - `out` is a valid, writable descriptor.
        let code = unsafe { (self.resize)(&src, params.as_ptr(), &mut out) };
        Status::from_code(code).into_result()?;

        // SAFETY: on success the plugin filled `out` with a buffer it owns
        // until `release_frame`, which is called right after copying.
        let frame = unsafe { out.as_frame_ref() }.and_then(|f| f.to_owned_frame());
        // SAFETY: `out` came from this plugin's `resize_frame` and is released once.
        unsafe { (self.release)(&mut out) };

        tracing::debug!(code, "plugin resize finished");
        frame
    }
}
