use std::ffi::CStr;
use std::os::raw::c_char;

use frame_resizer::ffi::{RawFrame, Status};
use frame_resizer::{FrameResizer, Resize, ResizeOptions, ResizeRequest};

#[unsafe(no_mangle)]
pub extern "C" fn resize_frame(
    src: *const RawFrame,
    params: *const c_char,
    out: *mut RawFrame,
) -> u32 {
    if src.is_null() || out.is_null() {
        return Status::NullPointer as u32;
    }

    // SAFETY:
    // - We checked `params` is not NULL.
    // - FFI contract requires `params` to be a valid NUL-terminated C string
    //   that remains valid for the duration of this call.
    // - `CStr::from_ptr` will read memory until the first NUL byte; if the pointer
    //   is invalid or not NUL-terminated, that would be UB, hence the contract.
    let params_str = unsafe {
        if params.is_null() {
            ""
        } else {
            match CStr::from_ptr(params).to_str() {
                Ok(s) => s,
                Err(_) => return Status::InvalidParams as u32,
            }
        }
    };

    let options: ResizeOptions = match toml::from_str(params_str) {
        Ok(options) => options,
        Err(err) => {
            tracing::warn!(%err, "rejecting resize params");
            return Status::InvalidParams as u32;
        }
    };

    // SAFETY:
    // - We checked `src` is not NULL above.
    // - FFI contract requires `src` to point to a valid descriptor whose `data`
    //   holds at least `len` readable bytes for the duration of this call.
    // - Caller must ensure nobody writes to that buffer while this function runs.
    let source = match unsafe { (*src).as_frame_ref() } {
        Ok(frame) => frame,
        Err(err) => return Status::from(&err) as u32,
    };

    match FrameResizer::new().resize(&ResizeRequest::new(source, options)) {
        Ok(frame) => {
            // SAFETY: `out` is non-null and the contract requires it to be writable.
            unsafe { out.write(RawFrame::from_owned(frame)) };
            Status::Ok as u32
        }
        Err(err) => {
            tracing::debug!(%err, "resize failed");
            Status::from(&err) as u32
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn release_frame(frame: *mut RawFrame) {
    if frame.is_null() {
        return;
    }

    // SAFETY:
    // - We checked `frame` is not NULL.
    // - FFI contract requires it to be a descriptor filled by `resize_frame`
    //   or an empty one; the data pointer is cleared so a second call is a no-op.
    unsafe {
        let raw = frame.replace(RawFrame::empty());
        if !raw.data.is_null() {
            drop(raw.into_owned());
        }
    }
}
