//! C ABI for the narrow boundary

use crate::handler::TempoHandler;
use std::ffi::{c_char, CStr};

/// Tempo of the audio file at `path` in BPM, or `0.0` on any failure
///
/// `path` is a filesystem path or `file://` URL. A null or non-UTF-8 path
/// yields `0.0`.
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn rhythmic_analyze_rhythm(path: *const c_char) -> f32 {
    if path.is_null() {
        return 0.0;
    }

    // SAFETY: non-null and NUL-terminated per the caller contract
    let path = unsafe { CStr::from_ptr(path) };
    match path.to_str() {
        Ok(source) => TempoHandler::new().analyze_rhythm(source),
        Err(_) => {
            log::debug!("Rejected non-UTF-8 path");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_null_path() {
        assert_eq!(unsafe { rhythmic_analyze_rhythm(std::ptr::null()) }, 0.0);
    }

    #[test]
    fn test_non_utf8_path() {
        let bytes = CString::new(vec![0xff, 0xfe, b'a']).unwrap();
        assert_eq!(unsafe { rhythmic_analyze_rhythm(bytes.as_ptr()) }, 0.0);
    }

    #[test]
    fn test_missing_file() {
        let path = CString::new("/nonexistent/track.wav").unwrap();
        assert_eq!(unsafe { rhythmic_analyze_rhythm(path.as_ptr()) }, 0.0);
    }
}
