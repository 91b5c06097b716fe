use std::ffi::{c_char, CStr, CString};
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::balance::{merge_documents, MergeMode, MergeOptions};
use crate::duration::{DurationEstimator, PauseWeights, DEFAULT_WPM};
use crate::ir::MergeResult;

static LAST_ERROR: Lazy<Mutex<Option<CString>>> = Lazy::new(|| Mutex::new(None));

fn set_last_error(msg: &str) {
    let c = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    let mut guard = LAST_ERROR.lock().unwrap_or_else(|e| e.into_inner());
    *guard = Some(c);
}

fn clear_last_error() {
    let mut guard = LAST_ERROR.lock().unwrap_or_else(|e| e.into_inner());
    *guard = None;
}

fn take_cstr(ptr: *const c_char, name: &str) -> anyhow::Result<String> {
    if ptr.is_null() {
        return Err(anyhow!("{name} is null"));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(|s| s.to_string())
        .map_err(|_| anyhow!("{name} is not valid UTF-8"))
}

/// Merge request as sent by a host UI. Missing fields take the library defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FfiRequest {
    pub mode: MergeMode,
    #[serde(flatten)]
    pub options: MergeOptions,
    pub wpm: Option<f64>,
}

pub fn merge_request_json(
    primary: &str,
    secondary: &str,
    request_json: &str,
) -> anyhow::Result<String> {
    let req: FfiRequest = if request_json.trim().is_empty() {
        FfiRequest::default()
    } else {
        serde_json::from_str(request_json).context("parse merge options json")?
    };
    let wpm = req.wpm.unwrap_or(DEFAULT_WPM);
    if !wpm.is_finite() || wpm <= 0.0 {
        return Err(anyhow!("wpm must be a positive number, got {wpm}"));
    }
    let estimator = DurationEstimator::new(wpm, PauseWeights::default());
    let result: MergeResult =
        merge_documents(primary, secondary, req.mode, &req.options, &estimator);
    serde_json::to_string(&result).context("serialize merge result")
}

/// Merge two texts and return the result as a JSON string.
///
/// Returns null on failure (see `bm_last_error_utf8()`). Free the returned pointer with
/// `bm_string_free`.
#[no_mangle]
pub extern "C" fn bm_merge_json(
    primary: *const c_char,
    secondary: *const c_char,
    options_json: *const c_char,
) -> *mut c_char {
    let run = || -> anyhow::Result<CString> {
        let primary = take_cstr(primary, "primary")?;
        let secondary = take_cstr(secondary, "secondary")?;
        let options = if options_json.is_null() {
            String::new()
        } else {
            take_cstr(options_json, "options_json")?
        };
        let json = merge_request_json(&primary, &secondary, &options)?;
        CString::new(json).context("result contains NUL")
    };
    match run() {
        Ok(out) => {
            clear_last_error();
            out.into_raw()
        }
        Err(err) => {
            set_last_error(&format!("{err:#}"));
            std::ptr::null_mut()
        }
    }
}

/// Releases a string returned by `bm_merge_json`.
///
/// # Safety
/// `ptr` must come from `bm_merge_json` and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn bm_string_free(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr) });
}

/// Returns the last error message as a UTF-8 C string pointer (or null if none).
/// The pointer is valid until the next `bm_merge_json` call.
#[no_mangle]
pub extern "C" fn bm_last_error_utf8() -> *const c_char {
    let guard = LAST_ERROR.lock().unwrap_or_else(|e| e.into_inner());
    match guard.as_ref() {
        Some(s) => s.as_ptr(),
        None => std::ptr::null(),
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::{CStr, CString};

    use super::{bm_last_error_utf8, bm_merge_json, bm_string_free, merge_request_json};
    use crate::ir::MergeResult;

    #[test]
    fn request_json_round_trip() {
        let out = merge_request_json(
            "P1.\n\nP2.",
            "S1.\n\nS2.",
            r#"{"mode":"speech","start_lang":"secondary","wpm":150}"#,
        )
        .expect("merge");
        let res: MergeResult = serde_json::from_str(&out).expect("result json");
        assert_eq!(res.text, "S1.\n\n---\n\nP2.");
    }

    #[test]
    fn empty_options_use_defaults() {
        let out = merge_request_json("A.", "B.", "").expect("merge");
        let res: MergeResult = serde_json::from_str(&out).expect("result json");
        assert_eq!(res.segments.len(), 1);
    }

    #[test]
    fn bad_options_are_errors() {
        assert!(merge_request_json("A.", "B.", "{not json").is_err());
        assert!(merge_request_json("A.", "B.", r#"{"wpm":-5}"#).is_err());
    }

    #[test]
    fn c_abi_success_and_failure() {
        let p = CString::new("# A\nOne.").expect("cstr");
        let s = CString::new("# B\nEins.").expect("cstr");
        let o = CString::new(r#"{"mode":"presentation","slide_mode":"single"}"#).expect("cstr");
        let ptr = bm_merge_json(p.as_ptr(), s.as_ptr(), o.as_ptr());
        assert!(!ptr.is_null());
        let json = unsafe { CStr::from_ptr(ptr) }.to_str().expect("utf8").to_string();
        unsafe { bm_string_free(ptr) };
        let res: MergeResult = serde_json::from_str(&json).expect("result json");
        assert_eq!(res.text, "# A\n\nOne.");

        let ptr = bm_merge_json(std::ptr::null(), s.as_ptr(), std::ptr::null());
        assert!(ptr.is_null());
        let err = unsafe { CStr::from_ptr(bm_last_error_utf8()) };
        assert_eq!(err.to_str().expect("utf8"), "primary is null");
    }
}
