//! FFI bindings for Synheart Lifestyle
//!
//! This module provides C-compatible functions for embedding the questionnaire
//! engine in host apps. All functions exchange JSON through C strings
//! (null-terminated) and return allocated memory that must be freed by the
//! caller using `lifestyle_free_string`.
//!
//! The session API exposes only the pure reducer: the host runs the returned
//! effects itself (network calls, storage) and feeds results back as events.
//!
//! Functions that read the built-in catalog go through [`Catalog::builtin`],
//! which panics if the compiled-in tables fail validation. That can only
//! happen in a broken build; `test_builtin_tables_validate` guards it.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::catalog::Catalog;
use crate::error::LifestyleError;
use crate::flow::{reduce, AssessmentState, Event};
use crate::gating::is_category_complete;
use crate::recommend::fallback_recommendations;
use crate::scoring::scores_from_json;
use crate::types::{Gender, RespondentId};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Like `cstr_to_string`, recording an error naming the argument on failure
unsafe fn required_arg(ptr: *const c_char, name: &str) -> Option<String> {
    let value = cstr_to_string(ptr);
    if value.is_none() {
        set_last_error(&format!("Invalid {name} string pointer"));
    }
    value
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Hand a result to C: the string on success, NULL plus last error otherwise
fn result_to_cstr<E: std::fmt::Display>(result: Result<String, E>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Return the built-in question catalog as JSON.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `lifestyle_free_string`.
/// - Returns NULL on error; call `lifestyle_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_catalog_json() -> *mut c_char {
    clear_last_error();
    result_to_cstr(Catalog::builtin().to_json())
}

/// Compute category scores for an answers JSON object (`{"question_id": answer}`).
///
/// # Safety
/// - `answers_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `lifestyle_free_string`.
/// - Returns NULL on error; call `lifestyle_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_compute_scores(answers_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(json) = required_arg(answers_json, "answers JSON") else {
        return ptr::null_mut();
    };

    result_to_cstr(scores_from_json(Catalog::builtin(), &json))
}

/// Prompt text of a question for a respondent's gender.
///
/// # Safety
/// - `question_id` must be a valid null-terminated C string.
/// - `gender` may be NULL or one of `female`, `male`, `non_binary`, `prefer_not_to_say`.
/// - Returns a newly allocated string that must be freed with `lifestyle_free_string`.
/// - Returns NULL on error; call `lifestyle_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_question_prompt(
    question_id: *const c_char,
    gender: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(question_id) = required_arg(question_id, "question_id") else {
        return ptr::null_mut();
    };

    let gender = match cstr_to_string(gender) {
        None => None,
        Some(raw) => match serde_json::from_value::<Gender>(serde_json::Value::String(raw)) {
            Ok(g) => Some(g),
            Err(e) => {
                set_last_error(&format!("Invalid gender: {e}"));
                return ptr::null_mut();
            }
        },
    };

    result_to_cstr(
        Catalog::builtin()
            .question(&question_id)
            .map(|q| q.prompt_for(gender).to_string()),
    )
}

/// Whether a category's applicable questions all have valid answers.
///
/// # Safety
/// - `category_id` and `answers_json` must be valid null-terminated C strings.
/// - Returns 1 when complete, 0 when not, -1 on error.
/// - On error, call `lifestyle_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_category_complete(
    category_id: *const c_char,
    answers_json: *const c_char,
) -> i32 {
    clear_last_error();

    let Some(category_id) = required_arg(category_id, "category_id") else {
        return -1;
    };
    let Some(json) = required_arg(answers_json, "answers JSON") else {
        return -1;
    };

    let result = serde_json::from_str(&json)
        .map_err(LifestyleError::from)
        .and_then(|answers| is_category_complete(Catalog::builtin(), &category_id, &answers));

    match result {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Return the fixed fallback recommendation list as JSON.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `lifestyle_free_string`.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_fallback_recommendations() -> *mut c_char {
    clear_last_error();
    result_to_cstr(serde_json::to_string(&fallback_recommendations()))
}

// ============================================================================
// Session (reducer) API
// ============================================================================

/// Opaque handle to an assessment state
pub struct LifestyleSessionHandle {
    state: AssessmentState,
}

impl LifestyleSessionHandle {
    fn apply(&mut self, event_json: &str) -> Result<String, LifestyleError> {
        let event: Event = serde_json::from_str(event_json)?;
        let transition = reduce(Catalog::builtin(), &self.state, event)?;
        let json = serde_json::to_string(&transition)?;
        self.state = transition.state;
        Ok(json)
    }
}

/// Create a new assessment session.
///
/// # Safety
/// - `respondent_id` may be NULL, in which case a fresh id is generated.
/// - Returns a pointer that must be freed with `lifestyle_session_free`.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_session_new(respondent_id: *const c_char) -> *mut LifestyleSessionHandle {
    clear_last_error();

    let state = match cstr_to_string(respondent_id) {
        Some(id) if !id.is_empty() => AssessmentState::new(RespondentId::from(id)),
        _ => AssessmentState::start(),
    };

    Box::into_raw(Box::new(LifestyleSessionHandle { state }))
}

/// Free an assessment session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `lifestyle_session_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_session_free(session: *mut LifestyleSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Apply an event JSON (e.g. `{"type":"next"}`) to a session.
///
/// Returns the transition as JSON: `{"state": {...}, "effects": [...]}`. The
/// host is responsible for running each effect once. A refused event leaves
/// the session unchanged.
///
/// # Safety
/// - `session` must be a valid pointer returned by `lifestyle_session_new`.
/// - `event_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `lifestyle_free_string`.
/// - Returns NULL on error; call `lifestyle_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_session_apply(
    session: *mut LifestyleSessionHandle,
    event_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &mut *session;

    let Some(json) = required_arg(event_json, "event JSON") else {
        return ptr::null_mut();
    };

    result_to_cstr(handle.apply(&json))
}

/// Current session state as JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `lifestyle_session_new`.
/// - Returns a newly allocated string that must be freed with `lifestyle_free_string`.
/// - Returns NULL on error; call `lifestyle_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_session_state(session: *const LifestyleSessionHandle) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &*session;
    result_to_cstr(serde_json::to_string(&handle.state))
}

/// Progress bar value (0-100) for a session, or -1 on error.
///
/// # Safety
/// - `session` must be a valid pointer returned by `lifestyle_session_new`.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_session_progress(session: *const LifestyleSessionHandle) -> f64 {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return -1.0;
    }

    (*session).state.progress(Catalog::builtin())
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Lifestyle functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Lifestyle function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Lifestyle function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Lifestyle library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn lifestyle_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
