//! Layout warnings routed through the `log` facade.
//!
//! Provides deduplication to avoid spamming the same warning once per line
//! box or once per pass. Used by the layout engine to report degraded
//! resources (missing fonts, missing intrinsic image sizes) that fall back to
//! zero-size metrics instead of failing the pass.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a degraded resource (logged once per unique message)
///
/// Returns `true` if the warning was emitted, `false` if it was a repeat.
///
/// # Example
/// ```
/// use flowbox_common::warning::warn_once;
///
/// let _ = warn_once("replaced", "no intrinsic size for 'logo.png'");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        log::warn!(target: "flowbox", "[{component}] {message}");
    }
    first_time
}

/// Clear all recorded warnings (call when loading a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
