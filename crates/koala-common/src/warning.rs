//! Deduplicated layout warnings.
//!
//! Warnings are emitted as `tracing` events at WARN level under the
//! `koala::warning` target. Each distinct `(component, message)` pair is
//! reported once until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about unsupported or ignored input (emitted once per unique message).
///
/// Returns `true` if this call emitted the warning, `false` if the same
/// warning was already reported.
///
/// # Example
/// ```
/// use koala_common::warning::warn_once;
///
/// let _ = warn_once("document", "ignoring 'width' on a text box");
/// assert!(!warn_once("document", "ignoring 'width' on a text box"));
/// ```
#[must_use]
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(target: "koala::warning", component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings (call before laying out a new document).
pub fn clear_warnings() {
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
