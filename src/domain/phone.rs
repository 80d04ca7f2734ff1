use std::sync::LazyLock;

use regex::Regex;

/// Warning attached to writes whose phone number does not look like a local
/// mobile number.
pub const INVALID_PHONE_WARNING: &str =
    "⚠️ Numri i telefonit nuk është i saktë (duhet të ketë 10 shifra dhe të fillojë me 06).";

/// `06` followed by exactly eight more digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^06[0-9]{8}$").expect("Invalid regex"));

/// Returns a warning when `phone` does not match the local format.
///
/// Advisory only: callers still persist the value.
pub fn validate_phone(phone: &str) -> Option<&'static str> {
    if PHONE_RE.is_match(phone) {
        None
    } else {
        Some(INVALID_PHONE_WARNING)
    }
}
