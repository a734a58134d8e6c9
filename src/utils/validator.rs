//! # Text Input Validation Utilities
//!
//! Regex patterns used by the `validator` derives on request payloads.

use std::sync::LazyLock;

use regex::Regex;

/// Email validation regex pattern
///
/// Intentionally loose: one `@`, a dotted domain, no spaces. Real
/// deliverability checks are out of scope.
pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Failed to compile email regex")
});

/// Postal code ("pincode") pattern: 4 to 10 digits.
///
/// Listings filter by exact string match, so normalizing the format at
/// registration keeps lookups honest.
pub static PINCODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4,10}$").expect("Failed to compile pincode regex"));
