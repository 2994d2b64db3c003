//! Log sanitization utilities
//!
//! Keeps record values, session tokens and signatures from being dumped
//! whole into debug/error logs.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Headers whose values are never logged.
const SENSITIVE_HEADERS: [&str; 2] = ["x-amzn-authorization", "x-amz-security-token"];

/// Value to log for header `name`: sensitive headers keep only a short prefix.
pub fn redact_header<'a>(name: &str, value: &'a str) -> std::borrow::Cow<'a, str> {
    if SENSITIVE_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
    {
        let prefix = &value[..floor_char_boundary(value, 16)];
        std::borrow::Cow::Owned(format!("{prefix}... [redacted]"))
    } else {
        std::borrow::Cow::Borrowed(value)
    }
}
