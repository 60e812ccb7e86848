//! Constant-time comparison for signature checks.
//!
//! Plain `==` on strings returns at the first differing byte, which lets a
//! caller measuring response times learn how much of a forged signature was
//! correct. [`cbui_timing_safe_equal`] compares via `subtle` instead.
//!
//! ```rust
//! use cbuicore::cbui_timing_safe_equal;
//!
//! assert!(cbui_timing_safe_equal(b"3NJw+b0w", b"3NJw+b0w"));
//! assert!(!cbui_timing_safe_equal(b"3NJw+b0w", b"3NJw+b0x"));
//! ```

use subtle::ConstantTimeEq;

/// Constant-time byte comparison.
///
/// Length is not secret here (base64 signatures have a fixed length per
/// algorithm), so unequal lengths return `false` immediately.
pub fn cbui_timing_safe_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal() {
        assert!(cbui_timing_safe_equal(b"abc", b"abc"));
        assert!(cbui_timing_safe_equal(b"", b""));
    }

    #[test]
    fn test_not_equal() {
        assert!(!cbui_timing_safe_equal(b"abc", b"abd"));
        assert!(!cbui_timing_safe_equal(b"abc", b"ab"));
        assert!(!cbui_timing_safe_equal(b"", b"a"));
    }
}
