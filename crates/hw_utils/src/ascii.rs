//! ASCII case folding without allocation.
//!
//! Member names are compared byte-wise; only `A..=Z` fold to `a..=z`.
//! Non-ASCII bytes compare as-is.

use core::cmp::Ordering;

/// Compare `a` and `b` as if both were ASCII-lowercased.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use hw_utils::ascii::cmp_folded;
///
/// assert_eq!(cmp_folded("Name", "nAME"), Ordering::Equal);
/// assert_eq!(cmp_folded("abc", "ABD"), Ordering::Less);
/// ```
pub fn cmp_folded(a: &str, b: &str) -> Ordering {
    let a = a.bytes().map(|b| b.to_ascii_lowercase());
    let b = b.bytes().map(|b| b.to_ascii_lowercase());
    a.cmp(b)
}

/// Compare an already folded `key` against a `query` that still needs folding.
#[inline]
pub fn cmp_folded_key(key: &str, query: &str) -> Ordering {
    key.bytes().cmp(query.bytes().map(|b| b.to_ascii_lowercase()))
}

/// Returns `true` if `s` contains no ASCII uppercase letters.
#[inline]
pub fn is_folded(s: &str) -> bool {
    !s.bytes().any(|b| b.is_ascii_uppercase())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folded_ordering() {
        assert_eq!(cmp_folded("ID", "id"), Ordering::Equal);
        assert_eq!(cmp_folded("a", "AB"), Ordering::Less);
        assert_eq!(cmp_folded("b", "A"), Ordering::Greater);
        assert_eq!(cmp_folded_key("value", "VALUE"), Ordering::Equal);
        assert_eq!(cmp_folded_key("Value", "value"), Ordering::Less);
    }

    #[test]
    fn folded_check() {
        assert!(is_folded("already_lower_1"));
        assert!(!is_folded("Upper"));
    }
}
