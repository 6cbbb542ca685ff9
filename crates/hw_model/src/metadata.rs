//! Scoped string tags attached to a type or to one of its members.
//!
//! Tags use a `scope:subscope:value` syntax, e.g. `sql:pk`,
//! `sql:column:user_id` or `xml:attribute`. They are declared with
//! `#[model(tag = "...")]` and stored as a `&'static` slice.

use core::fmt;

/// Returns `true` if `candidate` is `scope` or lies inside it.
///
/// # Examples
///
/// ```
/// use hw_model::metadata::in_scope;
///
/// assert!(in_scope("sql:pk", "sql"));
/// assert!(in_scope("sql", "sql"));
/// assert!(!in_scope("sqlite:pk", "sql"));
/// ```
#[inline]
pub fn in_scope(candidate: &str, scope: &str) -> bool {
    match candidate.strip_prefix(scope) {
        Some(rest) => rest.is_empty() || rest.starts_with(':'),
        None => false,
    }
}

/// Returns the part of `tag` after `key`, if `tag` is `key` or `key:...`.
#[inline]
fn strip_key<'a>(tag: &'a str, key: &str) -> Option<&'a str> {
    let rest = tag.strip_prefix(key)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix(':')
    }
}

// -----------------------------------------------------------------------------
// Metadata

/// An ordered set of string tags.
///
/// # Examples
///
/// ```
/// use hw_model::metadata::Metadata;
///
/// static TAGS: &[&str] = &["sql:pk", "sql:column:user_id", "column:id"];
/// let meta = Metadata::new(TAGS);
///
/// assert!(meta.has_flag("sql:pk"));
/// assert_eq!(meta.value("sql:column"), Some("user_id"));
/// assert_eq!(meta.value_in("sql", "column"), Some("user_id"));
/// assert_eq!(meta.value_in("xml", "column"), Some("id"));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Metadata {
    tags: &'static [&'static str],
}

impl Metadata {
    /// Metadata without any tag.
    pub const EMPTY: Self = Self { tags: &[] };

    /// Creates metadata over a static tag list.
    #[inline]
    pub const fn new(tags: &'static [&'static str]) -> Self {
        Self { tags }
    }

    /// The tags in declaration order.
    #[inline]
    pub const fn tags(&self) -> &'static [&'static str] {
        self.tags
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns `true` if the exact tag `flag` is present.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.tags.iter().any(|tag| *tag == flag)
    }

    /// Returns the remainder of the first tag equal to `key` (as `""`) or
    /// starting with `key:`.
    pub fn value(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().copied().find_map(|tag| strip_key(tag, key))
    }

    /// Look up `key` inside `scope`, preferring the longest scope prefix.
    ///
    /// For a scope `a:b` the candidates are `a:b:key`, `a:key` and `key`, in
    /// that order.
    pub fn value_in(&self, scope: &str, key: &str) -> Option<&'static str> {
        let mut scope = Some(scope);
        while let Some(current) = scope {
            if let Some(found) = self.tags.iter().copied().find_map(|tag| {
                strip_key(tag, current).and_then(|rest| strip_key(rest, key))
            }) {
                return Some(found);
            }
            scope = current.rsplit_once(':').map(|(parent, _)| parent);
        }
        self.value(key)
    }

    /// Scoped version of [`has_flag`](Self::has_flag), using the same prefix
    /// walk as [`value_in`](Self::value_in).
    pub fn has_flag_in(&self, scope: &str, flag: &str) -> bool {
        let mut scope = Some(scope);
        while let Some(current) = scope {
            if self.tags.iter().any(|tag| {
                strip_key(tag, current).is_some_and(|rest| rest == flag)
            }) {
                return true;
            }
            scope = current.rsplit_once(':').map(|(parent, _)| parent);
        }
        self.has_flag(flag)
    }

    /// Tags that lie inside `scope`.
    pub fn scoped<'a>(&self, scope: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.tags.iter().copied().filter(move |tag| in_scope(tag, scope))
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tags).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
