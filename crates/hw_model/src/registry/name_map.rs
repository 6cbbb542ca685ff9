use alloc::borrow::Cow;

use hw_utils::hash::HashMap;

/// A bidirectional map between model type names and exchange names.
///
/// Names without an entry map to themselves.
///
/// ## Example
///
/// ```
/// use hw_model::registry::NameMap;
///
/// let mut names = NameMap::new();
/// names.insert("Circle", "shape.circle");
///
/// assert_eq!(names.to_exchange("Circle"), "shape.circle");
/// assert_eq!(names.to_model("shape.circle"), "Circle");
/// assert_eq!(names.to_model("Square"), "Square");
/// ```
#[derive(Default, Clone)]
pub struct NameMap {
    to_exchange: HashMap<Cow<'static, str>, Cow<'static, str>>,
    to_model: HashMap<Cow<'static, str>, Cow<'static, str>>,
}

impl NameMap {
    #[inline]
    pub const fn new() -> Self {
        Self {
            to_exchange: HashMap::with_hasher(hw_utils::hash::FixedHashState),
            to_model: HashMap::with_hasher(hw_utils::hash::FixedHashState),
        }
    }

    /// Maps `model` to `exchange` in both directions, replacing earlier
    /// mappings of either name.
    pub fn insert(&mut self, model: impl Into<Cow<'static, str>>, exchange: impl Into<Cow<'static, str>>) {
        let model = model.into();
        let exchange = exchange.into();
        if let Some(old) = self.to_exchange.remove(&model) {
            self.to_model.remove(&old);
        }
        if let Some(old) = self.to_model.remove(&exchange) {
            self.to_exchange.remove(&old);
        }
        self.to_exchange.insert(model.clone(), exchange.clone());
        self.to_model.insert(exchange, model);
    }

    /// Removes the mapping of `model`, returning its exchange name.
    pub fn remove(&mut self, model: &str) -> Option<Cow<'static, str>> {
        let exchange = self.to_exchange.remove(model)?;
        self.to_model.remove(&exchange);
        Some(exchange)
    }

    pub fn to_exchange<'a>(&'a self, model: &'a str) -> &'a str {
        self.to_exchange.get(model).map_or(model, |name| &**name)
    }

    pub fn to_model<'a>(&'a self, exchange: &'a str) -> &'a str {
        self.to_model.get(exchange).map_or(exchange, |name| &**name)
    }

    /// The exchange name of a `'static` model name, without copying it.
    pub fn to_exchange_static(&self, model: &'static str) -> Cow<'static, str> {
        match self.to_exchange.get(model) {
            Some(name) => name.clone(),
            None => Cow::Borrowed(model),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.to_exchange.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.to_exchange.is_empty()
    }
}

impl core::fmt::Debug for NameMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.to_exchange.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::NameMap;

    #[test]
    fn remapping_drops_stale_entries() {
        let mut names = NameMap::new();
        names.insert("Circle", "circle");
        names.insert("Circle", "round");
        assert_eq!(names.to_exchange("Circle"), "round");
        assert_eq!(names.to_model("circle"), "circle");
        assert_eq!(names.to_model("round"), "Circle");

        names.insert("Disc", "round");
        assert_eq!(names.to_exchange("Circle"), "Circle");
        assert_eq!(names.to_model("round"), "Disc");
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn remove_both_directions() {
        let mut names = NameMap::new();
        names.insert("Circle", "circle");
        assert_eq!(names.remove("Circle").as_deref(), Some("circle"));
        assert_eq!(names.to_model("circle"), "circle");
        assert!(names.is_empty());
    }
}
