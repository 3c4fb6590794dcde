//! Block parameter maps.

/// Ordered string key/value parameters attached to a block.
///
/// Keys are unique and opaque to the model; renderers forward them verbatim.
/// Insertion order is preserved so rendered attribute output is
/// deterministic. A `Parameters` value is treated as immutable once attached
/// to a block; tree-level mutation replaces the whole map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters(Vec<(String, String)>);

impl Parameters {
    /// Create an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a value, preserving the position of an existing key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_preserves_insertion_order() {
        let mut params = Parameters::new();
        params.set("class", "box");
        params.set("style", "color: red");
        params.set("class", "wide");

        let entries: Vec<_> = params.iter().collect();
        assert_eq!(entries, vec![("class", "wide"), ("style", "color: red")]);
    }

    #[test]
    fn get_missing_key_is_none() {
        let params = Parameters::new().with("a", "1");
        assert_eq!(params.get("b"), None);
        assert_eq!(params.get("a"), Some("1"));
    }

    #[test]
    fn from_iterator_deduplicates_keys() {
        let params: Parameters = [("k", "1"), ("k", "2")].into_iter().collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("k"), Some("2"));
    }
}
