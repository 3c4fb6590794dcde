//! Unique identifier generation for a document root.

use std::collections::HashSet;

/// Mints unique anchor identifiers for one document tree.
///
/// Owned by the tree root; an embedded sub-document delegates to its host
/// root's generator, and a detached subtree receives a fresh one.
///
/// Collision policy: the candidate id is the prefix plus the alphanumeric
/// characters of the text; an already-used candidate gets a `-N` suffix from
/// the first free counter value. Ids are never returned to the pool, so a
/// generator stays collision-free across regenerations.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    used: HashSet<String>,
}

impl IdGenerator {
    /// Create an empty generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a unique id from a prefix and free-form text.
    ///
    /// Non-alphanumeric characters of `text` are dropped; an empty result
    /// still yields a unique id from the prefix alone.
    pub fn unique_id(&mut self, prefix: &str, text: &str) -> String {
        let mut base = String::with_capacity(prefix.len() + text.len());
        base.push_str(prefix);
        base.extend(text.chars().filter(|c| c.is_alphanumeric()));

        let mut candidate = base.clone();
        let mut counter = 0u32;
        while !self.used.insert(candidate.clone()) {
            counter += 1;
            candidate = format!("{base}-{counter}");
        }
        candidate
    }

    /// Reserve an id chosen outside the generator (e.g. restored from a
    /// cached header id) so later minting cannot collide with it.
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_non_alphanumerics() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.unique_id("H", "Hello, world!"), "HHelloworld");
    }

    #[test]
    fn collisions_get_numeric_suffix() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.unique_id("H", "Introduction"), "HIntroduction");
        assert_eq!(ids.unique_id("H", "Introduction"), "HIntroduction-1");
        assert_eq!(ids.unique_id("H", "Introduction"), "HIntroduction-2");
    }

    #[test]
    fn empty_text_still_unique() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.unique_id("H", "!!!"), "H");
        assert_eq!(ids.unique_id("H", ""), "H-1");
    }

    #[test]
    fn reserved_ids_are_skipped() {
        let mut ids = IdGenerator::new();
        ids.reserve("HFaq");
        assert_eq!(ids.unique_id("H", "Faq"), "HFaq-1");
    }
}
