//! Guess normalization and the alias lookup table.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::{AtomicNumber, Element, InvariantViolation};

/// Normalizes player input: trims surrounding whitespace and case-folds.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Maps every normalized symbol, primary name and local name to its element.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    by_alias: HashMap<String, AtomicNumber>,
}

impl AliasIndex {
    /// Builds the index, rejecting aliases shared by different elements.
    ///
    /// An element may repeat its own alias (a local name equal to the primary
    /// name, for instance) without conflict.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::AliasCollision`] when one normalized alias
    /// belongs to two elements.
    #[instrument(skip_all, fields(elements = elements.len()))]
    pub fn build(elements: &[Element]) -> Result<Self, InvariantViolation> {
        let mut by_alias = HashMap::with_capacity(elements.len() * 3);
        for element in elements {
            let number = *element.atomic_number();
            for alias in element.aliases() {
                let key = normalize(alias);
                if key.is_empty() {
                    continue;
                }
                match by_alias.get(&key) {
                    Some(&first) if first != number => {
                        return Err(InvariantViolation::AliasCollision {
                            alias: key,
                            first,
                            second: number,
                        });
                    }
                    Some(_) => {}
                    None => {
                        by_alias.insert(key, number);
                    }
                }
            }
        }
        debug!(aliases = by_alias.len(), "Alias index built");
        Ok(Self { by_alias })
    }

    /// Resolves raw player input to an atomic number.
    pub fn lookup(&self, text: &str) -> Option<AtomicNumber> {
        self.by_alias.get(&normalize(text)).copied()
    }

    /// Number of distinct aliases.
    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    /// Whether the index holds no aliases.
    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_folds() {
        assert_eq!(normalize("  OxYgen \t"), "oxygen");
        assert_eq!(normalize("VODÍK"), "vodík");
    }

    #[test]
    fn test_lookup_every_alias() {
        let elements = vec![
            Element::new(8, "O".into(), "Oxygen".into(), Some("Kyslík".into()), 2, 16),
            Element::new(2, "He".into(), "Helium".into(), Some("Helium".into()), 1, 18),
        ];
        let index = AliasIndex::build(&elements).expect("no collisions");
        assert_eq!(index.lookup(" o "), Some(8));
        assert_eq!(index.lookup("OXYGEN"), Some(8));
        assert_eq!(index.lookup("kyslík"), Some(8));
        assert_eq!(index.lookup("helium"), Some(2));
        assert_eq!(index.lookup("argon"), None);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_collision_between_elements_rejected() {
        let elements = vec![
            Element::new(1, "X".into(), "Alpha".into(), None, 1, 1),
            Element::new(2, "Y".into(), "x".into(), None, 1, 2),
        ];
        let err = AliasIndex::build(&elements).expect_err("alias shared");
        assert_eq!(
            err,
            InvariantViolation::AliasCollision {
                alias: "x".into(),
                first: 1,
                second: 2
            }
        );
    }
}
