//! Ordered, immutable set of active profiles

use lootsieve_core::{decide, Decision, Item, Profile};

/// The active profiles, in user-configured order
///
/// A registry is immutable once built. A reload builds a fresh one through
/// a new [`Loader`](crate::Loader) and replaces the old wholesale (e.g.
/// behind an `Arc`), so decisions in flight finish against the set they
/// started with and the read path needs no lock.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    profiles: Vec<Profile>,
}

impl Registry {
    /// Create a registry over already-validated profiles
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// The profiles in precedence order
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Classify one item against the active profiles, first match wins
    pub fn decide(&self, item: &Item) -> Decision {
        decide(&self.profiles, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootsieve_core::{ItemRarity, ItemType};

    fn named(name: &str) -> Profile {
        Profile {
            name: name.to_owned(),
            ..Profile::default()
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let registry = Registry::new(vec![named("first"), named("second")]);
        let names: Vec<_> = registry.profiles().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(registry.get("second").is_some());
        assert!(registry.get("third").is_none());
    }

    #[test]
    fn test_empty_registry_discards() {
        let registry = Registry::default();
        let item = Item::new(ItemType::Boots, ItemRarity::Legendary, 800);
        assert!(!registry.decide(&item).keep);
    }
}
