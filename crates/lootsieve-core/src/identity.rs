//! Identifier types for catalog-backed names
//!
//! All three are string-backed so profile documents can reference game data
//! by the same slugs the catalog uses. They only become trusted after the
//! validator has resolved them against a [`Catalog`](crate::Catalog).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an affix in the game-data catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffixId(pub String);

impl AffixId {
    /// Create a new affix ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AffixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AffixId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AffixId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a unique-item aspect in the game-data catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectId(pub String);

impl AspectId {
    /// Create a new aspect ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AspectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AspectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a dungeon or sigil affix in the game-data catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SigilId(pub String);

impl SigilId {
    /// Create a new sigil entry ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SigilId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SigilId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SigilId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affix_id() {
        let id = AffixId::new("movement_speed");
        assert_eq!(id.as_str(), "movement_speed");
        assert_eq!(format!("{}", id), "movement_speed");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Same slug, different catalogs; the type keeps them apart.
        let affix = AffixId::new("shrine_buff_duration");
        let sigil = SigilId::new("shrine_buff_duration");
        assert_eq!(affix.as_str(), sigil.as_str());
    }
}
