//! Catalog surface for resolving name references
//!
//! The catalog is supplied by game-data extraction and loaded once. The
//! validator resolves every name a profile mentions against it; evaluation
//! never touches it.

use crate::{AffixId, AspectId, SigilId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Read-only lookup over the known affix, aspect and sigil/dungeon names
///
/// Injected into validation as a parameter so the schema layer has no
/// load-order dependency on where the data comes from.
pub trait Catalog {
    /// Display text for a known affix
    fn affix(&self, id: &AffixId) -> Option<&str>;

    /// Display text for a known unique-item aspect
    fn aspect(&self, id: &AspectId) -> Option<&str>;

    /// Display text for a known dungeon or sigil affix
    fn sigil_entry(&self, id: &SigilId) -> Option<&str>;

    fn has_affix(&self, id: &AffixId) -> bool {
        self.affix(id).is_some()
    }

    fn has_aspect(&self, id: &AspectId) -> bool {
        self.aspect(id).is_some()
    }

    fn has_sigil_entry(&self, id: &SigilId) -> bool {
        self.sigil_entry(id).is_some()
    }
}

/// Static game-data tables backing [`Catalog`]
///
/// Maps each identifier to its display text. Deserializable so the tables
/// can be shipped as a RON file next to the profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameData {
    pub affixes: IndexMap<AffixId, String>,
    pub aspects: IndexMap<AspectId, String>,
    pub sigil_entries: IndexMap<SigilId, String>,
}

impl GameData {
    /// Create empty game data
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an affix entry
    pub fn with_affix(mut self, id: impl Into<AffixId>, display: impl Into<String>) -> Self {
        self.affixes.insert(id.into(), display.into());
        self
    }

    /// Add an aspect entry
    pub fn with_aspect(mut self, id: impl Into<AspectId>, display: impl Into<String>) -> Self {
        self.aspects.insert(id.into(), display.into());
        self
    }

    /// Add a dungeon or sigil affix entry
    pub fn with_sigil_entry(mut self, id: impl Into<SigilId>, display: impl Into<String>) -> Self {
        self.sigil_entries.insert(id.into(), display.into());
        self
    }
}

impl Catalog for GameData {
    fn affix(&self, id: &AffixId) -> Option<&str> {
        self.affixes.get(id).map(String::as_str)
    }

    fn aspect(&self, id: &AspectId) -> Option<&str> {
        self.aspects.get(id).map(String::as_str)
    }

    fn sigil_entry(&self, id: &SigilId) -> Option<&str> {
        self.sigil_entries.get(id).map(String::as_str)
    }
}
