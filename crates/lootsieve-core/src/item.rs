//! Item snapshot types
//!
//! A snapshot is the recognized state of one in-game item, handed to the
//! engine by the recognition collaborator. It is immutable once built and
//! discarded after a decision is produced. Numeric fields that recognition
//! failed to read are `None`; the evaluator treats a missing value as
//! "cannot satisfy a threshold" and a missing power as an input error when
//! a rule actually needs it.

use crate::{AffixId, AspectId, SigilId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item type tag, matching the slugs used in profile documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemType {
    Amulet,
    Axe,
    Boots,
    Bow,
    ChestArmor,
    Crossbow,
    Dagger,
    Elixir,
    Focus,
    Gloves,
    Helm,
    Legs,
    Mace,
    Material,
    Polearm,
    Ring,
    Rune,
    Scythe,
    Shield,
    Sigil,
    Staff,
    Sword,
    TemperManual,
    Tome,
    Totem,
    TwoHandedAxe,
    TwoHandedMace,
    TwoHandedScythe,
    TwoHandedSword,
    Wand,
}

impl ItemType {
    /// The slug used in profile documents and snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Amulet => "amulet",
            ItemType::Axe => "axe",
            ItemType::Boots => "boots",
            ItemType::Bow => "bow",
            ItemType::ChestArmor => "chest_armor",
            ItemType::Crossbow => "crossbow",
            ItemType::Dagger => "dagger",
            ItemType::Elixir => "elixir",
            ItemType::Focus => "focus",
            ItemType::Gloves => "gloves",
            ItemType::Helm => "helm",
            ItemType::Legs => "legs",
            ItemType::Mace => "mace",
            ItemType::Material => "material",
            ItemType::Polearm => "polearm",
            ItemType::Ring => "ring",
            ItemType::Rune => "rune",
            ItemType::Scythe => "scythe",
            ItemType::Shield => "shield",
            ItemType::Sigil => "sigil",
            ItemType::Staff => "staff",
            ItemType::Sword => "sword",
            ItemType::TemperManual => "temper_manual",
            ItemType::Tome => "tome",
            ItemType::Totem => "totem",
            ItemType::TwoHandedAxe => "two_handed_axe",
            ItemType::TwoHandedMace => "two_handed_mace",
            ItemType::TwoHandedScythe => "two_handed_scythe",
            ItemType::TwoHandedSword => "two_handed_sword",
            ItemType::Wand => "wand",
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amulet" => Ok(ItemType::Amulet),
            "axe" => Ok(ItemType::Axe),
            "boots" => Ok(ItemType::Boots),
            "bow" => Ok(ItemType::Bow),
            "chest_armor" => Ok(ItemType::ChestArmor),
            "crossbow" => Ok(ItemType::Crossbow),
            "dagger" => Ok(ItemType::Dagger),
            "elixir" => Ok(ItemType::Elixir),
            "focus" => Ok(ItemType::Focus),
            "gloves" => Ok(ItemType::Gloves),
            "helm" => Ok(ItemType::Helm),
            "legs" => Ok(ItemType::Legs),
            "mace" => Ok(ItemType::Mace),
            "material" => Ok(ItemType::Material),
            "polearm" => Ok(ItemType::Polearm),
            "ring" => Ok(ItemType::Ring),
            "rune" => Ok(ItemType::Rune),
            "scythe" => Ok(ItemType::Scythe),
            "shield" => Ok(ItemType::Shield),
            "sigil" => Ok(ItemType::Sigil),
            "staff" => Ok(ItemType::Staff),
            "sword" => Ok(ItemType::Sword),
            "temper_manual" => Ok(ItemType::TemperManual),
            "tome" => Ok(ItemType::Tome),
            "totem" => Ok(ItemType::Totem),
            "two_handed_axe" => Ok(ItemType::TwoHandedAxe),
            "two_handed_mace" => Ok(ItemType::TwoHandedMace),
            "two_handed_scythe" => Ok(ItemType::TwoHandedScythe),
            "two_handed_sword" => Ok(ItemType::TwoHandedSword),
            "wand" => Ok(ItemType::Wand),
            other => Err(format!("unknown item type '{other}'")),
        }
    }
}

impl TryFrom<String> for ItemType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemType> for String {
    fn from(value: ItemType) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Item rarity as recognized on the tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemRarity {
    Common,
    Magic,
    Rare,
    Legendary,
    Unique,
    Mythic,
}

impl ItemRarity {
    /// The slug used in snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemRarity::Common => "common",
            ItemRarity::Magic => "magic",
            ItemRarity::Rare => "rare",
            ItemRarity::Legendary => "legendary",
            ItemRarity::Unique => "unique",
            ItemRarity::Mythic => "mythic",
        }
    }

    /// Whether unique rules apply to this rarity
    pub fn is_unique_tier(&self) -> bool {
        matches!(self, ItemRarity::Unique | ItemRarity::Mythic)
    }
}

impl FromStr for ItemRarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(ItemRarity::Common),
            "magic" => Ok(ItemRarity::Magic),
            "rare" => Ok(ItemRarity::Rare),
            "legendary" => Ok(ItemRarity::Legendary),
            "unique" => Ok(ItemRarity::Unique),
            "mythic" => Ok(ItemRarity::Mythic),
            other => Err(format!("unknown rarity '{other}'")),
        }
    }
}

impl TryFrom<String> for ItemRarity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemRarity> for String {
    fn from(value: ItemRarity) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for ItemRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recognized affix on an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAffix {
    /// Resolved affix identifier
    pub name: AffixId,
    /// Rolled value, `None` when recognition could not read the number
    #[serde(default)]
    pub value: Option<f64>,
    /// Whether the affix rolled as a greater affix
    #[serde(default)]
    pub greater: bool,
}

impl ItemAffix {
    /// Create a new item affix
    pub fn new(name: impl Into<AffixId>, value: impl Into<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            greater: false,
        }
    }

    /// Mark the affix as a greater affix
    pub fn greater(mut self) -> Self {
        self.greater = true;
        self
    }
}

/// The aspect recognized on a unique item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAspect {
    /// Resolved aspect identifier
    pub name: AspectId,
    /// Rolled value, if the aspect has one and it was readable
    #[serde(default)]
    pub value: Option<f64>,
}

impl ItemAspect {
    /// Create a new item aspect
    pub fn new(name: impl Into<AspectId>, value: impl Into<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Sigil details: tier plus the dungeon and affix tags read off the tooltip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sigil {
    pub tier: u8,
    /// Dungeon name and sigil affixes, all as catalog slugs
    #[serde(default)]
    pub tags: Vec<SigilId>,
}

impl Sigil {
    /// Create new sigil details
    pub fn new(tier: u8, tags: impl IntoIterator<Item = SigilId>) -> Self {
        Self {
            tier,
            tags: tags.into_iter().collect(),
        }
    }
}

/// Recognized state of one in-game item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_type: ItemType,
    pub rarity: ItemRarity,
    /// Item power, `None` when recognition could not read it
    #[serde(default)]
    pub power: Option<u32>,
    /// Normal affixes
    #[serde(default)]
    pub affixes: Vec<ItemAffix>,
    /// Inherent affixes
    #[serde(default)]
    pub inherent: Vec<ItemAffix>,
    /// Aspect, present on unique items
    #[serde(default)]
    pub aspect: Option<ItemAspect>,
    /// Sigil details, present when `item_type` is sigil
    #[serde(default)]
    pub sigil: Option<Sigil>,
}

impl Item {
    /// Create a new item snapshot
    pub fn new(item_type: ItemType, rarity: ItemRarity, power: impl Into<Option<u32>>) -> Self {
        Self {
            item_type,
            rarity,
            power: power.into(),
            affixes: Vec::new(),
            inherent: Vec::new(),
            aspect: None,
            sigil: None,
        }
    }

    /// Add a normal affix
    pub fn with_affix(mut self, affix: ItemAffix) -> Self {
        self.affixes.push(affix);
        self
    }

    /// Add an inherent affix
    pub fn with_inherent(mut self, affix: ItemAffix) -> Self {
        self.inherent.push(affix);
        self
    }

    /// Set the aspect
    pub fn with_aspect(mut self, aspect: ItemAspect) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// Set the sigil details
    pub fn with_sigil(mut self, sigil: Sigil) -> Self {
        self.sigil = Some(sigil);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_slug_round_trip() {
        for item_type in [ItemType::Boots, ItemType::TwoHandedSword, ItemType::Sigil] {
            assert_eq!(item_type.as_str().parse::<ItemType>().unwrap(), item_type);
        }
        assert!("two_handed_banjo".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_rarity_tier() {
        assert!(ItemRarity::Unique.is_unique_tier());
        assert!(ItemRarity::Mythic.is_unique_tier());
        assert!(!ItemRarity::Legendary.is_unique_tier());
    }

    #[test]
    fn test_item_builder() {
        let item = Item::new(ItemType::Boots, ItemRarity::Legendary, 850)
            .with_affix(ItemAffix::new("movement_speed", 17.5).greater())
            .with_inherent(ItemAffix::new("evade_charges", 1.0));
        assert_eq!(item.power, Some(850));
        assert_eq!(item.affixes.len(), 1);
        assert!(item.affixes[0].greater);
        assert_eq!(item.inherent.len(), 1);
    }
}
