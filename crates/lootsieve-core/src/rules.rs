//! The rule tree for filter profiles
//!
//! Profiles are authored as RON documents and deserialized straight into
//! these types. Shorthand shapes (a bare name, a positional list) are
//! normalized by hand-written deserializers before any structural checking;
//! everything else is strict serde with unknown fields rejected. Name
//! resolution and cross-field invariants are a separate pass, see the
//! profile crate's validator.
//!
//! Whether a field was explicitly set matters for the pool count bounds:
//! `min_count`/`max_count` stay `None` when the author omitted them, the
//! inferred all-entries-required bounds are computed by
//! [`AffixPool::effective_min`]/[`effective_max`](AffixPool::effective_max),
//! and serialization omits the `None`s so an inferred bound never turns
//! into an explicit one on round-trip.

use crate::{AffixId, AspectId, ItemType, SigilId};
use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Highest sigil tier the game produces
pub const MAX_SIGIL_TIER: u8 = 100;

/// Direction of a value threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Comparison {
    /// Observed value must be at least the threshold
    #[default]
    Larger,
    /// Observed value must be at most the threshold
    Smaller,
}

impl Comparison {
    /// The slug used in profile documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Larger => "larger",
            Comparison::Smaller => "smaller",
        }
    }

    /// Apply the comparison to an observed value and a threshold
    pub fn check(&self, observed: f64, threshold: f64) -> bool {
        match self {
            Comparison::Larger => observed >= threshold,
            Comparison::Smaller => observed <= threshold,
        }
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "larger" => Ok(Comparison::Larger),
            "smaller" => Ok(Comparison::Smaller),
            other => Err(format!("unknown comparison '{other}', expected 'larger' or 'smaller'")),
        }
    }
}

impl TryFrom<String> for Comparison {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Comparison> for String {
    fn from(value: Comparison) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized (name, value, comparison) triple shared by affix and aspect rules
struct RuleParts {
    name: String,
    value: Option<f64>,
    comparison: Comparison,
}

/// Accepts `"name"`, `["name"]`, `["name", value]`, `["name", value, "comparison"]`
/// or the map form with exactly the keys `name`, `value`, `comparison`.
fn deserialize_rule_parts<'de, D>(deserializer: D, what: &'static str) -> Result<RuleParts, D::Error>
where
    D: Deserializer<'de>,
{
    struct PartsVisitor(&'static str);

    impl<'de> Visitor<'de> for PartsVisitor {
        type Value = RuleParts;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a {} name, a [name, value, comparison] list or a map", self.0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(RuleParts {
                name: v.to_owned(),
                value: None,
                comparison: Comparison::default(),
            })
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let name: String = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(0, &self))?;
            let value: Option<f64> = seq.next_element()?;
            let comparison = match seq.next_element::<String>()? {
                Some(s) => s.parse().map_err(de::Error::custom)?,
                None => Comparison::default(),
            };
            if seq.next_element::<de::IgnoredAny>()?.is_some() {
                return Err(de::Error::invalid_length(4, &self));
            }
            Ok(RuleParts { name, value, comparison })
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            const FIELDS: &[&str] = &["name", "value", "comparison"];
            let mut name: Option<String> = None;
            let mut value: Option<f64> = None;
            let mut comparison: Option<Comparison> = None;
            while let Some(key) = map.next_key::<String>()? {
                match key.as_str() {
                    "name" => {
                        if name.is_some() {
                            return Err(de::Error::duplicate_field("name"));
                        }
                        name = Some(map.next_value()?);
                    }
                    "value" => {
                        if value.is_some() {
                            return Err(de::Error::duplicate_field("value"));
                        }
                        value = Some(map.next_value()?);
                    }
                    "comparison" => {
                        if comparison.is_some() {
                            return Err(de::Error::duplicate_field("comparison"));
                        }
                        comparison = Some(map.next_value()?);
                    }
                    other => return Err(de::Error::unknown_field(other, FIELDS)),
                }
            }
            let name = name.ok_or_else(|| de::Error::missing_field("name"))?;
            Ok(RuleParts {
                name,
                value,
                comparison: comparison.unwrap_or_default(),
            })
        }
    }

    deserializer.deserialize_any(PartsVisitor(what))
}

fn serialize_rule_parts<S>(
    serializer: S,
    name: &str,
    value: Option<f64>,
    comparison: Comparison,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let len = 1 + usize::from(value.is_some()) + usize::from(comparison != Comparison::default());
    let mut map = serializer.serialize_map(Some(len))?;
    map.serialize_entry("name", name)?;
    if let Some(value) = value {
        map.serialize_entry("value", &value)?;
    }
    if comparison != Comparison::default() {
        map.serialize_entry("comparison", &comparison)?;
    }
    map.end()
}

/// One named affix requirement, optionally thresholded
#[derive(Debug, Clone, PartialEq)]
pub struct AffixRule {
    pub name: AffixId,
    pub value: Option<f64>,
    pub comparison: Comparison,
}

impl AffixRule {
    /// Requirement on presence only
    pub fn new(name: impl Into<AffixId>) -> Self {
        Self {
            name: name.into(),
            value: None,
            comparison: Comparison::default(),
        }
    }

    /// Requirement with a value threshold
    pub fn with_threshold(name: impl Into<AffixId>, value: f64, comparison: Comparison) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            comparison,
        }
    }
}

impl<'de> Deserialize<'de> for AffixRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = deserialize_rule_parts(deserializer, "affix")?;
        Ok(Self {
            name: AffixId::new(parts.name),
            value: parts.value,
            comparison: parts.comparison,
        })
    }
}

impl Serialize for AffixRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_rule_parts(serializer, self.name.as_str(), self.value, self.comparison)
    }
}

/// Requirement on a unique item's aspect, same shorthand as [`AffixRule`]
#[derive(Debug, Clone, PartialEq)]
pub struct AspectRule {
    pub name: AspectId,
    pub value: Option<f64>,
    pub comparison: Comparison,
}

impl AspectRule {
    /// Requirement on aspect identity only
    pub fn new(name: impl Into<AspectId>) -> Self {
        Self {
            name: name.into(),
            value: None,
            comparison: Comparison::default(),
        }
    }

    /// Requirement with a value threshold
    pub fn with_threshold(name: impl Into<AspectId>, value: f64, comparison: Comparison) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            comparison,
        }
    }
}

impl<'de> Deserialize<'de> for AspectRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = deserialize_rule_parts(deserializer, "aspect")?;
        Ok(Self {
            name: AspectId::new(parts.name),
            value: parts.value,
            comparison: parts.comparison,
        })
    }
}

impl Serialize for AspectRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_rule_parts(serializer, self.name.as_str(), self.value, self.comparison)
    }
}

fn is_zero_u8(v: &u8) -> bool {
    *v == 0
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

/// A counted group of affix requirements evaluated as a unit
///
/// With neither bound set, all entries are required: the effective bounds
/// are both `rules.len()`. This inferred state stays distinguishable from
/// explicitly equal bounds and is not re-serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AffixPool {
    pub rules: Vec<AffixRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub min_greater_affix_count: u32,
}

impl AffixPool {
    /// Pool over the given rules with inferred (exact-match) bounds
    pub fn exact(rules: Vec<AffixRule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Lower bound on satisfied rules, inferred as `rules.len()` when
    /// neither bound was set
    pub fn effective_min(&self) -> usize {
        match (self.min_count, self.max_count) {
            (None, None) => self.rules.len(),
            (min, _) => min.unwrap_or(0) as usize,
        }
    }

    /// Upper bound on satisfied rules, inferred as `rules.len()` when
    /// neither bound was set and unbounded when only `min_count` was set
    pub fn effective_max(&self) -> usize {
        match (self.min_count, self.max_count) {
            (None, None) => self.rules.len(),
            (_, max) => max.map_or(usize::MAX, |v| v as usize),
        }
    }
}

/// Accepts a bare value as shorthand for a one-element list
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OneOrMany<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrMany<T> {
        type Value = Vec<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a single value or a list of values")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            T::deserialize(de::value::StrDeserializer::new(v)).map(|t| vec![t])
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut items = Vec::new();
            while let Some(item) = seq.next_element()? {
                items.push(item);
            }
            Ok(items)
        }
    }

    deserializer.deserialize_any(OneOrMany(PhantomData))
}

/// Full requirement for a non-unique item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemRule {
    /// Pools matched against the item's normal affixes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affix_pool: Vec<AffixPool>,
    /// Pools matched against the item's inherent affixes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inherent_pool: Vec<AffixPool>,
    /// Allowed item types, empty for any
    #[serde(deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub item_type: Vec<ItemType>,
    /// Greater affixes required across all matched pools, 0 to 3
    #[serde(skip_serializing_if = "is_zero_u8")]
    pub min_greater_affix_count: u8,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub min_power: u32,
}

/// A profile's named rules, in document order with unique names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet(pub IndexMap<String, ItemRule>);

impl FilterSet {
    /// Iterate the named rules in document order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ItemRule> {
        self.0.iter()
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&ItemRule> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ItemRule)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, ItemRule)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for FilterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = FilterSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of rule name to item rule")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut rules = IndexMap::new();
                while let Some((name, rule)) = map.next_entry::<String, ItemRule>()? {
                    if rules.insert(name.clone(), rule).is_some() {
                        return Err(de::Error::custom(format!("duplicate rule name '{name}'")));
                    }
                }
                Ok(FilterSet(rules))
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

/// Whether the blacklist or the whitelist is consulted first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SigilPriority {
    #[default]
    Blacklist,
    Whitelist,
}

impl SigilPriority {
    /// The slug used in profile documents
    pub fn as_str(&self) -> &'static str {
        match self {
            SigilPriority::Blacklist => "blacklist",
            SigilPriority::Whitelist => "whitelist",
        }
    }
}

impl FromStr for SigilPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blacklist" => Ok(SigilPriority::Blacklist),
            "whitelist" => Ok(SigilPriority::Whitelist),
            other => Err(format!("unknown priority '{other}', expected 'blacklist' or 'whitelist'")),
        }
    }
}

impl TryFrom<String> for SigilPriority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SigilPriority> for String {
    fn from(value: SigilPriority) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for SigilPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One blacklist/whitelist entry: a dungeon or sigil affix, plus qualifier
/// tags that must all be present for the entry to apply
#[derive(Debug, Clone, PartialEq)]
pub struct SigilCondition {
    pub name: SigilId,
    pub condition: Vec<SigilId>,
}

impl SigilCondition {
    /// Entry on name only
    pub fn new(name: impl Into<SigilId>) -> Self {
        Self {
            name: name.into(),
            condition: Vec::new(),
        }
    }

    /// Entry with qualifier tags
    pub fn with_qualifiers(name: impl Into<SigilId>, condition: impl IntoIterator<Item = SigilId>) -> Self {
        Self {
            name: name.into(),
            condition: condition.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for SigilCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConditionVisitor;

        impl<'de> Visitor<'de> for ConditionVisitor {
            type Value = SigilCondition;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a sigil entry name, a [name, qualifier...] list or a map")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(SigilCondition::new(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let mut condition = Vec::new();
                while let Some(qualifier) = seq.next_element::<String>()? {
                    condition.push(SigilId::new(qualifier));
                }
                Ok(SigilCondition {
                    name: SigilId::new(name),
                    condition,
                })
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                const FIELDS: &[&str] = &["name", "condition"];
                let mut name: Option<String> = None;
                let mut condition: Option<Vec<SigilId>> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => {
                            if name.is_some() {
                                return Err(de::Error::duplicate_field("name"));
                            }
                            name = Some(map.next_value()?);
                        }
                        "condition" => {
                            if condition.is_some() {
                                return Err(de::Error::duplicate_field("condition"));
                            }
                            condition = Some(map.next_value()?);
                        }
                        other => return Err(de::Error::unknown_field(other, FIELDS)),
                    }
                }
                let name = name.ok_or_else(|| de::Error::missing_field("name"))?;
                Ok(SigilCondition {
                    name: SigilId::new(name),
                    condition: condition.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ConditionVisitor)
    }
}

impl Serialize for SigilCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(!self.condition.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("name", &self.name)?;
        if !self.condition.is_empty() {
            map.serialize_entry("condition", &self.condition)?;
        }
        map.end()
    }
}

fn is_default_priority(priority: &SigilPriority) -> bool {
    *priority == SigilPriority::default()
}

fn is_max_tier(tier: &u8) -> bool {
    *tier == MAX_SIGIL_TIER
}

/// Sigil acceptance policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigilRule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blacklist: Vec<SigilCondition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub whitelist: Vec<SigilCondition>,
    #[serde(skip_serializing_if = "is_default_priority")]
    pub priority: SigilPriority,
    #[serde(skip_serializing_if = "is_zero_u8")]
    pub min_tier: u8,
    #[serde(skip_serializing_if = "is_max_tier")]
    pub max_tier: u8,
}

impl Default for SigilRule {
    fn default() -> Self {
        Self {
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            priority: SigilPriority::default(),
            min_tier: 0,
            max_tier: MAX_SIGIL_TIER,
        }
    }
}

/// Requirement for a unique item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniqueRule {
    /// All listed affixes are required, no count range
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affix: Vec<AffixRule>,
    /// Required aspect identity, with optional threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect: Option<AspectRule>,
    /// Allowed item types, empty for any
    #[serde(deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub item_type: Vec<ItemType>,
    #[serde(skip_serializing_if = "is_zero_u8")]
    pub min_greater_affix_count: u8,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub min_power: u32,
}

/// A user-authored profile: named filter sets, sigil policy, unique rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// Profile name; the loader fills in the file stem when empty
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Filter sets tried in document order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affixes: Vec<FilterSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigils: Option<SigilRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uniques: Vec<UniqueRule>,
}
