//! Lootsieve Core - rule tree and constraint-matching engine
//!
//! This crate provides the core types and matching logic for the loot
//! filter:
//! - Item snapshot types as produced by recognition (`Item`, `ItemAffix`)
//! - Catalog surface for name resolution (`Catalog`, `GameData`)
//! - The validated rule tree (`Profile`, `ItemRule`, `AffixPool`, ...)
//! - Constraint evaluation (`MatchResult`) and the first-match-wins
//!   resolver (`decide`)
//!
//! The engine is a pure function from (profiles, snapshot) to a decision:
//! no I/O, no shared state, nothing to cancel. Document loading and
//! validation live in the companion profile crate.

mod catalog;
mod decide;
mod error;
mod eval;
mod identity;
mod item;
mod rules;

pub use catalog::{Catalog, GameData};
pub use decide::{decide, Decision, RuleError};
pub use error::{Error, Result};
pub use eval::{MatchResult, PoolResult};
pub use identity::{AffixId, AspectId, SigilId};
pub use item::{Item, ItemAffix, ItemAspect, ItemRarity, ItemType, Sigil};
pub use rules::{
    AffixPool, AffixRule, AspectRule, Comparison, FilterSet, ItemRule, Profile, SigilCondition,
    SigilPriority, SigilRule, UniqueRule, MAX_SIGIL_TIER,
};
