//! Constraint evaluation: one rule against one item snapshot
//!
//! Evaluation is pure and synchronous; it performs no I/O and never touches
//! the catalog. The only errors are malformed snapshots (an unreadable
//! number a rule actually depends on); the resolver degrades those to
//! "no match".

use crate::{
    AffixId, AffixPool, AffixRule, AspectRule, Error, Item, ItemAffix, ItemAspect, ItemRule,
    ItemType, Result, Sigil, SigilCondition, SigilPriority, SigilRule, UniqueRule,
};

/// Outcome of evaluating one rule against one item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    pub matched: bool,
    /// Names of the affix rules that found a backing item affix, used for
    /// caller-side reporting
    pub matched_affixes: Vec<AffixId>,
}

impl MatchResult {
    /// A non-match with no detail
    pub fn no_match() -> Self {
        Self::default()
    }

    fn matched(matched_affixes: Vec<AffixId>) -> Self {
        Self {
            matched: true,
            matched_affixes,
        }
    }
}

/// Tally of one pool against one candidate list
#[derive(Debug, Clone, Default)]
pub struct PoolResult {
    /// Rules that found a backing affix
    pub matched: Vec<AffixId>,
    /// How many of those backing affixes are greater
    pub greater: usize,
}

impl AffixRule {
    /// Whether the given item affix satisfies this rule
    ///
    /// A thresholded rule never matches an affix whose value could not be
    /// read.
    pub fn matches_affix(&self, affix: &ItemAffix) -> bool {
        if affix.name != self.name {
            return false;
        }
        match self.value {
            None => true,
            Some(threshold) => affix
                .value
                .is_some_and(|observed| self.comparison.check(observed, threshold)),
        }
    }

    fn find_match<'a>(&self, candidates: &'a [ItemAffix]) -> Option<&'a ItemAffix> {
        candidates.iter().find(|affix| self.matches_affix(affix))
    }
}

impl AspectRule {
    /// Whether the given item aspect satisfies this rule
    pub fn matches_aspect(&self, aspect: &ItemAspect) -> bool {
        if aspect.name != self.name {
            return false;
        }
        match self.value {
            None => true,
            Some(threshold) => aspect
                .value
                .is_some_and(|observed| self.comparison.check(observed, threshold)),
        }
    }
}

impl AffixPool {
    /// Tally which rules in the pool a candidate list satisfies
    ///
    /// Each rule contributes at most one match; matching is per rule, not
    /// per item affix.
    pub fn evaluate(&self, candidates: &[ItemAffix]) -> PoolResult {
        let mut result = PoolResult::default();
        for rule in &self.rules {
            if let Some(hit) = rule.find_match(candidates) {
                result.matched.push(rule.name.clone());
                if hit.greater {
                    result.greater += 1;
                }
            }
        }
        result
    }

    /// Whether a tally satisfies the pool's count bounds
    pub fn is_satisfied(&self, result: &PoolResult) -> bool {
        let satisfied = result.matched.len();
        self.effective_min() <= satisfied
            && satisfied <= self.effective_max()
            && result.greater >= self.min_greater_affix_count as usize
    }
}

fn check_power(min_power: u32, item: &Item) -> Result<bool> {
    if min_power == 0 {
        return Ok(true);
    }
    let power = item.power.ok_or(Error::MissingPower { required: min_power })?;
    Ok(power >= min_power)
}

fn type_allows(allowed: &[ItemType], item: &Item) -> bool {
    allowed.is_empty() || allowed.contains(&item.item_type)
}

impl ItemRule {
    /// Evaluate this rule against an item snapshot
    ///
    /// Every pool must independently satisfy its bounds against its own
    /// candidate list, and the greater-affix total across all matched pools
    /// must reach `min_greater_affix_count`.
    pub fn evaluate(&self, item: &Item) -> Result<MatchResult> {
        if !type_allows(&self.item_type, item) || !check_power(self.min_power, item)? {
            return Ok(MatchResult::no_match());
        }

        let mut matched_affixes = Vec::new();
        let mut greater_total = 0usize;
        let pools = self
            .affix_pool
            .iter()
            .map(|pool| (pool, item.affixes.as_slice()))
            .chain(
                self.inherent_pool
                    .iter()
                    .map(|pool| (pool, item.inherent.as_slice())),
            );
        for (pool, candidates) in pools {
            let result = pool.evaluate(candidates);
            if !pool.is_satisfied(&result) {
                return Ok(MatchResult::no_match());
            }
            greater_total += result.greater;
            matched_affixes.extend(result.matched);
        }

        if greater_total < self.min_greater_affix_count as usize {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::matched(matched_affixes))
    }
}

impl UniqueRule {
    /// Evaluate this rule against a unique item snapshot
    ///
    /// All affix rules are required, and the aspect must match identity and
    /// threshold when an aspect rule is present.
    pub fn evaluate(&self, item: &Item) -> Result<MatchResult> {
        if !type_allows(&self.item_type, item) || !check_power(self.min_power, item)? {
            return Ok(MatchResult::no_match());
        }

        if let Some(aspect_rule) = &self.aspect {
            let satisfied = item
                .aspect
                .as_ref()
                .is_some_and(|aspect| aspect_rule.matches_aspect(aspect));
            if !satisfied {
                return Ok(MatchResult::no_match());
            }
        }

        let mut matched_affixes = Vec::new();
        let mut greater = 0usize;
        for rule in &self.affix {
            let Some(hit) = rule.find_match(&item.affixes) else {
                return Ok(MatchResult::no_match());
            };
            if hit.greater {
                greater += 1;
            }
            matched_affixes.push(rule.name.clone());
        }

        if greater < self.min_greater_affix_count as usize {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::matched(matched_affixes))
    }
}

impl SigilCondition {
    /// Whether the entry applies to the sigil: its name appears among the
    /// sigil's tags and so does every qualifier
    pub fn matches(&self, sigil: &Sigil) -> bool {
        sigil.tags.contains(&self.name)
            && self.condition.iter().all(|qualifier| sigil.tags.contains(qualifier))
    }
}

impl SigilRule {
    /// Evaluate the acceptance policy against a sigil snapshot
    ///
    /// The tier window is a precondition; outside it the sigil is rejected
    /// before either list is consulted.
    pub fn evaluate(&self, item: &Item) -> Result<MatchResult> {
        let sigil = item.sigil.as_ref().ok_or(Error::MissingSigil)?;
        if sigil.tier < self.min_tier || sigil.tier > self.max_tier {
            return Ok(MatchResult::no_match());
        }

        let accepted = match self.priority {
            SigilPriority::Blacklist => {
                if self.blacklist.iter().any(|entry| entry.matches(sigil)) {
                    false
                } else {
                    self.whitelist.is_empty()
                        || self.whitelist.iter().any(|entry| entry.matches(sigil))
                }
            }
            SigilPriority::Whitelist => {
                if self.whitelist.iter().any(|entry| entry.matches(sigil)) {
                    true
                } else if self.blacklist.iter().any(|entry| entry.matches(sigil)) {
                    false
                } else {
                    self.whitelist.is_empty()
                }
            }
        };

        Ok(if accepted {
            MatchResult::matched(Vec::new())
        } else {
            MatchResult::no_match()
        })
    }
}
