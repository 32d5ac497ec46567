//! First-match-wins decision across an ordered profile list
//!
//! Profiles are walked in user-configured order, filter sets and named
//! rules in document order; the first rule that matches wins and nothing
//! after it is evaluated. Which rule family applies is decided by the
//! snapshot itself: sigil items see sigil rules, unique and mythic items
//! see unique rules, everything else sees the affix filter sets.
//!
//! An evaluation input error (unreadable snapshot field) counts as no
//! match for that rule only; the walk continues and the error is recorded
//! on the decision so the caller can log which rules were skipped.

use crate::{Error, Item, ItemType, Profile, UniqueRule};

/// A rule skipped because the snapshot was missing data it depends on
#[derive(Debug, Clone, PartialEq)]
pub struct RuleError {
    pub profile: String,
    pub rule: String,
    pub error: Error,
}

/// Final classification of one item
///
/// When nothing matched, `keep` is false and no identity is set; what to do
/// with unmatched items (leave as-is, mark junk) is the caller's policy.
/// Rules that could not be evaluated are listed in `errors` regardless of
/// the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub keep: bool,
    /// Name of the winning profile
    pub profile: Option<String>,
    /// Name of the winning rule within that profile
    pub rule: Option<String>,
    /// Rules skipped over an unreadable snapshot field, in walk order
    pub errors: Vec<RuleError>,
}

impl Decision {
    /// Keep, attributed to the given profile and rule
    pub fn keep(profile: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            keep: true,
            profile: Some(profile.into()),
            rule: Some(rule.into()),
            errors: Vec::new(),
        }
    }

    /// No rule matched
    pub fn discard() -> Self {
        Self {
            keep: false,
            profile: None,
            rule: None,
            errors: Vec::new(),
        }
    }

    fn with_errors(mut self, errors: Vec<RuleError>) -> Self {
        self.errors = errors;
        self
    }
}

fn unique_label(rule: &UniqueRule, index: usize) -> String {
    match &rule.aspect {
        Some(aspect) => format!("uniques.{}", aspect.name),
        None => format!("uniques[{index}]"),
    }
}

/// Classify one item against the profiles, in order, first match wins
pub fn decide(profiles: &[Profile], item: &Item) -> Decision {
    let mut errors = Vec::new();

    if item.item_type == ItemType::Sigil {
        for profile in profiles {
            if let Some(rule) = &profile.sigils {
                match rule.evaluate(item) {
                    Ok(result) if result.matched => {
                        return Decision::keep(profile.name.as_str(), "sigils")
                            .with_errors(errors);
                    }
                    Ok(_) => {}
                    Err(error) => errors.push(RuleError {
                        profile: profile.name.clone(),
                        rule: "sigils".to_owned(),
                        error,
                    }),
                }
            }
        }
        return Decision::discard().with_errors(errors);
    }

    if item.rarity.is_unique_tier() {
        for profile in profiles {
            for (index, rule) in profile.uniques.iter().enumerate() {
                match rule.evaluate(item) {
                    Ok(result) if result.matched => {
                        return Decision::keep(profile.name.as_str(), unique_label(rule, index))
                            .with_errors(errors);
                    }
                    Ok(_) => {}
                    Err(error) => errors.push(RuleError {
                        profile: profile.name.clone(),
                        rule: unique_label(rule, index),
                        error,
                    }),
                }
            }
        }
        return Decision::discard().with_errors(errors);
    }

    for profile in profiles {
        for set in &profile.affixes {
            for (name, rule) in set.iter() {
                match rule.evaluate(item) {
                    Ok(result) if result.matched => {
                        return Decision::keep(profile.name.as_str(), name.as_str())
                            .with_errors(errors);
                    }
                    Ok(_) => {}
                    Err(error) => errors.push(RuleError {
                        profile: profile.name.clone(),
                        rule: name.clone(),
                        error,
                    }),
                }
            }
        }
    }
    Decision::discard().with_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AspectRule, FilterSet, Item, ItemAffix, ItemAspect, ItemRarity, ItemRule, Sigil,
        SigilCondition, SigilId, SigilRule, UniqueRule,
    };

    fn profile_with_rule(profile_name: &str, rule_name: &str, rule: ItemRule) -> Profile {
        Profile {
            name: profile_name.to_owned(),
            affixes: vec![[(rule_name, rule)].into_iter().collect::<FilterSet>()],
            ..Profile::default()
        }
    }

    #[test]
    fn test_first_profile_wins() {
        // Both profiles match everything; the first one must be reported.
        let p1 = profile_with_rule("p1", "anything", ItemRule::default());
        let p2 = profile_with_rule("p2", "also_anything", ItemRule::default());
        let item = Item::new(ItemType::Boots, ItemRarity::Legendary, 800);

        let decision = decide(&[p1, p2], &item);
        assert!(decision.keep);
        assert_eq!(decision.profile.as_deref(), Some("p1"));
        assert_eq!(decision.rule.as_deref(), Some("anything"));
    }

    #[test]
    fn test_rules_tried_in_document_order() {
        let profile = Profile {
            name: "p".to_owned(),
            affixes: vec![[
                (
                    "high_power",
                    ItemRule {
                        min_power: 900,
                        ..ItemRule::default()
                    },
                ),
                ("fallback", ItemRule::default()),
            ]
            .into_iter()
            .collect::<FilterSet>()],
            ..Profile::default()
        };
        let item = Item::new(ItemType::Boots, ItemRarity::Legendary, 800);
        let decision = decide(&[profile], &item);
        assert_eq!(decision.rule.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_no_match_discards_without_identity() {
        let profile = profile_with_rule(
            "p",
            "high_power",
            ItemRule {
                min_power: 900,
                ..ItemRule::default()
            },
        );
        let item = Item::new(ItemType::Boots, ItemRarity::Legendary, 800);
        let decision = decide(&[profile], &item);
        assert_eq!(decision, Decision::discard());
    }

    #[test]
    fn test_input_error_degrades_to_no_match() {
        // First rule needs the power the snapshot is missing; the second
        // has no power floor and still wins.
        let strict = profile_with_rule(
            "strict",
            "needs_power",
            ItemRule {
                min_power: 800,
                ..ItemRule::default()
            },
        );
        let lenient = profile_with_rule("lenient", "any", ItemRule::default());
        let unread = Item::new(ItemType::Boots, ItemRarity::Legendary, None);

        let decision = decide(&[strict, lenient], &unread);
        assert_eq!(decision.profile.as_deref(), Some("lenient"));

        // The skipped rule is recorded so the caller can log it.
        assert_eq!(decision.errors.len(), 1);
        assert_eq!(decision.errors[0].profile, "strict");
        assert_eq!(decision.errors[0].rule, "needs_power");
        assert_eq!(
            decision.errors[0].error,
            Error::MissingPower { required: 800 }
        );
    }

    #[test]
    fn test_errors_recorded_even_when_nothing_matches() {
        let strict = profile_with_rule(
            "strict",
            "needs_power",
            ItemRule {
                item_type: vec![ItemType::Boots],
                min_power: 800,
                ..ItemRule::default()
            },
        );
        let unread = Item::new(ItemType::Boots, ItemRarity::Legendary, None);

        let decision = decide(std::slice::from_ref(&strict), &unread);
        assert!(!decision.keep);
        assert_eq!(decision.errors.len(), 1);
        assert_eq!(decision.errors[0].rule, "needs_power");
    }

    #[test]
    fn test_unique_items_only_see_unique_rules() {
        let mut profile = profile_with_rule("p", "anything", ItemRule::default());
        profile.uniques = vec![UniqueRule {
            aspect: Some(AspectRule::new("tibaults_will")),
            ..UniqueRule::default()
        }];

        let unique = Item::new(ItemType::Legs, ItemRarity::Unique, 900)
            .with_aspect(ItemAspect::new("tibaults_will", 20.0));
        let decision = decide(std::slice::from_ref(&profile), &unique);
        assert_eq!(decision.rule.as_deref(), Some("uniques.tibaults_will"));

        // A unique with a different aspect matches nothing; the affix sets
        // are never consulted for unique rarities.
        let other = Item::new(ItemType::Legs, ItemRarity::Unique, 900)
            .with_aspect(ItemAspect::new("shroud_of_false_death", 1.0));
        assert!(!decide(std::slice::from_ref(&profile), &other).keep);
    }

    #[test]
    fn test_sigils_dispatch_to_sigil_rules() {
        let mut profile = profile_with_rule("p", "anything", ItemRule::default());
        profile.sigils = Some(SigilRule {
            blacklist: vec![SigilCondition::new("cellars")],
            ..SigilRule::default()
        });

        let kept = Item::new(ItemType::Sigil, ItemRarity::Common, None)
            .with_sigil(Sigil::new(40, [SigilId::new("iron_hold")]));
        let decision = decide(std::slice::from_ref(&profile), &kept);
        assert_eq!(decision.rule.as_deref(), Some("sigils"));

        let rejected = Item::new(ItemType::Sigil, ItemRarity::Common, None)
            .with_sigil(Sigil::new(40, [SigilId::new("cellars")]));
        assert!(!decide(std::slice::from_ref(&profile), &rejected).keep);
    }

    #[test]
    fn test_affix_match_reports_profile_and_rule() {
        let rule = ItemRule {
            item_type: vec![ItemType::Boots],
            ..ItemRule::default()
        };
        let profile = profile_with_rule("speedfarm", "boots", rule);
        let item = Item::new(ItemType::Boots, ItemRarity::Rare, 400)
            .with_affix(ItemAffix::new("movement_speed", 12.0));

        let decision = decide(std::slice::from_ref(&profile), &item);
        assert_eq!(decision.profile.as_deref(), Some("speedfarm"));
        assert_eq!(decision.rule.as_deref(), Some("boots"));
    }
}
