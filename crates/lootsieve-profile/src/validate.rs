//! Profile validation against the game-data catalog
//!
//! Shape checking is serde's job during parsing; this pass resolves every
//! name reference against the injected [`Catalog`] and enforces the
//! cross-field invariants. All problems in a document are collected and
//! reported together rather than stopping at the first.

use crate::error::{Error, Result, ValidationIssue};
use lootsieve_core::{
    AffixPool, AffixRule, Catalog, ItemRule, Profile, SigilCondition, SigilRule, UniqueRule,
    MAX_SIGIL_TIER,
};

/// Validate one parsed profile against the catalog
pub fn validate_profile(profile: &Profile, catalog: &dyn Catalog) -> Result<()> {
    let mut issues = Vec::new();

    for (set_index, set) in profile.affixes.iter().enumerate() {
        for (rule_name, rule) in set.iter() {
            let path = format!("affixes[{set_index}].{rule_name}");
            check_item_rule(rule, &path, catalog, &mut issues);
        }
    }
    if let Some(sigils) = &profile.sigils {
        check_sigil_rule(sigils, "sigils", catalog, &mut issues);
    }
    for (index, unique) in profile.uniques.iter().enumerate() {
        check_unique_rule(unique, &format!("uniques[{index}]"), catalog, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation {
            profile: profile.name.clone(),
            issues,
        })
    }
}

fn check_item_rule(
    rule: &ItemRule,
    path: &str,
    catalog: &dyn Catalog,
    issues: &mut Vec<ValidationIssue>,
) {
    if rule.min_greater_affix_count > 3 {
        issues.push(ValidationIssue::OutOfRange {
            path: format!("{path}.min_greater_affix_count"),
            message: "must be in [0, 3]".to_owned(),
        });
    }
    for (index, pool) in rule.affix_pool.iter().enumerate() {
        check_pool(pool, &format!("{path}.affix_pool[{index}]"), catalog, issues);
    }
    for (index, pool) in rule.inherent_pool.iter().enumerate() {
        check_pool(pool, &format!("{path}.inherent_pool[{index}]"), catalog, issues);
    }
}

fn check_pool(
    pool: &AffixPool,
    path: &str,
    catalog: &dyn Catalog,
    issues: &mut Vec<ValidationIssue>,
) {
    if pool.rules.is_empty() {
        issues.push(ValidationIssue::Invariant {
            path: format!("{path}.rules"),
            message: "must not be empty".to_owned(),
        });
    }
    if pool.effective_min() > pool.effective_max() {
        issues.push(ValidationIssue::Invariant {
            path: path.to_owned(),
            message: "min_count must not exceed max_count".to_owned(),
        });
    }
    for (index, rule) in pool.rules.iter().enumerate() {
        check_affix_rule(rule, &format!("{path}.rules[{index}]"), catalog, issues);
    }
}

fn check_affix_rule(
    rule: &AffixRule,
    path: &str,
    catalog: &dyn Catalog,
    issues: &mut Vec<ValidationIssue>,
) {
    if !catalog.has_affix(&rule.name) {
        issues.push(ValidationIssue::UnresolvedName {
            path: path.to_owned(),
            kind: "affix",
            name: rule.name.to_string(),
        });
    }
}

fn check_sigil_rule(
    rule: &SigilRule,
    path: &str,
    catalog: &dyn Catalog,
    issues: &mut Vec<ValidationIssue>,
) {
    if rule.min_tier > MAX_SIGIL_TIER || rule.max_tier > MAX_SIGIL_TIER {
        issues.push(ValidationIssue::OutOfRange {
            path: path.to_owned(),
            message: format!("tiers must be in [0, {MAX_SIGIL_TIER}]"),
        });
    }
    if rule.min_tier > rule.max_tier {
        issues.push(ValidationIssue::Invariant {
            path: path.to_owned(),
            message: "min_tier must not exceed max_tier".to_owned(),
        });
    }
    for entry in &rule.blacklist {
        if rule.whitelist.contains(entry) {
            issues.push(ValidationIssue::Invariant {
                path: path.to_owned(),
                message: format!("entry '{}' appears in both blacklist and whitelist", entry.name),
            });
        }
    }
    for (index, entry) in rule.blacklist.iter().enumerate() {
        check_sigil_condition(entry, &format!("{path}.blacklist[{index}]"), catalog, issues);
    }
    for (index, entry) in rule.whitelist.iter().enumerate() {
        check_sigil_condition(entry, &format!("{path}.whitelist[{index}]"), catalog, issues);
    }
}

fn check_sigil_condition(
    entry: &SigilCondition,
    path: &str,
    catalog: &dyn Catalog,
    issues: &mut Vec<ValidationIssue>,
) {
    if !catalog.has_sigil_entry(&entry.name) {
        issues.push(ValidationIssue::UnresolvedName {
            path: path.to_owned(),
            kind: "dungeon or sigil affix",
            name: entry.name.to_string(),
        });
    }
    for qualifier in &entry.condition {
        if !catalog.has_sigil_entry(qualifier) {
            issues.push(ValidationIssue::UnresolvedName {
                path: format!("{path}.condition"),
                kind: "dungeon or sigil affix",
                name: qualifier.to_string(),
            });
        }
    }
}

fn check_unique_rule(
    rule: &UniqueRule,
    path: &str,
    catalog: &dyn Catalog,
    issues: &mut Vec<ValidationIssue>,
) {
    for (index, affix) in rule.affix.iter().enumerate() {
        check_affix_rule(affix, &format!("{path}.affix[{index}]"), catalog, issues);
    }
    if let Some(aspect) = &rule.aspect {
        if !catalog.has_aspect(&aspect.name) {
            issues.push(ValidationIssue::UnresolvedName {
                path: format!("{path}.aspect"),
                kind: "aspect",
                name: aspect.name.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootsieve_core::GameData;

    fn catalog() -> GameData {
        GameData::new()
            .with_affix("movement_speed", "Movement Speed")
            .with_affix("maximum_life", "Maximum Life")
            .with_aspect("tibaults_will", "Tibault's Will")
            .with_sigil_entry("cellars", "Cellars")
            .with_sigil_entry("armor_breakers", "Armor Breakers")
    }

    fn parse(content: &str) -> Profile {
        ron::from_str(content).unwrap()
    }

    #[test]
    fn test_valid_profile_passes() {
        let profile = parse(
            r#"(
                name: "ok",
                affixes: [{"any": (affix_pool: [(rules: ["movement_speed"])])}],
                sigils: Some((blacklist: [["cellars", "armor_breakers"]])),
                uniques: [(aspect: Some("tibaults_will"))],
            )"#,
        );
        assert!(validate_profile(&profile, &catalog()).is_ok());
    }

    #[test]
    fn test_all_unresolved_names_reported() {
        let profile = parse(
            r#"(
                name: "bad",
                affixes: [{"any": (affix_pool: [(rules: ["crit_damag", "maximum_life", "atack_speed"])])}],
            )"#,
        );
        let err = validate_profile(&profile, &catalog()).unwrap_err();
        let Error::Validation { profile, issues } = err else {
            panic!("expected validation error");
        };
        assert_eq!(profile, "bad");
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            &issues[0],
            ValidationIssue::UnresolvedName { name, .. } if name == "crit_damag"
        ));
        assert!(matches!(
            &issues[1],
            ValidationIssue::UnresolvedName { name, .. } if name == "atack_speed"
        ));
    }

    #[test]
    fn test_empty_pool_rejected() {
        // Explicit zero bounds do not excuse an empty rule list.
        let profile = parse(
            r#"(
                name: "empty",
                affixes: [{"any": (affix_pool: [(rules: [], min_count: Some(0), max_count: Some(0))])}],
            )"#,
        );
        let err = validate_profile(&profile, &catalog()).unwrap_err();
        let Error::Validation { issues, .. } = err else {
            panic!("expected validation error");
        };
        assert!(matches!(&issues[0], ValidationIssue::Invariant { .. }));
    }

    #[test]
    fn test_min_count_above_max_count_rejected() {
        let profile = parse(
            r#"(
                name: "bounds",
                affixes: [{"any": (affix_pool: [(
                    rules: ["movement_speed"],
                    min_count: Some(2),
                    max_count: Some(1),
                )])}],
            )"#,
        );
        assert!(validate_profile(&profile, &catalog()).is_err());
    }

    #[test]
    fn test_greater_affix_count_domain() {
        let profile = parse(
            r#"(
                name: "greedy",
                affixes: [{"any": (min_greater_affix_count: 4)}],
            )"#,
        );
        let err = validate_profile(&profile, &catalog()).unwrap_err();
        let Error::Validation { issues, .. } = err else {
            panic!("expected validation error");
        };
        assert!(matches!(&issues[0], ValidationIssue::OutOfRange { .. }));
    }

    #[test]
    fn test_blacklist_whitelist_overlap_rejected() {
        let profile = parse(
            r#"(
                name: "overlap",
                sigils: Some((blacklist: ["cellars"], whitelist: ["cellars", "armor_breakers"])),
            )"#,
        );
        let err = validate_profile(&profile, &catalog()).unwrap_err();
        let Error::Validation { issues, .. } = err else {
            panic!("expected validation error");
        };
        assert!(matches!(&issues[0], ValidationIssue::Invariant { .. }));
    }

    #[test]
    fn test_sigil_tier_window() {
        let inverted = parse(r#"(name: "t", sigils: Some((min_tier: 80, max_tier: 40)))"#);
        assert!(validate_profile(&inverted, &catalog()).is_err());

        let window = parse(r#"(name: "t", sigils: Some((min_tier: 40, max_tier: 80)))"#);
        assert!(validate_profile(&window, &catalog()).is_ok());
    }

    #[test]
    fn test_unknown_sigil_qualifier_reported() {
        let profile = parse(
            r#"(name: "s", sigils: Some((blacklist: [["cellars", "lightning_dmg"]])))"#,
        );
        let err = validate_profile(&profile, &catalog()).unwrap_err();
        let Error::Validation { issues, .. } = err else {
            panic!("expected validation error");
        };
        assert!(matches!(
            &issues[0],
            ValidationIssue::UnresolvedName { name, .. } if name == "lightning_dmg"
        ));
    }

    #[test]
    fn test_unknown_aspect_reported() {
        let profile = parse(r#"(name: "u", uniques: [(aspect: Some("aspect_of_typo"))])"#);
        assert!(validate_profile(&profile, &catalog()).is_err());
    }
}
