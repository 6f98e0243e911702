//! The built-in detection rules.
//!
//! `DEFAULT_RULES` is shared, read-only process state. Callers that want a
//! variation start from `RuleSet::default_rules()` (a fresh copy) or use the
//! copy-returning helpers on `RuleSet`.

use once_cell::sync::Lazy;

use obligo_contracts::rule::{DetectionRule, MatchType, Severity};

use crate::set::RuleSet;

/// `(id, keyword, severity)` for each default rule, in order. All are
/// enabled `contains` rules.
const DEFAULT_RULE_TABLE: [(&str, &str, Severity); 6] = [
    ("shall", "shall", Severity::High),
    ("must", "must", Severity::High),
    ("prohibited", "prohibited", Severity::High),
    ("required", "required", Severity::Medium),
    ("should", "should", Severity::Low),
    ("may", "may", Severity::Low),
];

/// Shared default rule set. Never mutated.
pub static DEFAULT_RULES: Lazy<RuleSet> = Lazy::new(RuleSet::default_rules);

pub(crate) fn default_rule_list() -> Vec<DetectionRule> {
    DEFAULT_RULE_TABLE
        .iter()
        .map(|(id, keyword, severity)| DetectionRule::new(*id, *keyword, *severity))
        .collect()
}

/// True when `rules` is structurally the default set: same count, every
/// default id present, keyword/severity/match type equal
/// (case-insensitively), and nothing disabled.
///
/// Calling layers use this to decide whether a caller-supplied list is
/// really "custom" or just the defaults echoed back.
pub fn is_default_rules(rules: &[DetectionRule]) -> bool {
    if rules.len() != DEFAULT_RULE_TABLE.len() {
        return false;
    }

    let each_rule_is_a_default = rules.iter().all(|rule| {
        DEFAULT_RULE_TABLE.iter().any(|(id, keyword, severity)| {
            rule.id == *id
                && rule.keyword.to_lowercase() == keyword.to_lowercase()
                && rule.severity == *severity
                && rule.match_type == MatchType::Contains
                && rule.enabled
        })
    });

    let every_default_present = DEFAULT_RULE_TABLE
        .iter()
        .all(|(id, _, _)| rules.iter().any(|rule| rule.id == *id));

    each_rule_is_a_default && every_default_present
}

// ── Tests ─────────────────────────────────────────────────────────────────────
