//! Non-fatal rule linting.
//!
//! The engine accepts any rule list; a rule that can never fire simply
//! contributes nothing. `validate_rules` surfaces those rules to the author
//! before they wonder why a pack extracts less than expected.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use obligo_contracts::rule::{DetectionRule, MatchType};

use crate::set::compile_pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleIssueKind {
    EmptyKeyword,
    InvalidPattern,
    DuplicateId,
    /// A term is both required and forbidden.
    ContradictoryTerms,
    /// The keyword itself contains a forbidden term.
    KeywordExcluded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleIssue {
    pub rule_id: String,
    pub kind: RuleIssueKind,
    pub message: String,
}

impl fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule_id, self.message)
    }
}

/// Lint `rules`, returning every issue found in declaration order.
pub fn validate_rules(rules: &[DetectionRule]) -> Vec<RuleIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for rule in rules {
        let mut push = |kind, message: String| {
            issues.push(RuleIssue {
                rule_id: rule.id.clone(),
                kind,
                message,
            })
        };

        if !seen.insert(rule.id.as_str()) {
            push(RuleIssueKind::DuplicateId, "rule id is used more than once".to_string());
        }

        if rule.keyword.trim().is_empty() {
            push(RuleIssueKind::EmptyKeyword, "keyword is empty".to_string());
        }

        if rule.match_type == MatchType::Regex {
            if let Err(e) = compile_pattern(&rule.keyword) {
                push(
                    RuleIssueKind::InvalidPattern,
                    format!("pattern does not compile and will never match: {e}"),
                );
            }
        }

        let required: HashSet<String> = rule.must_also_contain.iter().map(|t| t.to_lowercase()).collect();
        for term in &rule.must_not_contain {
            let term = term.to_lowercase();
            if term.is_empty() {
                continue;
            }
            if required.contains(&term) {
                push(
                    RuleIssueKind::ContradictoryTerms,
                    format!("'{term}' is both required and forbidden"),
                );
            }
            if rule.match_type != MatchType::Regex && rule.keyword.to_lowercase().contains(&term) {
                push(
                    RuleIssueKind::KeywordExcluded,
                    format!("keyword contains forbidden term '{term}'; rule can never match"),
                );
            }
        }
    }

    issues
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use obligo_contracts::rule::{DetectionRule, MatchType, Severity};

    use super::{validate_rules, RuleIssueKind};
    use crate::DEFAULT_RULES;

    fn kinds(rules: &[DetectionRule]) -> Vec<RuleIssueKind> {
        validate_rules(rules).into_iter().map(|i| i.kind).collect()
    }

    #[test]
    fn defaults_are_clean() {
        assert!(validate_rules(&DEFAULT_RULES.to_rules()).is_empty());
    }

    #[test]
    fn each_issue_kind_is_detected() {
        let rules = vec![
            DetectionRule::new("blank", " ", Severity::Low),
            DetectionRule::new("bad-regex", "[a-", Severity::High).with_match_type(MatchType::Regex),
            DetectionRule::new("dup", "shall", Severity::High),
            DetectionRule::new("dup", "must", Severity::High),
            DetectionRule::new("contradiction", "notify", Severity::High)
                .must_also_contain(["Breach"])
                .must_not_contain(["breach"]),
            DetectionRule::new("self-excluded", "shall not", Severity::High).must_not_contain(["not"]),
        ];

        assert_eq!(
            kinds(&rules),
            vec![
                RuleIssueKind::EmptyKeyword,
                RuleIssueKind::InvalidPattern,
                RuleIssueKind::DuplicateId,
                RuleIssueKind::ContradictoryTerms,
                RuleIssueKind::KeywordExcluded,
            ]
        );
    }

    #[test]
    fn issue_display_names_the_rule() {
        let issues = validate_rules(&[DetectionRule::new("blank", "", Severity::Low)]);
        assert_eq!(issues[0].to_string(), "[blank] keyword is empty");
    }
}
