//! Compiled rule sets and rule matching.
//!
//! A `RuleSet` wraps an ordered list of `DetectionRule`s together with any
//! regex patterns they need, compiled once at construction. Matching a
//! sentence evaluates every enabled rule; which matched rule "wins" is the
//! severity resolver's concern, not the set's.
//!
//! Rule sets are immutable. The `with_rule` / `without_rule` / `toggle`
//! helpers return a new set and leave the receiver untouched, so the shared
//! default set can never be altered through them.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use obligo_contracts::rule::{DetectionRule, MatchType, Severity};

/// Upper bound on the compiled size of a single rule's regex.
///
/// The regex engine already searches in linear time; this keeps a
/// pathological pattern from allocating an outsized automaton. Patterns
/// over the limit are treated like any other malformed pattern.
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: DetectionRule,
    keyword_lower: String,
    must_also: Vec<String>,
    must_not: Vec<String>,
    /// `Some` only for `MatchType::Regex` rules whose pattern compiled.
    pattern: Option<Regex>,
}

impl CompiledRule {
    fn compile(rule: DetectionRule) -> Self {
        let pattern = match rule.match_type {
            MatchType::Regex => compile_pattern(&rule.keyword)
                .map_err(|e| {
                    warn!(
                        rule_id = %rule.id,
                        pattern = %rule.keyword,
                        error = %e,
                        "rule pattern failed to compile; rule will never match"
                    );
                })
                .ok(),
            _ => None,
        };

        let lowered = |terms: &[String]| -> Vec<String> {
            terms
                .iter()
                .filter(|t| !t.is_empty())
                .map(|t| t.to_lowercase())
                .collect()
        };

        Self {
            keyword_lower: rule.keyword.to_lowercase(),
            must_also: lowered(&rule.must_also_contain),
            must_not: lowered(&rule.must_not_contain),
            pattern,
            rule,
        }
    }

    /// Primary keyword test only, ignoring context terms.
    fn keyword_matches(&self, text: &str, lower: &str) -> bool {
        match self.rule.match_type {
            MatchType::Contains => lower.contains(self.keyword_lower.as_str()),
            MatchType::Exact => lower.trim() == self.keyword_lower,
            MatchType::StartsWith => lower.trim().starts_with(self.keyword_lower.as_str()),
            MatchType::Regex => self.pattern.as_ref().is_some_and(|re| re.is_match(text)),
        }
    }

    /// Keyword test used for report tallies: the keyword is compared
    /// trimmed, regex rules still use the compiled pattern.
    fn tally_matches(&self, text: &str, lower: &str) -> bool {
        let keyword = self.keyword_lower.trim();
        match self.rule.match_type {
            MatchType::Contains => lower.contains(keyword),
            MatchType::Exact => lower.trim() == keyword,
            MatchType::StartsWith => lower.trim().starts_with(keyword),
            MatchType::Regex => self.pattern.as_ref().is_some_and(|re| re.is_match(text)),
        }
    }

    fn matches(&self, text: &str, lower: &str) -> bool {
        if !self.rule.enabled || !self.keyword_matches(text, lower) {
            return false;
        }
        if !self.must_also.iter().all(|t| lower.contains(t.as_str())) {
            return false;
        }
        !self.must_not.iter().any(|t| lower.contains(t.as_str()))
    }
}

/// Compile a rule pattern the way the matcher does: case-insensitive and
/// size-limited.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
}

/// Per-rule hit count over a corpus of texts, as shown in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHit {
    pub rule_id: String,
    pub keyword: String,
    pub severity: Severity,
    pub hits: usize,
}

/// An immutable, ordered set of compiled detection rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile `rules` into a set. Never fails: malformed patterns only
    /// disable the affected rule.
    pub fn new(rules: Vec<DetectionRule>) -> Self {
        let rules: Vec<CompiledRule> = rules.into_iter().map(CompiledRule::compile).collect();
        debug!(rule_count = rules.len(), "compiled rule set");
        Self { rules }
    }

    /// A fresh, owned copy of the built-in defaults.
    pub fn default_rules() -> Self {
        Self::new(crate::defaults::default_rule_list())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate the rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &DetectionRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Clone the rules out, e.g. to serialize them.
    pub fn to_rules(&self) -> Vec<DetectionRule> {
        self.rules().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&DetectionRule> {
        self.rules().find(|r| r.id == id)
    }

    /// True when this set is structurally equal to the built-in defaults.
    pub fn is_default(&self) -> bool {
        crate::defaults::is_default_rules(&self.to_rules())
    }

    /// Every enabled rule that fires on `sentence`, in declaration order.
    pub fn match_rules(&self, sentence: &str) -> Vec<&DetectionRule> {
        let lower = sentence.to_lowercase();
        self.rules
            .iter()
            .filter(|c| c.matches(sentence, &lower))
            .map(|c| &c.rule)
            .collect()
    }

    /// Count, for each enabled rule, how many `texts` its keyword matches.
    ///
    /// Context terms are ignored and rules with a blank keyword score zero,
    /// matching how report summaries tally rule coverage.
    pub fn hit_counts<'t, I>(&self, texts: I) -> Vec<RuleHit>
    where
        I: IntoIterator<Item = &'t str>,
    {
        let texts: Vec<(&str, String)> = texts.into_iter().map(|t| (t, t.to_lowercase())).collect();

        self.rules
            .iter()
            .filter(|c| c.rule.enabled)
            .map(|c| {
                let hits = if c.keyword_lower.trim().is_empty() {
                    0
                } else {
                    texts
                        .iter()
                        .filter(|(text, lower)| c.tally_matches(text, lower))
                        .count()
                };
                RuleHit {
                    rule_id: c.rule.id.clone(),
                    keyword: c.rule.keyword.clone(),
                    severity: c.rule.severity,
                    hits,
                }
            })
            .collect()
    }

    /// A new set with `rule` appended, or replacing the rule with the same id.
    pub fn with_rule(&self, rule: DetectionRule) -> Self {
        let mut rules = self.to_rules();
        match rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
        Self::new(rules)
    }

    /// A new set without the rule named `id`.
    pub fn without_rule(&self, id: &str) -> Self {
        Self::new(self.rules().filter(|r| r.id != id).cloned().collect())
    }

    /// A new set with rule `id` enabled or disabled.
    pub fn toggle(&self, id: &str, enabled: bool) -> Self {
        Self::new(
            self.rules()
                .cloned()
                .map(|r| if r.id == id { r.with_enabled(enabled) } else { r })
                .collect(),
        )
    }
}

impl From<Vec<DetectionRule>> for RuleSet {
    fn from(rules: Vec<DetectionRule>) -> Self {
        Self::new(rules)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
