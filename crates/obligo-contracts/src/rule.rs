//! Detection rule types.
//!
//! A `DetectionRule` is a declarative matcher that maps a keyword or pattern
//! to a severity. Rules are plain data here; compiling and evaluating them is
//! the job of `obligo-rules`.
//!
//! Example in TOML:
//! ```toml
//! [[rules]]
//! id = "breach-notice"
//! keyword = "notify"
//! severity = "critical"
//! match_type = "contains"
//! must_also_contain = ["breach"]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity label attached to rules and resolved for each obligation.
///
/// Parsing is case-insensitive. `"any"` and any unrecognized label
/// normalize to `Unknown`, so a rule never fails to load because of its
/// severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Severity {
    /// Precedence rank: lower is more severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Unknown => 4,
        }
    }

    /// Title-cased label, e.g. `"High"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Unknown => "Unknown",
        }
    }

    /// Parse a label case-insensitively; anything unrecognized is `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        Severity::parse(&label)
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule's `keyword` is compared against a sentence.
///
/// All comparisons are case-insensitive. An unrecognized `match_type` string
/// falls back to `Contains`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchType {
    /// Substring anywhere in the sentence.
    #[default]
    Contains,
    /// Whole trimmed sentence equals the keyword.
    Exact,
    /// Trimmed sentence starts with the keyword.
    StartsWith,
    /// Keyword is a regular expression searched anywhere in the sentence.
    Regex,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Contains => "contains",
            MatchType::Exact => "exact",
            MatchType::StartsWith => "startswith",
            MatchType::Regex => "regex",
        }
    }

    pub fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "exact" => MatchType::Exact,
            "startswith" => MatchType::StartsWith,
            "regex" => MatchType::Regex,
            _ => MatchType::Contains,
        }
    }
}

impl From<String> for MatchType {
    fn from(label: String) -> Self {
        MatchType::parse(&label)
    }
}

impl From<MatchType> for String {
    fn from(match_type: MatchType) -> Self {
        match_type.as_str().to_string()
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_enabled() -> bool {
    true
}

/// A single detection rule.
///
/// Rules never mutate once handed to the engine. Derived rule sets are built
/// by copying (see `RuleSet::with_rule` and friends in `obligo-rules`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRule {
    /// Unique key within a rule set. Used in reports and validation output.
    pub id: String,

    /// Literal term or pattern, interpreted according to `match_type`.
    #[serde(default)]
    pub keyword: String,

    /// Severity assigned to sentences this rule matches.
    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub match_type: MatchType,

    /// Disabled rules never match.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Every term listed here must also appear for the rule to fire.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_also_contain: Vec<String>,

    /// Any term listed here suppresses the match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not_contain: Vec<String>,
}

impl DetectionRule {
    /// Build an enabled `contains` rule with no context terms.
    pub fn new(id: impl Into<String>, keyword: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            keyword: keyword.into(),
            severity,
            match_type: MatchType::Contains,
            enabled: true,
            must_also_contain: Vec::new(),
            must_not_contain: Vec::new(),
        }
    }

    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn must_also_contain<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.must_also_contain = terms.into_iter().map(Into::into).collect();
        self
    }

    pub fn must_not_contain<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.must_not_contain = terms.into_iter().map(Into::into).collect();
        self
    }
}
