//! Obligation records: the unit of extraction output.
//!
//! Records are assembled once by the extractor and never mutated afterwards.
//! Consumers that want to override a field (e.g. re-label severity in a
//! review UI) work on their own copy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rule::Severity;

/// Risk bucket derived solely from a record's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScoreCategory {
    Critical,
    High,
    Medium,
    Low,
}

impl ScoreCategory {
    /// Threshold table, evaluated high to low: ≥80, ≥60, ≥40, else LOW.
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ScoreCategory::Critical
        } else if score >= 60 {
            ScoreCategory::High
        } else if score >= 40 {
            ScoreCategory::Medium
        } else {
            ScoreCategory::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreCategory::Critical => "CRITICAL",
            ScoreCategory::High => "HIGH",
            ScoreCategory::Medium => "MEDIUM",
            ScoreCategory::Low => "LOW",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a reviewer should do with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendedAction {
    #[serde(rename = "Immediate Action")]
    ImmediateAction,
    #[serde(rename = "Review")]
    Review,
}

impl RecommendedAction {
    /// `ImmediateAction` for CRITICAL/HIGH categories or High severity.
    pub fn resolve(category: ScoreCategory, severity: Severity) -> Self {
        match (category, severity) {
            (ScoreCategory::Critical | ScoreCategory::High, _) => RecommendedAction::ImmediateAction,
            (_, Severity::High) => RecommendedAction::ImmediateAction,
            _ => RecommendedAction::Review,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecommendedAction::ImmediateAction => "Immediate Action",
            RecommendedAction::Review => "Review",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean signals detected while scoring. Keys are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreFlags {
    pub penalty: bool,
    pub mandatory: bool,
    pub breach: bool,
    pub enforcement: bool,
}

/// One extracted obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationRecord {
    /// Sequential id within one parse call, e.g. `"rule-001"`.
    pub control_id: String,
    /// Whitespace-normalized candidate sentence.
    pub text: String,
    /// Lower-cased trigger term (rule keyword or heuristic match).
    pub modal_verb: Option<String>,
    pub severity: Severity,
    /// Always within `0..=100`.
    pub score: u8,
    pub category: ScoreCategory,
    /// Score buildup in evaluation order.
    pub score_reasons: Vec<String>,
    pub score_flags: ScoreFlags,
    pub action: RecommendedAction,
}
