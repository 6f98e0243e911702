//! Severity resolution.
//!
//! When rules matched, the most severe one wins (Critical < High < Medium <
//! Low < Unknown by rank). Equal ranks keep declaration order, so the first
//! declared rule among the most severe is the trigger. When no rule matched,
//! strict mode stops at `Unknown`; heuristic mode walks a fixed ladder of
//! high/medium/low risk words.

use obligo_contracts::rule::{DetectionRule, Severity};

use crate::filter::ExtractionMode;
use crate::lexicon::{HIGH_RISK_TERMS, LOW_RISK_TERMS, MEDIUM_RISK_TERMS};

/// Outcome of severity resolution for one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityResolution<'r> {
    pub severity: Severity,
    /// Lower-cased rule keyword or heuristic match.
    pub trigger: Option<String>,
    /// Matched rules ordered most severe first. Empty for heuristic results.
    pub matched: Vec<&'r DetectionRule>,
}

impl SeverityResolution<'_> {
    fn unresolved() -> Self {
        Self {
            severity: Severity::Unknown,
            trigger: None,
            matched: Vec::new(),
        }
    }
}

pub fn resolve_severity<'r>(
    sentence: &str,
    mut matched: Vec<&'r DetectionRule>,
    mode: ExtractionMode,
) -> SeverityResolution<'r> {
    // Stable: ties keep declaration order.
    matched.sort_by_key(|rule| rule.severity.rank());

    if let Some(top) = matched.first() {
        let keyword = top.keyword.to_lowercase();
        return SeverityResolution {
            severity: top.severity,
            trigger: (!keyword.is_empty()).then_some(keyword),
            matched,
        };
    }

    if mode.is_strict() {
        return SeverityResolution::unresolved();
    }

    let ladder = [
        (&*HIGH_RISK_TERMS, Severity::High),
        (&*MEDIUM_RISK_TERMS, Severity::Medium),
        (&*LOW_RISK_TERMS, Severity::Low),
    ];
    for (pattern, severity) in ladder {
        if let Some(m) = pattern.find(sentence) {
            return SeverityResolution {
                severity,
                trigger: Some(m.as_str().to_lowercase()),
                matched: Vec::new(),
            };
        }
    }

    SeverityResolution::unresolved()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
