//! Risk scoring.
//!
//! A score starts from the severity base and adds fixed increments for
//! penalty language, mandatory modals, breach vocabulary and cited
//! enforcement precedents. Every step appends one reason string, so the
//! reasons read as the score's buildup in evaluation order.

use obligo_contracts::{
    record::{ScoreCategory, ScoreFlags},
    rule::{DetectionRule, Severity},
};

use crate::lexicon::{contains_any, BREACH_TERMS, ENFORCEMENT_PRECEDENTS, MANDATORY_MODAL, PENALTY_TERMS};

pub const PENALTY_BONUS: u32 = 20;
pub const MANDATORY_BONUS: u32 = 15;
pub const BREACH_BONUS: u32 = 10;
pub const ENFORCEMENT_BONUS: u32 = 10;
pub const MAX_SCORE: u32 = 100;

/// Starting score for each severity.
pub fn base_score(severity: Severity) -> u32 {
    match severity {
        Severity::Critical => 80,
        Severity::High => 65,
        Severity::Medium => 45,
        Severity::Low => 25,
        Severity::Unknown => 15,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskScore {
    /// Clamped to `0..=100`.
    pub score: u8,
    pub category: ScoreCategory,
    pub flags: ScoreFlags,
    pub reasons: Vec<String>,
}

pub fn score(sentence: &str, severity: Severity, matched: &[&DetectionRule]) -> RiskScore {
    let lower = sentence.to_lowercase();

    let flags = ScoreFlags {
        penalty: contains_any(&lower, &PENALTY_TERMS),
        mandatory: MANDATORY_MODAL.is_match(&lower),
        breach: contains_any(&lower, &BREACH_TERMS),
        enforcement: contains_any(&lower, &ENFORCEMENT_PRECEDENTS),
    };

    let mut total = base_score(severity);
    let mut reasons = vec![format!("+base severity ({severity})")];

    if !matched.is_empty() {
        let described: Vec<String> = matched
            .iter()
            .map(|r| format!("{} [{}]", r.keyword, r.severity))
            .collect();
        reasons.push(format!("Matched rules: {}", described.join(", ")));
    }

    let increments = [
        (flags.penalty, PENALTY_BONUS, "penalty keyword"),
        (flags.mandatory, MANDATORY_BONUS, "mandatory (shall/must)"),
        (flags.breach, BREACH_BONUS, "data/security breach"),
        (flags.enforcement, ENFORCEMENT_BONUS, "PDPC enforcement mention"),
    ];
    for (hit, bonus, label) in increments {
        if hit {
            total += bonus;
            reasons.push(format!("+{bonus} {label}"));
        }
    }

    let score = total.min(MAX_SCORE) as u8;
    RiskScore {
        score,
        category: ScoreCategory::from_score(score),
        flags,
        reasons,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
