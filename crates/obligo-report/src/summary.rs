//! Aggregate views over a set of extracted records.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use obligo_contracts::{
    record::{ObligationRecord, ScoreCategory},
    rule::Severity,
};

// ── Severity breakdown ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// All records, including ones that fall in no bucket.
    pub total: usize,
    pub high_pct: u32,
    pub medium_pct: u32,
    pub low_pct: u32,
}

impl SeverityBreakdown {
    /// Bucket each record by severity first, then by category.
    pub fn from_records(records: &[ObligationRecord]) -> Self {
        let mut breakdown = SeverityBreakdown {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match (record.severity, record.category) {
                (Severity::High, _) | (_, ScoreCategory::High | ScoreCategory::Critical) => breakdown.high += 1,
                (Severity::Medium, _) | (_, ScoreCategory::Medium) => breakdown.medium += 1,
                (Severity::Low, _) | (_, ScoreCategory::Low) => breakdown.low += 1,
                _ => {}
            }
        }
        breakdown.high_pct = percent(breakdown.high, breakdown.total);
        breakdown.medium_pct = percent(breakdown.medium, breakdown.total);
        breakdown.low_pct = percent(breakdown.low, breakdown.total);
        breakdown
    }
}

/// `part / total` as a whole percentage, halves rounded to even; 0 when
/// `total` is 0.
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round_ties_even() as u32
}

// ── Top items ─────────────────────────────────────────────────────────────────

pub const TOP_ITEMS: usize = 3;

fn top_by_score<F>(records: &[ObligationRecord], keep: F) -> Vec<ObligationRecord>
where
    F: Fn(&ObligationRecord) -> bool,
{
    let mut selected: Vec<&ObligationRecord> = records.iter().filter(|r| keep(r)).collect();
    selected.sort_by(|a, b| b.score.cmp(&a.score));
    selected.into_iter().take(TOP_ITEMS).cloned().collect()
}

/// Up to three High-severity or CRITICAL records, highest score first.
pub fn top_high(records: &[ObligationRecord]) -> Vec<ObligationRecord> {
    top_by_score(records, |r| r.severity == Severity::High || r.category == ScoreCategory::Critical)
}

/// Up to three Medium-severity or MEDIUM records, highest score first.
pub fn top_medium(records: &[ObligationRecord]) -> Vec<ObligationRecord> {
    top_by_score(records, |r| r.severity == Severity::Medium || r.category == ScoreCategory::Medium)
}

// ── Stakeholders ──────────────────────────────────────────────────────────────

pub const STAKEHOLDER_PROFILES: [(&str, &[&str]); 4] = [
    (
        "Compliance Analysts",
        &["shall", "must", "regulation", "obligation", "section", "chapter", "compliance"],
    ),
    (
        "Data Protection Officers",
        &[
            "personal data",
            "controller",
            "processor",
            "consent",
            "notice",
            "retention",
            "transfer",
            "data protection",
            "dpo",
        ],
    ),
    (
        "IT Auditors",
        &[
            "security",
            "access",
            "audit",
            "log",
            "encryption",
            "system",
            "technical",
            "controls",
            "monitor",
        ],
    ),
    (
        "GRC Consultants",
        &[
            "risk",
            "governance",
            "policy",
            "framework",
            "assessment",
            "control",
            "scope",
            "gap analysis",
        ],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderScore {
    pub name: String,
    pub score: usize,
}

/// Relevance of each stakeholder profile to the extracted text.
///
/// Keywords are counted as raw substrings, so "controls" also counts towards
/// "control" and "log" towards anything containing it.
pub fn stakeholder_scores(records: &[ObligationRecord]) -> Vec<StakeholderScore> {
    let corpus = records
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut scores: Vec<StakeholderScore> = STAKEHOLDER_PROFILES
        .iter()
        .map(|(name, keywords)| StakeholderScore {
            name: (*name).to_string(),
            score: keywords.iter().map(|kw| corpus.matches(kw).count()).sum(),
        })
        .collect();
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

// ── Effort estimate ───────────────────────────────────────────────────────────

pub const LARGE_DOCUMENT_ITEMS: usize = 200;
pub const MINUTES_PER_ITEM: f64 = 2.2;
pub const HOURLY_RATE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffortEstimate {
    pub manual_hours: f64,
    pub automated_minutes: u32,
    pub hours_saved: f64,
    /// Whole currency units at `HOURLY_RATE`.
    pub value_saved: u64,
}

impl EffortEstimate {
    pub fn for_items(total: usize) -> Self {
        let baseline = if total >= LARGE_DOCUMENT_ITEMS { 8.8 } else { 4.5 };
        let manual_hours = f64::max(baseline, total as f64 * MINUTES_PER_ITEM / 60.0);
        let automated_minutes = total.div_ceil(50).clamp(1, 5) as u32;
        let hours_saved = f64::max(0.0, manual_hours - f64::from(automated_minutes) / 60.0);

        EffortEstimate {
            manual_hours,
            automated_minutes,
            hours_saved,
            value_saved: (hours_saved * HOURLY_RATE).floor() as u64,
        }
    }
}

// ── Section labels ────────────────────────────────────────────────────────────

static SECTION_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[Ss]ection\s+\d+[A-Za-z0-9()]*").expect("section pattern is valid"));

/// First `Section <n>` reference in `text`, e.g. `"section 20"` or `"Section 26A(1)"`.
pub fn section_label(text: &str) -> Option<&str> {
    SECTION_REF.find(text).map(|m| m.as_str())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
