//! Fixed word lists and patterns shared by the pipeline stages.
//!
//! Everything here is compiled once per process and read-only.

use once_cell::sync::Lazy;
use regex::Regex;

fn pattern(p: &str) -> Regex {
    Regex::new(p).expect("lexicon patterns are static and valid")
}

// ── Segmentation ──────────────────────────────────────────────────────────────

pub(crate) static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| pattern(r"\s+"));

/// Markers that begin a new structural unit. Kept as separate patterns so a
/// marker nested inside another (e.g. `Division 3. The`) still yields its own
/// split point.
pub(crate) static STRUCTURAL_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bPART\s+[IVX]+",
        r"\bDivision\s+\d+",
        r"\b\d+\.\s+[A-Z]",
        r"\(\d+\)",
    ]
    .into_iter()
    .map(pattern)
    .collect()
});

/// `(a)`..`(zz)`, `(i)`/`(ii)`/..., or `(1)`/`(2)`/... at the start of a chunk.
pub(crate) static LIST_ITEM_MARKER: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)^\((?:[a-z]{1,2}|[ivx]+|\d+)\)(?:\s|$)"));

pub(crate) static LEAD_IN_DELIMITER_AT_END: Lazy<Regex> = Lazy::new(|| pattern(r"[:\-\x{2014}\x{2013}]\s*$"));

pub(crate) static MODAL_THEN_COPULA: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(?:shall|must|may|is required to)\b.*\b(?:be|include|consist of)\b"));

pub(crate) static LETTERED_ITEM: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)\([a-z]\)"));

pub(crate) static LEAD_IN_DELIMITER: Lazy<Regex> = Lazy::new(|| pattern(r"[:\-\x{2014}\x{2013}]"));

pub(crate) static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| pattern(r"[.!?]\s+"));

// ── Filtering ─────────────────────────────────────────────────────────────────

pub(crate) static STRUCTURAL_HEADER: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)^(?:PART|Division|SECTION|Schedule)\b"));

pub(crate) static SHORT_MODAL: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)\b(?:shall|must|may)\b"));

pub(crate) static DEFINED_TERM: Lazy<Regex> =
    Lazy::new(|| pattern(r#"(?i)["\x{201C}][^"\x{201D}]+["\x{201D}]\s+means\b"#));

pub(crate) static ACTOR_THEN_MODAL: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"(?i)\b(?:organisation|organization|commission|individual|person|applicant|data intermediary|controller|processor|entity|provider|service|company|team|customer)\b.*\b(?:shall|must|is required to|may|should|required|prohibited)\b",
    )
});

/// Plain substrings; any one is enough to keep a sentence in heuristic mode.
pub(crate) const OBLIGATION_SIGNALS: [&str; 12] = [
    "shall",
    "must",
    "required",
    "prohibited",
    "should",
    "may",
    "ensure",
    "comply",
    "adhere",
    "must ensure",
    "shall not",
    "must not",
];

// ── Severity heuristics ───────────────────────────────────────────────────────

pub(crate) static HIGH_RISK_TERMS: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(?:must|shall|required|prohibited|strictly)\b"));

pub(crate) static MEDIUM_RISK_TERMS: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(?:should|ensure|monitor|verify)\b"));

pub(crate) static LOW_RISK_TERMS: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(?:may|can|optional|recommend)\b"));

// ── Scoring ───────────────────────────────────────────────────────────────────

pub(crate) static MANDATORY_MODAL: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)\b(?:shall|must)\b"));

pub(crate) const PENALTY_TERMS: [&str; 5] = ["liable", "fine", "imprisonment", "penalty", "prosecution"];

pub(crate) const BREACH_TERMS: [&str; 9] = [
    "breach",
    "incident",
    "unauthorized access",
    "unauthorised access",
    "data leak",
    "data loss",
    "security incident",
    "ransomware",
    "compromise",
];

/// Published enforcement decisions and the phrases that cite them.
pub(crate) const ENFORCEMENT_PRECEDENTS: [&str; 7] = [
    "singhealth",
    "ihis",
    "grab",
    "lazada",
    "pdpc decision",
    "commission decision",
    "enforcement case",
];

pub(crate) fn contains_any(lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| lower.contains(t))
}
