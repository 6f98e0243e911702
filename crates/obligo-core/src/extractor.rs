//! The extraction pipeline.
//!
//! `Extractor` drives, in order:
//!
//! 1. segmentation of the raw text into candidate sentences;
//! 2. structural filtering (headers, titles, fragments, definitions);
//! 3. rule matching and signal filtering;
//! 4. severity resolution;
//! 5. risk scoring;
//! 6. record assembly with a freshly incremented `control_id`.
//!
//! Each call owns all of its working state. For identical `(text, rules,
//! mode)` the output is identical and in document order.

use tracing::{debug, info};

use obligo_contracts::record::{ObligationRecord, RecommendedAction};
use obligo_rules::{RuleSet, DEFAULT_RULES};

use crate::{
    filter::{signal_rejection, structural_rejection, ExtractionMode, Rejection},
    score::score,
    segment::segment,
    severity::resolve_severity,
};

/// Sequential record id, zero-padded to at least three digits.
pub fn control_id(ordinal: usize) -> String {
    format!("rule-{ordinal:03}")
}

/// Per-call counters, for logging and CLI summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub sentences: usize,
    pub admitted: usize,
    pub structural_headers: usize,
    pub all_caps: usize,
    pub short_fragments: usize,
    pub definitions: usize,
    pub no_rule_match: usize,
    pub no_signal: usize,
}

impl ExtractionStats {
    fn record_rejection(&mut self, rejection: Rejection) {
        let counter = match rejection {
            Rejection::StructuralHeader => &mut self.structural_headers,
            Rejection::AllCaps => &mut self.all_caps,
            Rejection::ShortFragment => &mut self.short_fragments,
            Rejection::Definition => &mut self.definitions,
            Rejection::NoRuleMatch => &mut self.no_rule_match,
            Rejection::NoObligationSignal => &mut self.no_signal,
        };
        *counter += 1;
    }

    pub fn rejected(&self) -> usize {
        self.sentences - self.admitted
    }
}

/// Obligation extractor bound to one rule set and mode.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'r> {
    rules: &'r RuleSet,
    mode: ExtractionMode,
}

impl Extractor<'static> {
    /// Default rules with heuristic fallback.
    pub fn heuristic() -> Self {
        Self {
            rules: &DEFAULT_RULES,
            mode: ExtractionMode::Heuristic,
        }
    }
}

impl<'r> Extractor<'r> {
    /// Caller-supplied rules, no heuristic fallback. An empty set falls back
    /// to the default rules, still without heuristics.
    pub fn strict(rules: &'r RuleSet) -> Self {
        Self::new(rules, ExtractionMode::Strict)
    }

    pub fn new(rules: &'r RuleSet, mode: ExtractionMode) -> Self {
        Self {
            rules: mode.active_rules(rules),
            mode,
        }
    }

    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    pub fn extract(&self, text: &str) -> Vec<ObligationRecord> {
        self.extract_with_stats(text).0
    }

    pub fn extract_with_stats(&self, text: &str) -> (Vec<ObligationRecord>, ExtractionStats) {
        let sentences = segment(text);
        let mut stats = ExtractionStats {
            sentences: sentences.len(),
            ..ExtractionStats::default()
        };
        let mut records = Vec::new();

        for sentence in sentences {
            if let Some(rejection) = structural_rejection(&sentence) {
                stats.record_rejection(rejection);
                continue;
            }

            let matched = self.rules.match_rules(&sentence);
            if let Some(rejection) = signal_rejection(&sentence, &matched, self.mode) {
                stats.record_rejection(rejection);
                continue;
            }

            let resolution = resolve_severity(&sentence, matched, self.mode);
            let risk = score(&sentence, resolution.severity, &resolution.matched);

            let record = ObligationRecord {
                control_id: control_id(records.len() + 1),
                modal_verb: resolution.trigger,
                severity: resolution.severity,
                score: risk.score,
                category: risk.category,
                score_reasons: risk.reasons,
                score_flags: risk.flags,
                action: RecommendedAction::resolve(risk.category, resolution.severity),
                text: sentence,
            };
            debug!(
                control_id = %record.control_id,
                severity = %record.severity,
                score = record.score,
                "obligation extracted"
            );
            records.push(record);
        }

        stats.admitted = records.len();
        info!(
            sentences = stats.sentences,
            admitted = stats.admitted,
            rejected = stats.rejected(),
            strict = self.mode.is_strict(),
            "extraction complete"
        );
        (records, stats)
    }
}

/// Extract obligations from `text`.
///
/// With `rules = None` the default rules apply together with heuristic
/// fallbacks. Any supplied set switches to strict mode: only sentences
/// matching at least one rule are kept. An empty set is matched as the
/// default rules, so it keeps every default-rule match and nothing that
/// only the heuristics would admit.
pub fn parse(text: &str, rules: Option<&RuleSet>) -> Vec<ObligationRecord> {
    match rules {
        Some(rules) => Extractor::strict(rules).extract(text),
        None => Extractor::heuristic().extract(text),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
