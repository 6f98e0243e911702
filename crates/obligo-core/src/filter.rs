//! Obligation filter: decides which candidate sentences are obligations.
//!
//! The rejection ladder short-circuits on the first rule that fires:
//!
//! 1. starts with a structural header keyword (`PART`, `Division`, ...);
//! 2. is entirely upper-case (a title);
//! 3. has four or fewer tokens and no `shall`/`must`/`may`;
//! 4. is a definition (`"Term" means ...`);
//! 5. strict mode: no detection rule matched;
//! 6. heuristic mode: no rule matched, no actor+modal phrase, and no
//!    obligation signal word.

use std::fmt;

use obligo_contracts::rule::DetectionRule;
use obligo_rules::{RuleSet, DEFAULT_RULES};

use crate::lexicon::{
    contains_any, ACTOR_THEN_MODAL, DEFINED_TERM, OBLIGATION_SIGNALS, SHORT_MODAL, STRUCTURAL_HEADER,
};

/// How admission and severity fall back when no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// An explicit rule set was supplied: only rule matches count.
    Strict,
    /// Default rules plus lexical heuristics.
    Heuristic,
}

impl ExtractionMode {
    /// `Heuristic` when `rules` is structurally the default set, otherwise
    /// `Strict`. For callers that receive a rule list from a client and
    /// cannot tell whether the user customized it.
    pub fn for_rules(rules: &RuleSet) -> Self {
        if rules.is_default() {
            ExtractionMode::Heuristic
        } else {
            ExtractionMode::Strict
        }
    }

    pub fn is_strict(self) -> bool {
        self == ExtractionMode::Strict
    }

    /// The set matching actually runs against. A strict run over an empty
    /// set matches the default rules instead.
    pub fn active_rules(self, rules: &RuleSet) -> &RuleSet {
        if self.is_strict() && rules.is_empty() {
            &*DEFAULT_RULES
        } else {
            rules
        }
    }
}

/// Why a sentence was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    StructuralHeader,
    AllCaps,
    ShortFragment,
    Definition,
    NoRuleMatch,
    NoObligationSignal,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rejection::StructuralHeader => "structural header",
            Rejection::AllCaps => "all-caps heading",
            Rejection::ShortFragment => "short non-modal fragment",
            Rejection::Definition => "definition clause",
            Rejection::NoRuleMatch => "no detection rule matched",
            Rejection::NoObligationSignal => "no obligation signal",
        };
        f.write_str(label)
    }
}

fn is_all_caps(sentence: &str) -> bool {
    sentence.chars().any(char::is_alphabetic)
        && sentence.chars().any(char::is_uppercase)
        && !sentence.chars().any(char::is_lowercase)
}

/// Steps 1–4: rejections that depend only on the sentence's shape.
pub fn structural_rejection(sentence: &str) -> Option<Rejection> {
    if STRUCTURAL_HEADER.is_match(sentence) {
        return Some(Rejection::StructuralHeader);
    }
    if is_all_caps(sentence) {
        return Some(Rejection::AllCaps);
    }
    if sentence.split_whitespace().count() <= 4 && !SHORT_MODAL.is_match(sentence) {
        return Some(Rejection::ShortFragment);
    }
    if DEFINED_TERM.is_match(sentence) {
        return Some(Rejection::Definition);
    }
    None
}

/// Actor noun followed, anywhere later, by a modal or obligation term.
pub fn has_actor_modal(sentence: &str) -> bool {
    ACTOR_THEN_MODAL.is_match(sentence)
}

/// Any obligation signal word as a plain substring.
pub fn has_obligation_signal(sentence: &str) -> bool {
    contains_any(&sentence.to_lowercase(), &OBLIGATION_SIGNALS)
}

/// Steps 5–6, given the rules already matched against `sentence`.
pub fn signal_rejection(sentence: &str, matched: &[&DetectionRule], mode: ExtractionMode) -> Option<Rejection> {
    if !matched.is_empty() {
        return None;
    }
    match mode {
        ExtractionMode::Strict => Some(Rejection::NoRuleMatch),
        ExtractionMode::Heuristic => {
            if has_actor_modal(sentence) || has_obligation_signal(sentence) {
                None
            } else {
                Some(Rejection::NoObligationSignal)
            }
        }
    }
}

/// Full admission check for one sentence.
pub fn admit(sentence: &str, rules: &RuleSet, mode: ExtractionMode) -> bool {
    if structural_rejection(sentence).is_some() {
        return false;
    }
    let matched = mode.active_rules(rules).match_rules(sentence);
    signal_rejection(sentence, &matched, mode).is_none()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
