//! SHA-256 fingerprints of extraction inputs.
//!
//! Extraction is a pure function of `(text, rules, mode)`, so the two
//! digests below plus the mode name form a complete cache key for a parse
//! result. Every byte that contributes to a digest is listed explicitly:
//!
//! - document digest: the raw text as UTF-8;
//! - rules digest: canonical JSON (serde_json, no pretty-printing) of the
//!   rule list in declaration order.

use sha2::{Digest, Sha256};

use obligo_contracts::error::{ObligoError, ObligoResult};
use obligo_core::ExtractionMode;
use obligo_rules::RuleSet;

/// Lowercase 64-character hex SHA-256 of `text`.
pub fn document_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Lowercase 64-character hex SHA-256 of the rule list's canonical JSON.
pub fn rules_digest(rules: &RuleSet) -> ObligoResult<String> {
    let rules_json = serde_json::to_vec(&rules.to_rules()).map_err(|e| ObligoError::SerializationError {
        reason: format!("rule set could not be serialized for hashing: {e}"),
    })?;
    Ok(hex::encode(Sha256::digest(&rules_json)))
}

/// `"strict"` or `"heuristic"`.
pub fn mode_name(mode: ExtractionMode) -> &'static str {
    match mode {
        ExtractionMode::Strict => "strict",
        ExtractionMode::Heuristic => "heuristic",
    }
}

/// Combined cache key: `<document digest>:<rules digest>:<mode>`.
///
/// The rules digest covers the set matching runs against, so an empty strict
/// set keys the same as the defaults in strict mode.
pub fn cache_key(text: &str, rules: &RuleSet, mode: ExtractionMode) -> ObligoResult<String> {
    Ok(format!(
        "{}:{}:{}",
        document_digest(text),
        rules_digest(mode.active_rules(rules))?,
        mode_name(mode)
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
