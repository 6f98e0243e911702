//! Reading source documents and rule packs from disk.

use std::path::Path;

use tracing::{debug, warn};

use obligo_contracts::error::{ObligoError, ObligoResult};
use obligo_rules::{RulePack, RuleSet};

/// Decode `bytes` as UTF-8, falling back to Latin-1 (every byte maps to the
/// code point of the same value, so the fallback cannot fail).
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(valid_up_to = e.utf8_error().valid_up_to(), "input is not UTF-8; decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Read the document at `path`. Whitespace-only documents are an error here,
/// not in the engine.
pub fn read_document(path: &Path) -> ObligoResult<String> {
    let bytes = std::fs::read(path).map_err(|e| ObligoError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let text = decode_text(bytes);
    if text.trim().is_empty() {
        return Err(ObligoError::Io {
            path: path.display().to_string(),
            reason: "no text extracted".to_string(),
        });
    }
    debug!(path = %path.display(), chars = text.chars().count(), "read document");
    Ok(text)
}

/// Load the pack at `path`, or `None` to use the built-in defaults.
pub fn load_rules(path: Option<&Path>) -> ObligoResult<Option<RuleSet>> {
    path.map(|p| RulePack::from_file(p).map(RulePack::into_rule_set))
        .transpose()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
