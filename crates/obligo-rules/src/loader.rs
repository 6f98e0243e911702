//! Rule pack loading.
//!
//! A rule pack is a configuration file holding an ordered list of detection
//! rules. Two formats are accepted:
//!
//! - TOML, with a top-level `[[rules]]` array of tables;
//! - JSON, either a bare array of rules or an object with a `rules` array.
//!   JSON packs are validated against `schema::rule_pack_schema()` first.
//!
//! Loading rejects duplicate rule ids. The compiled `RuleSet` is built by
//! `RulePack::into_rule_set`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use obligo_contracts::{
    error::{ObligoError, ObligoResult},
    rule::DetectionRule,
};

use crate::{schema, set::RuleSet};

/// The top-level structure of a rule pack.
///
/// Example:
/// ```toml
/// [[rules]]
/// id = "retention"
/// keyword = "retain"
/// severity = "medium"
/// must_not_contain = ["may retain"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePack {
    /// Ordered list of rules.
    #[serde(default)]
    pub rules: Vec<DetectionRule>,
}

impl RulePack {
    /// Parse `s` as a TOML rule pack.
    ///
    /// Returns `ObligoError::ConfigError` if the TOML is malformed or does
    /// not match the `RulePack` schema, and `DuplicateRuleId` if two rules
    /// share an id.
    pub fn from_toml_str(s: &str) -> ObligoResult<Self> {
        let pack: RulePack = toml::from_str(s).map_err(|e| ObligoError::ConfigError {
            reason: format!("failed to parse rule pack TOML: {}", e),
        })?;
        pack.check_unique_ids()?;
        Ok(pack)
    }

    /// Parse `s` as a JSON rule pack, validating it against the schema.
    pub fn from_json_str(s: &str) -> ObligoResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| ObligoError::ConfigError {
                reason: format!("failed to parse rule pack JSON: {}", e),
            })?;
        let value = schema::normalize_pack(value);
        schema::validate_pack(&value)?;

        let pack: RulePack = serde_json::from_value(value).map_err(|e| ObligoError::RulePackInvalid {
            reason: e.to_string(),
        })?;
        pack.check_unique_ids()?;
        Ok(pack)
    }

    /// Read the file at `path`, choosing the format from its extension
    /// (`.toml` or `.json`).
    pub fn from_file(path: &Path) -> ObligoResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ObligoError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let pack = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            _ => {
                return Err(ObligoError::ConfigError {
                    reason: format!(
                        "unsupported rule pack format '{}': expected .toml or .json",
                        path.display()
                    ),
                })
            }
        };

        info!(path = %path.display(), rule_count = pack.rules.len(), "loaded rule pack");
        Ok(pack)
    }

    /// Serialize the pack as TOML.
    pub fn to_toml_string(&self) -> ObligoResult<String> {
        toml::to_string_pretty(self).map_err(|e| ObligoError::SerializationError {
            reason: e.to_string(),
        })
    }

    pub fn into_rule_set(self) -> RuleSet {
        RuleSet::new(self.rules)
    }

    fn check_unique_ids(&self) -> ObligoResult<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(ObligoError::DuplicateRuleId {
                    id: rule.id.clone(),
                });
            }
        }
        debug!(rule_count = self.rules.len(), "rule ids are unique");
        Ok(())
    }
}

impl From<&RuleSet> for RulePack {
    fn from(set: &RuleSet) -> Self {
        Self {
            rules: set.to_rules(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
