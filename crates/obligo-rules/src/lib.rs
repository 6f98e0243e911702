//! # obligo-rules
//!
//! Detection rule sets for the obligo extraction engine.
//!
//! ## Overview
//!
//! This crate provides [`RuleSet`], an immutable, ordered collection of
//! [`DetectionRule`](obligo_contracts::rule::DetectionRule)s whose regex
//! patterns are compiled once. Rule sets come from three places:
//!
//! - [`DEFAULT_RULES`]: the shared built-in set (six modal keywords);
//! - [`RulePack`]: TOML or JSON configuration files;
//! - [`RuleSet::new`]: programmatic construction.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use obligo_rules::RulePack;
//!
//! let rules = RulePack::from_file(Path::new("rules/pdpa.toml"))?.into_rule_set();
//! let matched = rules.match_rules("The organisation shall notify the Commission.");
//! ```
//!
//! ## Rule matching
//!
//! Every enabled rule is evaluated against a sentence and all matches are
//! returned. Choosing the effective rule (most severe wins) is left to the
//! severity resolver in `obligo-core`.

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod set;
pub mod validate;

pub use defaults::{is_default_rules, DEFAULT_RULES};
pub use loader::RulePack;
pub use set::{RuleHit, RuleSet};
pub use validate::{validate_rules, RuleIssue, RuleIssueKind};
