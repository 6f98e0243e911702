//! # obligo-core
//!
//! The deterministic obligation-extraction engine.
//!
//! This crate provides:
//! - the segmenter (`segment`), obligation filter (`filter`), severity
//!   resolver (`severity`) and risk scorer (`score`);
//! - the `Extractor` that runs them in order and assembles
//!   `ObligationRecord`s, plus the `parse` entry point.
//!
//! The engine is a pure function of `(text, rules, mode)`. It performs no I/O,
//! holds no shared mutable state, and never fails: malformed rules and empty
//! input only mean fewer records.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use obligo_core::parse;
//!
//! let records = parse("The organisation shall notify the Commission.", None);
//! assert_eq!(records[0].control_id, "rule-001");
//! ```

pub mod extractor;
pub mod filter;
mod lexicon;
pub mod score;
pub mod segment;
pub mod severity;

pub use extractor::{parse, ExtractionStats, Extractor};
pub use filter::{admit, ExtractionMode, Rejection};
pub use obligo_rules::is_default_rules;
pub use score::RiskScore;
pub use segment::segment;
pub use severity::{resolve_severity, SeverityResolution};
