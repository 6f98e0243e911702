//! # obligo-report
//!
//! Turns a list of extracted obligations into a reviewable report.
//!
//! ## Overview
//!
//! - `fingerprint`: SHA-256 digests of the source text and rule set, which
//!   together with the extraction mode identify a parse result.
//! - `summary`: severity breakdown, top items, stakeholder relevance, effort
//!   estimate and section labels.
//! - `digest`: "who must do what" rephrasing of each record.
//! - `overlay`: reviewer task boards joined against records.
//! - `report`: the `ExtractionReport` envelope and its builder.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use obligo_core::Extractor;
//! use obligo_report::ReportBuilder;
//!
//! let extractor = Extractor::heuristic();
//! let records = extractor.extract(&text);
//! let report = ReportBuilder::new("pdpa.txt", &text, records, extractor).build()?;
//! println!("{}", report.to_json_pretty()?);
//! ```

pub mod digest;
pub mod fingerprint;
pub mod overlay;
pub mod report;
pub mod summary;

pub use digest::{action_statement, actor_modal, short_title, ObligationDigest, Polarity};
pub use fingerprint::{cache_key, document_digest, mode_name, rules_digest};
pub use overlay::{ordered_steps, TaskOverlay, TaskPriority, TaskStatus, TaskStep};
pub use report::{ExtractionReport, OverlayEntry, ReportBuilder};
pub use summary::{section_label, EffortEstimate, SeverityBreakdown, StakeholderScore};
