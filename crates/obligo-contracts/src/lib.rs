//! # obligo-contracts
//!
//! Shared types, schemas, and error contracts for the obligo extraction
//! engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate beyond the pure label/threshold helpers attached to the types.

pub mod error;
pub mod record;
pub mod rule;

pub use error::{ObligoError, ObligoResult};
pub use record::{ObligationRecord, RecommendedAction, ScoreCategory, ScoreFlags};
pub use rule::{DetectionRule, MatchType, Severity};
