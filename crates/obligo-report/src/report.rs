//! The assembled extraction report.
//!
//! `ExtractionReport` is the sealed summary of one parse: the records, the
//! digests of the inputs that produced them, and every aggregate the
//! `summary`, `digest` and `overlay` modules derive from them. It is plain
//! data; rendering it (JSON, tables, HTML) is the caller's business.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use obligo_contracts::{
    error::{ObligoError, ObligoResult},
    record::ObligationRecord,
    rule::Severity,
};
use obligo_core::Extractor;
use obligo_rules::RuleHit;

use crate::{
    digest::ObligationDigest,
    fingerprint::{document_digest, rules_digest},
    overlay::{TaskOverlay, TaskStep, COMPLETED_LATER, IN_PROGRESS},
    summary::{
        section_label, stakeholder_scores, top_high, top_medium, EffortEstimate, SeverityBreakdown,
        StakeholderScore,
    },
};

/// One record on the reviewers' board, with its ordered task steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayEntry {
    pub control_id: String,
    pub severity: Severity,
    pub section: Option<String>,
    pub steps: Vec<TaskStep>,
    /// Steps whose due date is at most a week away (or already past).
    pub due_soon: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Unique per build, even for identical inputs.
    pub report_id: Uuid,

    pub generated_at: DateTime<Utc>,

    /// Display name of the source document, typically its file name.
    pub source_name: String,

    /// SHA-256 hex of the source text.
    pub document_digest: String,

    /// SHA-256 hex of the rule list's canonical JSON.
    pub rules_digest: String,

    /// Whether the records came from strict matching (no heuristic
    /// fallbacks).
    pub strict: bool,

    pub breakdown: SeverityBreakdown,
    pub top_high: Vec<ObligationRecord>,
    pub top_medium: Vec<ObligationRecord>,
    pub rule_hits: Vec<RuleHit>,
    pub stakeholders: Vec<StakeholderScore>,
    pub effort: EffortEstimate,
    pub digests: Vec<ObligationDigest>,
    pub in_progress: Vec<OverlayEntry>,
    pub completed_later: Vec<OverlayEntry>,

    /// All records, in document order.
    pub records: Vec<ObligationRecord>,
}

/// Builder for `ExtractionReport`.
///
/// ```rust,ignore
/// let extractor = Extractor::strict(&rules);
/// let records = extractor.extract(&text);
/// let report = ReportBuilder::new("pdpa.txt", &text, records, extractor)
///     .with_overlay(overlay)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct ReportBuilder<'a> {
    source_name: String,
    text: &'a str,
    records: Vec<ObligationRecord>,
    extractor: Extractor<'a>,
    overlay: Option<TaskOverlay>,
    today: Option<NaiveDate>,
}

impl<'a> ReportBuilder<'a> {
    /// `extractor` must be the one the records came from, so that the rules
    /// digest and mode identify them.
    pub fn new(
        source_name: impl Into<String>,
        text: &'a str,
        records: Vec<ObligationRecord>,
        extractor: Extractor<'a>,
    ) -> Self {
        ReportBuilder {
            source_name: source_name.into(),
            text,
            records,
            extractor,
            overlay: None,
            today: None,
        }
    }

    pub fn with_overlay(mut self, overlay: TaskOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Reference date for due-soon checks. Defaults to the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Validate the overlay against the records and assemble the report.
    pub fn build(self) -> ObligoResult<ExtractionReport> {
        if let Some(overlay) = &self.overlay {
            overlay.validate(&self.records)?;
        }
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());

        let (in_progress, completed_later) = match &self.overlay {
            Some(overlay) => (
                overlay_entries(overlay, IN_PROGRESS, &self.records, today),
                overlay_entries(overlay, COMPLETED_LATER, &self.records, today),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let report = ExtractionReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            document_digest: document_digest(self.text),
            rules_digest: rules_digest(self.extractor.rules())?,
            strict: self.extractor.mode().is_strict(),
            breakdown: SeverityBreakdown::from_records(&self.records),
            top_high: top_high(&self.records),
            top_medium: top_medium(&self.records),
            rule_hits: self.extractor.rules().hit_counts(self.records.iter().map(|r| r.text.as_str())),
            stakeholders: stakeholder_scores(&self.records),
            effort: EffortEstimate::for_items(self.records.len()),
            digests: self.records.iter().map(ObligationDigest::from_record).collect(),
            in_progress,
            completed_later,
            source_name: self.source_name,
            records: self.records,
        };

        info!(
            report_id = %report.report_id,
            records = report.records.len(),
            high = report.breakdown.high,
            strict = report.strict,
            "report assembled"
        );
        Ok(report)
    }
}

fn overlay_entries(
    overlay: &TaskOverlay,
    column: &str,
    records: &[ObligationRecord],
    today: NaiveDate,
) -> Vec<OverlayEntry> {
    overlay
        .column(column)
        .iter()
        .filter_map(|id| records.iter().find(|r| &r.control_id == id))
        .map(|record| {
            let steps = overlay.steps_for(&record.control_id);
            OverlayEntry {
                control_id: record.control_id.clone(),
                severity: record.severity,
                section: section_label(&record.text).map(str::to_string),
                due_soon: steps.iter().filter(|s| s.is_due_soon(today)).count(),
                steps,
            }
        })
        .collect()
}

impl ExtractionReport {
    pub fn to_json_pretty(&self) -> ObligoResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ObligoError::SerializationError {
            reason: format!("report could not be serialized: {e}"),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use obligo_contracts::error::ObligoError;
    use obligo_contracts::rule::{DetectionRule, Severity};
    use obligo_core::{parse, Extractor};
    use obligo_rules::{RuleSet, DEFAULT_RULES};

    use super::ReportBuilder;
    use crate::{
        fingerprint::document_digest,
        overlay::{TaskOverlay, TaskPriority, TaskStatus, TaskStep, COMPLETED_LATER, IN_PROGRESS},
    };

    const TEXT: &str = "14. Provision of consent. (1) An individual has not given consent unless the \
        individual has been provided with the information required under section 20 of this Act. \
        An organisation that fails to comply is liable on conviction to a fine. \
        The organisation may appoint a data protection officer.";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn report_summarises_a_parse() {
        let records = parse(TEXT, None);
        assert_eq!(records.len(), 3, "records: {records:#?}");

        let report = ReportBuilder::new("pdpa.txt", TEXT, records.clone(), Extractor::heuristic())
            .with_today(today())
            .build()
            .unwrap();

        assert_eq!(report.source_name, "pdpa.txt");
        assert_eq!(report.document_digest, document_digest(TEXT));
        assert_eq!(report.rules_digest.len(), 64);
        assert!(!report.strict);
        assert_eq!(report.breakdown.total, 3);
        assert_eq!((report.breakdown.medium, report.breakdown.low), (1, 2));
        assert_eq!(report.records, records);
        assert_eq!(report.digests.len(), 3);
        assert_eq!(report.stakeholders.len(), 4);
        assert_eq!(report.effort.automated_minutes, 1);
        assert_eq!(report.rule_hits.len(), DEFAULT_RULES.len());
        assert!(report.in_progress.is_empty() && report.completed_later.is_empty());

        let required = report.rule_hits.iter().find(|h| h.rule_id == "required").unwrap();
        assert_eq!(required.hits, 1);
        assert!(report.top_high.is_empty());
        assert_eq!(report.top_medium.len(), 1);
        assert_eq!(report.top_medium[0].control_id, "rule-001");
    }

    #[test]
    fn report_ids_are_unique_per_build() {
        let records = parse(TEXT, None);
        let a = ReportBuilder::new("a", TEXT, records.clone(), Extractor::heuristic()).build().unwrap();
        let b = ReportBuilder::new("a", TEXT, records, Extractor::heuristic()).build().unwrap();
        assert_ne!(a.report_id, b.report_id);
        assert_eq!(a.document_digest, b.document_digest);
        assert_eq!(a.rules_digest, b.rules_digest);
    }

    #[test]
    fn strict_reports_record_their_mode_and_rules() {
        let rules = RuleSet::new(vec![DetectionRule::new("liability", "liable", Severity::Critical)]);
        let extractor = Extractor::strict(&rules);
        let records = extractor.extract(TEXT);
        assert_eq!(records.len(), 1);

        let strict = ReportBuilder::new("pdpa.txt", TEXT, records, extractor).build().unwrap();
        let heuristic = ReportBuilder::new("pdpa.txt", TEXT, parse(TEXT, None), Extractor::heuristic())
            .build()
            .unwrap();

        assert!(strict.strict);
        assert_ne!(strict.rules_digest, heuristic.rules_digest);
        assert_eq!(strict.rule_hits.len(), 1);
        assert_eq!(strict.rule_hits[0].hits, 1);
        assert_eq!(strict.breakdown.high, 1);
    }

    #[test]
    fn overlay_columns_are_joined_with_records() {
        let records = parse(TEXT, None);

        let mut overlay = TaskOverlay::default();
        overlay.columns.insert(IN_PROGRESS.to_string(), vec!["rule-001".to_string()]);
        overlay.columns.insert(COMPLETED_LATER.to_string(), vec!["rule-003".to_string()]);
        overlay.steps.insert(
            "rule-001".to_string(),
            vec![
                TaskStep::new("File evidence").with_status(TaskStatus::Done),
                TaskStep::new("Update notice")
                    .with_priority(TaskPriority::High)
                    .with_due_date("2026-03-04"),
            ],
        );

        let report = ReportBuilder::new("pdpa.txt", TEXT, records, Extractor::heuristic())
            .with_overlay(overlay)
            .with_today(today())
            .build()
            .unwrap();

        assert_eq!(report.in_progress.len(), 1);
        let entry = &report.in_progress[0];
        assert_eq!(entry.control_id, "rule-001");
        assert_eq!(entry.section.as_deref(), Some("section 20"));
        assert_eq!(entry.steps[0].text, "Update notice", "todo steps come before done steps");
        assert_eq!(entry.due_soon, 1);

        assert_eq!(report.completed_later.len(), 1);
        assert!(report.completed_later[0].steps.is_empty());
    }

    #[test]
    fn overlay_with_unknown_ids_fails_the_build() {
        let records = parse(TEXT, None);
        let mut overlay = TaskOverlay::default();
        overlay.columns.insert(IN_PROGRESS.to_string(), vec!["rule-042".to_string()]);

        let err = ReportBuilder::new("pdpa.txt", TEXT, records, Extractor::heuristic())
            .with_overlay(overlay)
            .build()
            .unwrap_err();
        assert!(matches!(err, ObligoError::OverlayInvalid { .. }));
    }

    #[test]
    fn report_serializes_to_json() {
        let records = parse(TEXT, None);
        let report = ReportBuilder::new("pdpa.txt", TEXT, records, Extractor::heuristic())
            .build()
            .unwrap();
        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["breakdown"]["total"], 3);
        assert_eq!(value["records"][0]["control_id"], "rule-001");
    }
}
