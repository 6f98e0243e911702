//! Reviewer task overlays.
//!
//! An overlay is produced by whatever workflow tool reviewers use: a board of
//! columns holding record ids, plus free-form task steps per record. The
//! extraction engine never reads it; reports only join it against records.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use obligo_contracts::{
    error::{ObligoError, ObligoResult},
    record::ObligationRecord,
};

pub const IN_PROGRESS: &str = "in-progress";
pub const COMPLETED_LATER: &str = "completed-later";

/// Days ahead of `today` within which a due date counts as soon.
pub const DUE_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Later,
    Done,
    Cancelled,
    #[serde(other)]
    Other,
}

impl TaskStatus {
    pub fn rank(self) -> u8 {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::Later => 1,
            TaskStatus::Done => 2,
            TaskStatus::Cancelled => 3,
            TaskStatus::Other => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    #[default]
    Low,
    #[serde(other)]
    Other,
}

impl TaskPriority {
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::High => 0,
            TaskPriority::Medium => 1,
            TaskPriority::Low => 2,
            TaskPriority::Other => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStep {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    /// ISO `YYYY-MM-DD`; other formats are kept but never count as due soon.
    #[serde(default, alias = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TaskStep {
    pub fn new(text: impl Into<String>) -> Self {
        TaskStep {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// True when the due date parses and falls no more than a week after `today`.
    pub fn is_due_soon(&self, today: NaiveDate) -> bool {
        self.due_date
            .as_deref()
            .and_then(|due| NaiveDate::parse_from_str(due, "%Y-%m-%d").ok())
            .is_some_and(|due| (due - today).num_days() <= DUE_SOON_DAYS)
    }
}

/// Steps sorted by status rank, then priority rank; ties keep input order.
pub fn ordered_steps(steps: &[TaskStep]) -> Vec<TaskStep> {
    let mut ordered = steps.to_vec();
    ordered.sort_by_key(|s| (s.status.rank(), s.priority.rank()));
    ordered
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskOverlay {
    #[serde(default)]
    pub columns: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub steps: BTreeMap<String, Vec<TaskStep>>,
}

impl TaskOverlay {
    pub fn from_json_str(s: &str) -> ObligoResult<Self> {
        serde_json::from_str(s).map_err(|e| ObligoError::OverlayInvalid {
            reason: format!("overlay JSON could not be parsed: {e}"),
        })
    }

    pub fn column(&self, name: &str) -> &[String] {
        self.columns.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Steps for `control_id` in display order.
    pub fn steps_for(&self, control_id: &str) -> Vec<TaskStep> {
        self.steps.get(control_id).map(|s| ordered_steps(s)).unwrap_or_default()
    }

    /// Reject overlays naming control ids that `records` does not contain.
    pub fn validate(&self, records: &[ObligationRecord]) -> ObligoResult<()> {
        let known: HashSet<&str> = records.iter().map(|r| r.control_id.as_str()).collect();

        let mut unknown: Vec<&str> = self
            .columns
            .values()
            .flatten()
            .map(String::as_str)
            .chain(self.steps.keys().map(String::as_str))
            .filter(|id| !known.contains(id))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();

        if unknown.is_empty() {
            return Ok(());
        }
        warn!(unknown = unknown.len(), "task overlay references unknown records");
        Err(ObligoError::OverlayInvalid {
            reason: format!("unknown control ids: {}", unknown.join(", ")),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use obligo_contracts::{
        error::ObligoError,
        record::{ObligationRecord, RecommendedAction, ScoreCategory, ScoreFlags},
        rule::Severity,
    };

    use super::*;

    fn record(id: &str) -> ObligationRecord {
        ObligationRecord {
            control_id: id.to_string(),
            text: "The organisation shall keep records.".to_string(),
            modal_verb: Some("shall".to_string()),
            severity: Severity::High,
            score: 80,
            category: ScoreCategory::Critical,
            score_reasons: Vec::new(),
            score_flags: ScoreFlags::default(),
            action: RecommendedAction::ImmediateAction,
        }
    }

    #[test]
    fn overlay_parses_board_json() {
        let overlay = TaskOverlay::from_json_str(
            r#"{
                "columns": { "in-progress": ["rule-001"], "completed-later": [] },
                "steps": {
                    "rule-001": [
                        { "text": "Draft notice", "status": "later", "priority": "high", "dueDate": "2026-01-05" },
                        { "text": "Appoint DPO", "status": "blocked" }
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(overlay.column(IN_PROGRESS), ["rule-001".to_string()]);
        assert!(overlay.column("backlog").is_empty());
        let steps = &overlay.steps["rule-001"];
        assert_eq!(steps[0].due_date.as_deref(), Some("2026-01-05"));
        assert_eq!(steps[1].status, TaskStatus::Other);
        assert_eq!(steps[1].priority, TaskPriority::Low);
    }

    #[test]
    fn malformed_overlay_is_rejected() {
        let err = TaskOverlay::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ObligoError::OverlayInvalid { .. }));
    }

    #[test]
    fn steps_order_by_status_then_priority() {
        let steps = vec![
            TaskStep::new("done-high").with_status(TaskStatus::Done).with_priority(TaskPriority::High),
            TaskStep::new("todo-low"),
            TaskStep::new("todo-high").with_priority(TaskPriority::High),
            TaskStep::new("other").with_status(TaskStatus::Other),
            TaskStep::new("later-medium")
                .with_status(TaskStatus::Later)
                .with_priority(TaskPriority::Medium),
            TaskStep::new("todo-low-2"),
        ];
        let texts: Vec<String> = ordered_steps(&steps).into_iter().map(|s| s.text).collect();
        assert_eq!(
            texts,
            vec!["todo-high", "todo-low", "todo-low-2", "later-medium", "done-high", "other"]
        );
    }

    #[test]
    fn due_soon_is_within_a_week_or_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(TaskStep::new("a").with_due_date("2026-03-08").is_due_soon(today));
        assert!(TaskStep::new("b").with_due_date("2026-02-01").is_due_soon(today));
        assert!(!TaskStep::new("c").with_due_date("2026-03-09").is_due_soon(today));
        assert!(!TaskStep::new("d").with_due_date("next week").is_due_soon(today));
        assert!(!TaskStep::new("e").is_due_soon(today));
    }

    #[test]
    fn validate_rejects_unknown_control_ids() {
        let records = vec![record("rule-001"), record("rule-002")];

        let mut overlay = TaskOverlay::default();
        overlay.columns.insert(IN_PROGRESS.to_string(), vec!["rule-001".to_string()]);
        overlay.steps.insert("rule-002".to_string(), vec![TaskStep::new("Review")]);
        assert!(overlay.validate(&records).is_ok());

        overlay
            .columns
            .insert(COMPLETED_LATER.to_string(), vec!["rule-009".to_string(), "rule-003".to_string()]);
        overlay.steps.insert("rule-009".to_string(), Vec::new());
        match overlay.validate(&records) {
            Err(ObligoError::OverlayInvalid { reason }) => {
                assert_eq!(reason, "unknown control ids: rule-003, rule-009");
            }
            other => panic!("expected OverlayInvalid, got {other:?}"),
        }
    }
}
