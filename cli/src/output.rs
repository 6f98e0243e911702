//! Plain-text rendering for terminal output.

use obligo_contracts::record::ObligationRecord;
use obligo_rules::RuleIssue;

const TEXT_WIDTH: usize = 72;

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// One line per record: id, severity, score, category, action and text.
pub fn records_table(records: &[ObligationRecord]) -> String {
    let mut out = format!(
        "{:<10} {:<8} {:>5}  {:<8} {:<16} {}\n",
        "ID", "SEVERITY", "SCORE", "CATEGORY", "ACTION", "TEXT"
    );
    for r in records {
        out.push_str(&format!(
            "{:<10} {:<8} {:>5}  {:<8} {:<16} {}\n",
            r.control_id,
            r.severity.as_str(),
            r.score,
            r.category.as_str(),
            r.action.as_str(),
            clip(&r.text, TEXT_WIDTH)
        ));
    }
    out.push_str(&format!("\n{} obligation(s)\n", records.len()));
    out
}

pub fn issues_list(issues: &[RuleIssue]) -> String {
    if issues.is_empty() {
        return "no issues found\n".to_string();
    }
    issues.iter().map(|issue| format!("  - {issue}\n")).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
