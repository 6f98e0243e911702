//! Plain-language digests of obligation text.
//!
//! A digest rephrases a record as "who must do what": the actor in front of
//! the first modal, the modal's polarity, and either the remainder of the
//! sentence or its lettered list items. Nothing here affects extraction; it
//! only shapes how records are presented.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use obligo_contracts::record::ObligationRecord;

use crate::summary::section_label;

static MODAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(shall not|must not|shall|must|may|is required to)\b").expect("modal pattern is valid")
});

static ACTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:the\s+)?(commission|organisation|organization|authority|individual|person|applicant|data intermediary|controller|processor)\b",
    )
    .expect("actor pattern is valid")
});

static LETTERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(([a-z])\)").expect("item pattern is valid"));

static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:\([a-z0-9]+\)\s*|(?:\d+|[a-z])\.\s+)").expect("marker pattern is valid")
});

static ACTOR_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:the\s+)?(?:organisation|organization|commission|authority|applicant|individual|person|controller|processor)\s+(?:must not|must|can|may)\s+",
    )
    .expect("actor prefix pattern is valid")
});

static ITEM_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]\)\s*").expect("label pattern is valid"));

static PAGE_ARTIFACTS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)Singapore Statutes Online.*$").expect("artifact pattern is valid"),
        Regex::new(r"(?i)PDF created date.*$").expect("artifact pattern is valid"),
    ]
});

const ACTION_LIMIT: usize = 80;
const TITLE_WORDS: usize = 6;

// ── Actor and modal ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    #[serde(rename = "must")]
    Must,
    #[serde(rename = "can")]
    Can,
    #[serde(rename = "must not")]
    MustNot,
}

impl Polarity {
    fn for_modal(modal: &str) -> Self {
        match modal {
            "may" => Polarity::Can,
            "shall not" | "must not" => Polarity::MustNot,
            _ => Polarity::Must,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Must => "must",
            Polarity::Can => "can",
            Polarity::MustNot => "must not",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorModal {
    /// Capitalized; `"Actor"` when nothing precedes the modal.
    pub actor: String,
    /// Lower-cased modal as matched.
    pub modal: String,
    pub polarity: Polarity,
    /// Text after the modal, trimmed.
    pub remainder: String,
}

/// Split `text` around its first modal. `None` when no modal is present.
pub fn actor_modal(text: &str) -> Option<ActorModal> {
    let normalized = collapse_whitespace(text);
    let found = MODAL.find(&normalized)?;
    let modal = found.as_str().to_lowercase();
    let before = normalized[..found.start()].trim();
    let remainder = normalized[found.end()..].trim().to_string();

    let actor = match ACTOR.captures(before) {
        Some(caps) => caps[1].to_string(),
        None if !before.is_empty() => before.to_string(),
        None => "Actor".to_string(),
    };

    Some(ActorModal {
        actor: capitalize(&actor),
        polarity: Polarity::for_modal(&modal),
        modal,
        remainder,
    })
}

// ── Lettered lists ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub label: char,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSplit {
    pub lead_in: String,
    pub items: Vec<ListItem>,
}

impl ListSplit {
    /// `"A) Action"` per item, each capped at `limit` characters if given.
    fn labelled_actions(&self, limit: Option<usize>) -> Vec<String> {
        self.items
            .iter()
            .map(|item| {
                let action = capitalize(&normalize_action(&item.text));
                let action = match limit {
                    Some(limit) => shorten(&action, limit),
                    None => action,
                };
                format!("{}) {}", item.label.to_ascii_uppercase(), action)
            })
            .collect()
    }
}

/// Split `text` at `(a)`, `(b)`, … markers. `None` when there are none.
pub fn split_list_items(text: &str) -> Option<ListSplit> {
    let markers: Vec<(usize, usize, char)> = LETTERED_ITEM
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps[1].chars().next()?;
            Some((whole.start(), whole.end(), label))
        })
        .collect();
    let (first_start, _, _) = *markers.first()?;

    let items = markers
        .iter()
        .enumerate()
        .map(|(idx, &(_, body_start, label))| {
            let body_end = markers.get(idx + 1).map_or(text.len(), |next| next.0);
            ListItem {
                label,
                text: clean_item(&text[body_start..body_end]),
            }
        })
        .collect();

    Some(ListSplit {
        lead_in: text[..first_start].trim().to_string(),
        items,
    })
}

fn clean_item(raw: &str) -> String {
    let mut item = raw.trim().to_string();
    for artifact in PAGE_ARTIFACTS.iter() {
        item = artifact.replace(&item, "").trim().to_string();
    }
    let mut item = item.as_str();
    for conjunction in ["; and", "; or"] {
        if let Some(stripped) = item.strip_suffix(conjunction) {
            item = stripped;
        }
    }
    item.trim_end_matches([';', '.']).trim().to_string()
}

// ── Statements and titles ─────────────────────────────────────────────────────

/// Rephrase `text` as one "Actor must …" statement.
pub fn action_statement(text: &str) -> String {
    let normalized = collapse_whitespace(text);
    if normalized.is_empty() {
        return String::new();
    }

    match (split_list_items(&normalized), actor_modal(&normalized)) {
        (Some(list), Some(parsed)) => format!(
            "{} {} {}.",
            parsed.actor,
            parsed.polarity,
            list.labelled_actions(None).join("; ")
        ),
        (Some(list), None) => list.labelled_actions(None).join("; "),
        (None, Some(parsed)) => {
            let action = normalize_action(&parsed.remainder);
            let action = action
                .strip_prefix([',', '.', ';', ':', '-'])
                .map_or(action.as_str(), str::trim_start);
            let sentence = collapse_whitespace(&format!("{} {} {}", parsed.actor, parsed.polarity, action));
            with_period(capitalize(&sentence))
        }
        (None, None) => with_period(capitalize(&normalized)),
    }
}

/// One short action per list item, or the shortened statement.
pub fn action_list(text: &str) -> Vec<String> {
    let normalized = collapse_whitespace(text);
    match split_list_items(&normalized) {
        Some(list) => list.labelled_actions(Some(ACTION_LIMIT)),
        None => vec![shorten(&action_statement(&normalized), ACTION_LIMIT)],
    }
}

/// At most six words naming the first action, without the actor.
pub fn short_title(text: &str) -> String {
    let from_actions = action_list(text)
        .first()
        .map(|first| first_words(ACTOR_PREFIX.replace(&ITEM_LABEL.replace(first, ""), "").trim()))
        .unwrap_or_default();
    if !from_actions.is_empty() {
        return from_actions;
    }

    let normalized = collapse_whitespace(text);
    let mut key = LEADING_MARKER.replace(&normalized, "").into_owned();
    if let Some(parsed) = actor_modal(&normalized) {
        let action = normalize_action(&parsed.remainder);
        if !action.is_empty() {
            key = ACTOR_PREFIX.replace(&action, "").trim().to_string();
        }
    }
    let title = first_words(&key);
    if title.is_empty() {
        "Rule".to_string()
    } else {
        title
    }
}

// ── Per-record digest ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationDigest {
    pub control_id: String,
    pub section: Option<String>,
    pub actor: Option<String>,
    pub polarity: Option<Polarity>,
    pub title: String,
    pub statement: String,
    pub actions: Vec<String>,
}

impl ObligationDigest {
    pub fn from_record(record: &ObligationRecord) -> Self {
        let parsed = actor_modal(&record.text);
        ObligationDigest {
            control_id: record.control_id.clone(),
            section: section_label(&record.text).map(str::to_string),
            actor: parsed.as_ref().map(|p| p.actor.clone()),
            polarity: parsed.map(|p| p.polarity),
            title: short_title(&record.text),
            statement: action_statement(&record.text),
            actions: action_list(&record.text),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn with_period(mut sentence: String) -> String {
    if !sentence.ends_with('.') {
        sentence.push('.');
    }
    sentence
}

/// Drop a leading `(1)` / `a.` marker and a leading infinitive "to".
fn normalize_action(text: &str) -> String {
    let cleaned = LEADING_MARKER.replace(text, "");
    let cleaned = cleaned.trim();
    match cleaned.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("to ") => cleaned[3..].trim().to_string(),
        _ => cleaned.to_string(),
    }
}

/// Cap `text` at `limit` characters, preferring a word boundary past 60.
fn shorten(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    let end = match cut.rfind(' ') {
        Some(space) if cut[..space].chars().count() > 60 => space,
        _ => cut.len(),
    };
    format!("{}…", &cut[..end])
}

fn first_words(text: &str) -> String {
    text.split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([',', ';', ':', '.'])
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── 1. actor and modal ────────────────────────────────────────────────────

    #[test]
    fn known_actor_is_extracted_without_article() {
        let parsed = actor_modal("The organisation shall obtain consent before collecting personal data.").unwrap();
        assert_eq!(parsed.actor, "Organisation");
        assert_eq!(parsed.modal, "shall");
        assert_eq!(parsed.polarity, Polarity::Must);
        assert_eq!(parsed.remainder, "obtain consent before collecting personal data.");
    }

    #[test]
    fn polarity_follows_the_modal() {
        let may = actor_modal("An individual may withdraw consent at any time.").unwrap();
        assert_eq!((may.actor.as_str(), may.polarity), ("Individual", Polarity::Can));

        let negated = actor_modal("An organisation SHALL NOT collect personal data.").unwrap();
        assert_eq!(negated.modal, "shall not");
        assert_eq!(negated.polarity, Polarity::MustNot);

        let required = actor_modal("The applicant is required to submit the form.").unwrap();
        assert_eq!(required.polarity, Polarity::Must);
        assert_eq!(required.remainder, "submit the form.");
    }

    #[test]
    fn unknown_actor_falls_back_to_leading_text_then_placeholder() {
        assert_eq!(actor_modal("Entities must register.").unwrap().actor, "Entities");
        assert_eq!(actor_modal("Shall notify the Commission.").unwrap().actor, "Actor");
        assert!(actor_modal("Records are kept for five years.").is_none());
    }

    // ── 2. lists ──────────────────────────────────────────────────────────────

    #[test]
    fn lettered_items_split_with_lead_in() {
        let split = split_list_items("Entities shall comply with: (a) access control; and (b) encryption.").unwrap();
        assert_eq!(split.lead_in, "Entities shall comply with:");
        assert_eq!(
            split.items,
            vec![
                ListItem {
                    label: 'a',
                    text: "access control".to_string()
                },
                ListItem {
                    label: 'b',
                    text: "encryption".to_string()
                },
            ]
        );
        assert!(split_list_items("No items here.").is_none());
    }

    #[test]
    fn page_artifacts_are_dropped_from_items() {
        let split = split_list_items("(a) notify the Commission Singapore Statutes Online page 4 of 9").unwrap();
        assert_eq!(split.items[0].text, "notify the Commission");
    }

    // ── 3. statements ─────────────────────────────────────────────────────────

    #[test]
    fn statement_rephrases_actor_and_polarity() {
        assert_eq!(
            action_statement("The organisation shall obtain consent before collecting personal data."),
            "Organisation must obtain consent before collecting personal data."
        );
        assert_eq!(
            action_statement("An organisation shall not   collect personal data"),
            "Organisation must not collect personal data."
        );
        assert_eq!(
            action_statement("The Commission may, in writing, direct an audit."),
            "Commission can in writing, direct an audit."
        );
    }

    #[test]
    fn statement_for_lists_and_plain_text() {
        assert_eq!(
            action_statement("Entities shall comply with: (a) access control; (b) encryption."),
            "Entities must A) Access control; B) Encryption."
        );
        assert_eq!(action_statement("(a) to keep logs; (b) to review them"), "A) Keep logs; B) Review them");
        assert_eq!(action_statement("records kept for five years"), "Records kept for five years.");
        assert_eq!(action_statement("   "), "");
    }

    #[test]
    fn long_actions_are_shortened_at_a_word_boundary() {
        let long = format!("(a) {}", "maintain records ".repeat(8));
        let actions = action_list(&long);
        assert_eq!(actions.len(), 1);
        assert!(actions[0].ends_with('…'));
        assert!(actions[0].chars().count() <= ACTION_LIMIT + 4);
    }

    // ── 4. titles ─────────────────────────────────────────────────────────────

    #[test]
    fn short_title_drops_actor_and_caps_words() {
        assert_eq!(
            short_title("The organisation shall obtain consent before collecting personal data for marketing."),
            "obtain consent before collecting personal data"
        );
        assert_eq!(
            short_title("Entities shall comply with: (a) access control; (b) encryption."),
            "Access control"
        );
        assert_eq!(short_title(""), "Rule");
    }

    #[test]
    fn digest_collects_every_view_of_a_record() {
        use obligo_contracts::{
            record::{ObligationRecord, RecommendedAction, ScoreCategory, ScoreFlags},
            rule::Severity,
        };

        let record = ObligationRecord {
            control_id: "rule-004".to_string(),
            text: "An organisation shall notify the Commission under section 26D.".to_string(),
            modal_verb: Some("shall".to_string()),
            severity: Severity::High,
            score: 80,
            category: ScoreCategory::Critical,
            score_reasons: Vec::new(),
            score_flags: ScoreFlags::default(),
            action: RecommendedAction::ImmediateAction,
        };
        let digest = ObligationDigest::from_record(&record);

        assert_eq!(digest.control_id, "rule-004");
        assert_eq!(digest.section.as_deref(), Some("section 26D"));
        assert_eq!(digest.actor.as_deref(), Some("Organisation"));
        assert_eq!(digest.polarity, Some(Polarity::Must));
        assert_eq!(digest.statement, "Organisation must notify the Commission under section 26D.");
        assert_eq!(digest.title, "notify the Commission under section 26D");
    }
}
