//! Structural segmentation of raw legal text into candidate sentences.
//!
//! Segmentation runs in three passes:
//!
//! 1. **Normalize**: non-breaking spaces become spaces, em/en dashes become
//!    `-` and whitespace runs collapse to one space.
//! 2. **Chunk**: the text is cut in front of every structural marker
//!    (`PART IV`, `Division 2`, `13. Consent`, `(1)`), then list items are
//!    folded back into the lead-in clause that introduces them.
//! 3. **Sentence split**: each chunk is split after `.`, `!` or `?` followed
//!    by whitespace, except chunks that hold a lead-in plus a lettered list,
//!    which stay whole.
//!
//! The lead-in tracking in pass 2 is a one-variable state machine: the index
//! of the chunk that following list items attach to, or `None`.

use tracing::debug;

use crate::lexicon::{
    LEAD_IN_DELIMITER, LEAD_IN_DELIMITER_AT_END, LETTERED_ITEM, LIST_ITEM_MARKER, MODAL_THEN_COPULA,
    SENTENCE_BREAK, STRUCTURAL_MARKERS, WHITESPACE_RUN,
};

/// Replace non-breaking spaces and em/en dashes, collapse whitespace, trim.
pub fn normalize(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '\u{a0}' => ' ',
            '\u{2014}' | '\u{2013}' => '-',
            other => other,
        })
        .collect();
    WHITESPACE_RUN.replace_all(&replaced, " ").trim().to_string()
}

/// Cut `text` in front of every structural marker. The marker starts the
/// following chunk. Empty chunks are dropped.
pub fn split_structural(text: &str) -> Vec<&str> {
    let mut cuts: Vec<usize> = STRUCTURAL_MARKERS
        .iter()
        .flat_map(|re| re.find_iter(text).map(|m| m.start()))
        .filter(|&pos| pos > 0)
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(text.len())) {
        let chunk = text[start..cut].trim();
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        start = cut;
    }
    chunks
}

fn is_list_item(chunk: &str) -> bool {
    LIST_ITEM_MARKER.is_match(chunk)
}

/// A chunk introduces a list when it ends in a colon/dash, or when a modal
/// is followed somewhere later by `be` / `include` / `consist of`.
fn is_lead_in(chunk: &str) -> bool {
    LEAD_IN_DELIMITER_AT_END.is_match(chunk) || MODAL_THEN_COPULA.is_match(chunk)
}

/// Fold list-item chunks into the pending lead-in chunk.
pub fn merge_list_items<'a, I>(chunks: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut merged: Vec<String> = Vec::new();
    let mut lead_in: Option<usize> = None;

    for chunk in chunks {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        if let Some(idx) = lead_in {
            if is_list_item(chunk) {
                let target = &mut merged[idx];
                target.truncate(target.trim_end().len());
                target.push(' ');
                target.push_str(chunk);
                continue;
            }
        }

        merged.push(chunk.to_string());
        lead_in = is_lead_in(chunk).then(|| merged.len() - 1);
    }

    merged
}

/// Split one chunk into sentences.
///
/// A chunk with a lead-in delimiter and at least two lettered items is kept
/// whole so `shall include: (a) ... (b) ...` stays one obligation.
pub fn split_sentences(chunk: &str) -> Vec<String> {
    let chunk = WHITESPACE_RUN.replace_all(chunk, " ");
    let chunk = chunk.trim();
    if chunk.is_empty() {
        return Vec::new();
    }

    let lettered_items = LETTERED_ITEM.find_iter(chunk).count();
    if lettered_items >= 2 && LEAD_IN_DELIMITER.is_match(chunk) {
        return vec![chunk.to_string()];
    }

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(chunk) {
        // Terminators are ASCII, so `start + 1` is a char boundary.
        sentences.push(&chunk[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&chunk[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run the full segmentation pipeline over raw text.
pub fn segment(raw: &str) -> Vec<String> {
    let text = normalize(raw);
    if text.is_empty() {
        return Vec::new();
    }

    let structural = split_structural(&text);
    let chunks = merge_list_items(structural.iter().copied());
    let sentences: Vec<String> = chunks.iter().flat_map(|c| split_sentences(c)).collect();

    debug!(
        structural_chunks = structural.len(),
        merged_chunks = chunks.len(),
        sentence_count = sentences.len(),
        "segmented text"
    );
    sentences
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::{merge_list_items, normalize, segment, split_sentences, split_structural};

    // ── 1. normalization ──────────────────────────────────────────────────────

    #[test]
    fn normalize_collapses_whitespace_and_dashes() {
        let raw = "  The\u{a0}organisation\n\n shall\tact \u{2014} promptly \u{2013} now.  ";
        assert_eq!(normalize(raw), "The organisation shall act - promptly - now.");
    }

    #[test]
    fn whitespace_only_input_segments_to_nothing() {
        assert!(segment("").is_empty());
        assert!(segment(" \n\t\u{a0} ").is_empty());
    }

    // ── 2. structural split ───────────────────────────────────────────────────

    #[test]
    fn markers_begin_new_chunks() {
        let text = "Preamble text. PART II DUTIES Division 3 General 4. Consent is needed (1) An organisation shall act.";
        assert_eq!(
            split_structural(text),
            vec![
                "Preamble text.",
                "PART II DUTIES",
                "Division 3 General",
                "4. Consent is needed",
                "(1) An organisation shall act.",
            ]
        );
    }

    /// A marker nested inside another marker still produces its own cut.
    #[test]
    fn nested_markers_each_cut() {
        assert_eq!(
            split_structural("Division 3. The person shall act."),
            vec!["Division", "3. The person shall act."]
        );
    }

    #[test]
    fn lowercase_after_number_is_not_a_marker() {
        assert_eq!(
            split_structural("See paragraph 4. below for details."),
            vec!["See paragraph 4. below for details."]
        );
    }

    // ── 3. list-item merging ──────────────────────────────────────────────────

    #[test]
    fn numeric_items_fold_into_colon_lead_in() {
        let merged = merge_list_items([
            "The organisation shall provide:",
            "(1) a notice;",
            "(2) a contact point.",
            "5. Retention",
        ]);
        assert_eq!(
            merged,
            vec![
                "The organisation shall provide: (1) a notice; (2) a contact point.".to_string(),
                "5. Retention".to_string(),
            ]
        );
    }

    #[test]
    fn modal_then_copula_is_a_lead_in() {
        let merged = merge_list_items(["The notice must include", "(i) the purpose", "(ii) the contact"]);
        assert_eq!(merged, vec!["The notice must include (i) the purpose (ii) the contact".to_string()]);
    }

    #[test]
    fn items_without_lead_in_stand_alone() {
        let merged = merge_list_items(["Consent.", "(1) The person shall consent.", "(2) The person may withdraw."]);
        assert_eq!(merged.len(), 3);
    }

    /// A non-item chunk that is not itself a lead-in clears the state.
    #[test]
    fn lead_in_is_cleared_by_ordinary_chunk() {
        let merged = merge_list_items(["Duties:", "7. Other matters", "(1) stray item"]);
        assert_eq!(merged, vec!["Duties:", "7. Other matters", "(1) stray item"]);
    }

    // ── 4. sentence split ─────────────────────────────────────────────────────

    #[test]
    fn sentences_keep_their_terminators() {
        assert_eq!(
            split_sentences("13. Consent. The organisation shall act! Will it?  Yes"),
            vec!["13.", "Consent.", "The organisation shall act!", "Will it?", "Yes"]
        );
    }

    #[test]
    fn lettered_list_with_lead_in_stays_whole() {
        let chunk = "Entities shall comply with: (a) access control. (b) encryption.";
        assert_eq!(split_sentences(chunk), vec![chunk.to_string()]);
    }

    #[test]
    fn single_lettered_item_still_splits() {
        assert_eq!(
            split_sentences("Note: (a) applies. Next sentence."),
            vec!["Note: (a) applies.", "Next sentence."]
        );
    }

    // ── 5. end to end ─────────────────────────────────────────────────────────

    #[test]
    fn list_item_cohesion() {
        let sentences = segment("Entities shall comply with: (a) access control; (b) encryption.");
        assert_eq!(
            sentences,
            vec!["Entities shall comply with: (a) access control; (b) encryption.".to_string()]
        );
    }

    #[test]
    fn numbered_heading_and_part_header_are_separate_sentences() {
        let sentences =
            segment("13. Consent. The organisation shall obtain consent before collecting personal data. PART IV GENERAL.");
        assert_eq!(
            sentences,
            vec![
                "13.".to_string(),
                "Consent.".to_string(),
                "The organisation shall obtain consent before collecting personal data.".to_string(),
                "PART IV GENERAL.".to_string(),
            ]
        );
    }
}
