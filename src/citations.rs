use std::collections::HashMap;

use crate::model::{Citation, EvidenceItem};

pub const NO_PINNED_EVIDENCE: &str =
    "_No pinned evidence. Add evidence in Evidence Retrieval to include citations._";

/// Read-only evidence source used to resolve pinned ids.
pub trait EvidenceLookup {
    fn evidence(&self, id: &str) -> Option<&EvidenceItem>;
}

impl EvidenceLookup for [EvidenceItem] {
    fn evidence(&self, id: &str) -> Option<&EvidenceItem> {
        self.iter().find(|e| e.id == id)
    }
}

impl EvidenceLookup for Vec<EvidenceItem> {
    fn evidence(&self, id: &str) -> Option<&EvidenceItem> {
        self.as_slice().evidence(id)
    }
}

impl EvidenceLookup for HashMap<String, EvidenceItem> {
    fn evidence(&self, id: &str) -> Option<&EvidenceItem> {
        self.get(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationBlock {
    pub citations: Vec<Citation>,
    pub footnotes_md: String,
}

/// Link target the evidence browser uses to scroll to and highlight an item.
pub fn evidence_deep_link(case_id: &str, evidence_id: &str) -> String {
    format!(
        "#/evidence?caseId={}&evidenceId={}",
        urlencoding::encode(case_id),
        urlencoding::encode(evidence_id)
    )
}

/// Number footnotes `1..N` in pin order. Pins that do not resolve are skipped,
/// so numbering stays contiguous over the evidence actually cited.
pub fn build_citations(case_id: &str, pinned_ids: &[String], lookup: &(impl EvidenceLookup + ?Sized)) -> CitationBlock {
    let pins: Vec<&EvidenceItem> = pinned_ids
        .iter()
        .filter_map(|id| {
            let found = lookup.evidence(id);
            if found.is_none() {
                tracing::warn!(evidence_id = %id, "pinned evidence not found, skipping citation");
            }
            found
        })
        .collect();

    let citations: Vec<Citation> = pins
        .iter()
        .enumerate()
        .map(|(idx, e)| Citation { footnote_number: idx + 1, evidence_id: e.id.clone() })
        .collect();

    if pins.is_empty() {
        return CitationBlock { citations, footnotes_md: NO_PINNED_EVIDENCE.to_string() };
    }

    let footnotes_md = pins
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            format!(
                "[^{}]: [{} — {} ({})]({})\n\n> {}",
                idx + 1,
                e.title,
                e.source_name,
                e.year,
                evidence_deep_link(case_id, &e.id),
                e.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    CitationBlock { citations, footnotes_md }
}
