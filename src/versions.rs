use serde::{Deserialize, Serialize};

use crate::diff::{diff_lines, DiffOp};
use crate::emit::sha256_hex;
use crate::generate::GenerationRequest;
use crate::model::{Citation, DocumentKind, GeneratedDocument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: String,
    pub saved_at: i64,
    pub label: String,
    #[serde(default)]
    pub template_id: Option<String>,
    pub content_md: String,
}

/// A generated document as the workspace keeps it: the current draft plus
/// saved snapshots, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentArtifact {
    pub id: String,
    pub kind: DocumentKind,
    pub title: String,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub payer_style: Option<String>,
    pub content_md: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub missing_info_checklist: Vec<String>,
    #[serde(default)]
    pub risk_warnings: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub versions: Vec<DocumentVersion>,
}

pub fn artifact_id(case_id: &str, kind: DocumentKind) -> String {
    format!("doc-{}-{}", case_id, kind.as_str())
}

impl DocumentArtifact {
    /// Wrap fresh generator output. When `existing` is the artifact already
    /// stored for this case and kind, its id, creation time and versions are
    /// kept, and request ids that were not given fall back to the stored ones.
    pub fn from_generated(
        existing: Option<&DocumentArtifact>,
        case_id: &str,
        kind: DocumentKind,
        doc: GeneratedDocument,
        request: &GenerationRequest,
        now: i64,
    ) -> Self {
        DocumentArtifact {
            id: existing.map(|e| e.id.clone()).unwrap_or_else(|| artifact_id(case_id, kind)),
            kind,
            title: doc.title,
            case_id: Some(case_id.to_string()),
            template_id: request.template_id.clone().or_else(|| existing.and_then(|e| e.template_id.clone())),
            payer_style: request.payer_style.clone().or_else(|| existing.and_then(|e| e.payer_style.clone())),
            content_md: doc.content_md,
            citations: doc.citations,
            missing_info_checklist: doc.missing_info_checklist,
            risk_warnings: doc.risk_warnings,
            created_at: existing.map(|e| e.created_at).unwrap_or(now),
            updated_at: now,
            versions: existing.map(|e| e.versions.clone()).unwrap_or_default(),
        }
    }

    /// Snapshot the current content. A blank label becomes `v{n+1}`.
    pub fn save_version(&mut self, label: &str, saved_at: i64) -> &DocumentVersion {
        let n = self.versions.len();
        let label = match label.trim() {
            "" => format!("v{}", n + 1),
            l => l.to_string(),
        };
        let digest = sha256_hex(self.content_md.as_bytes());
        let version = DocumentVersion {
            id: format!("ver-{}-{}", &digest[..12], n + 1),
            saved_at,
            label,
            template_id: self.template_id.clone(),
            content_md: self.content_md.clone(),
        };
        tracing::debug!(document_id = %self.id, version_id = %version.id, label = %version.label, "saved version");
        self.versions.insert(0, version);
        &self.versions[0]
    }

    pub fn version(&self, version_id: &str) -> Option<&DocumentVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }

    /// Diff from a saved version to the current content.
    pub fn compare_with_version(&self, version_id: &str) -> Option<Vec<DiffOp>> {
        self.version(version_id).map(|v| diff_lines(&v.content_md, &self.content_md))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(content: &str) -> DocumentArtifact {
        let doc = GeneratedDocument {
            title: "SOAP Note — X".into(),
            content_md: content.into(),
            citations: Vec::new(),
            missing_info_checklist: Vec::new(),
            risk_warnings: Vec::new(),
        };
        DocumentArtifact::from_generated(None, "case-1", DocumentKind::SoapNote, doc, &GenerationRequest::default(), 10)
    }

    #[test]
    fn version_ids_are_content_derived() {
        let mut a = artifact("hello");
        let id = a.save_version("", 11).id.clone();
        let expected = format!("ver-{}-1", &sha256_hex(b"hello")[..12]);
        assert_eq!(id, expected);
    }
}
