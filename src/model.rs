use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Draft,
    InProgress,
    Submitted,
    Denied,
    Appeal,
    Approved,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 6] = [
        CaseStatus::Draft,
        CaseStatus::InProgress,
        CaseStatus::Submitted,
        CaseStatus::Denied,
        CaseStatus::Appeal,
        CaseStatus::Approved,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CaseStatus::Draft => "Draft",
            CaseStatus::InProgress => "In progress",
            CaseStatus::Submitted => "Submitted",
            CaseStatus::Denied => "Denied",
            CaseStatus::Appeal => "Appeal",
            CaseStatus::Approved => "Approved",
        }
    }

    /// Denied and appealed cases must carry the payer's denial text.
    pub fn requires_denial_text(self) -> bool {
        matches!(self, CaseStatus::Denied | CaseStatus::Appeal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentOutcome {
    Failed,
    Intolerant,
    Contraindicated,
    Ineffective,
}

impl fmt::Display for TreatmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TreatmentOutcome::Failed => "failed",
            TreatmentOutcome::Intolerant => "intolerant",
            TreatmentOutcome::Contraindicated => "contraindicated",
            TreatmentOutcome::Ineffective => "ineffective",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorTreatment {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub outcome: TreatmentOutcome,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskFactor {
    Suicidality,
    HospitalizationHistory,
    SubstanceUse,
    Comorbidities,
}

impl RiskFactor {
    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::Suicidality => "Suicidality / self-harm risk",
            RiskFactor::HospitalizationHistory => "Psychiatric hospitalization history",
            RiskFactor::SubstanceUse => "Substance use",
            RiskFactor::Comorbidities => "Significant comorbidities",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerInfo {
    #[serde(default)]
    pub payer_name: String,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub denial_reason_code: Option<String>,
    #[serde(default)]
    pub denial_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPlaceholder {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub added_at: i64,
}

/// A de-identified clinical case. Never holds PHI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub service_or_drug: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub prior_treatments: Vec<PriorTreatment>,
    #[serde(default)]
    pub severity: Option<String>,
    /// Recorded risk factors in entry order.
    #[serde(default)]
    pub risk_factors: Vec<RiskFactor>,
    #[serde(default)]
    pub risk_factor_notes: BTreeMap<RiskFactor, String>,
    #[serde(default)]
    pub visit_date: Option<String>,
    #[serde(default)]
    pub mse_summary: Option<String>,
    #[serde(default)]
    pub functional_impairment: Option<String>,
    #[serde(default)]
    pub monitoring_plan: Option<String>,
    #[serde(default)]
    pub payer_reference_number: Option<String>,
    #[serde(default)]
    pub payer: Option<PayerInfo>,
    #[serde(default)]
    pub attachments: Vec<AttachmentPlaceholder>,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub archived_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    /// Pin order is footnote order.
    #[serde(default)]
    pub pinned_evidence_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateCategory {
    #[serde(rename = "Authorization templates")]
    Authorization,
    #[serde(rename = "Letters templates")]
    Letters,
    #[serde(rename = "Clinical note templates")]
    ClinicalNote,
    #[serde(rename = "AVS templates")]
    Avs,
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TemplateCategory::Authorization => "Authorization templates",
            TemplateCategory::Letters => "Letters templates",
            TemplateCategory::ClinicalNote => "Clinical note templates",
            TemplateCategory::Avs => "AVS templates",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateTone {
    Formal,
    #[default]
    Neutral,
    Concise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub category: TemplateCategory,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub tone: TemplateTone,
    #[serde(default)]
    pub archived_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceStrength {
    High,
    Moderate,
    Low,
    Consensus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub url_placeholder: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub specialty: String,
    pub strength_level: EvidenceStrength,
    #[serde(default)]
    pub is_custom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PaPack,
    AppealLetter,
    ReferralLetter,
    SickNote,
    DisabilityLetter,
    PaSupportLetter,
    PatientSummary,
    SoapNote,
    HpiPeMdmNote,
    Avs,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 10] = [
        DocumentKind::PaPack,
        DocumentKind::AppealLetter,
        DocumentKind::ReferralLetter,
        DocumentKind::SickNote,
        DocumentKind::DisabilityLetter,
        DocumentKind::PaSupportLetter,
        DocumentKind::PatientSummary,
        DocumentKind::SoapNote,
        DocumentKind::HpiPeMdmNote,
        DocumentKind::Avs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::PaPack => "pa_pack",
            DocumentKind::AppealLetter => "appeal_letter",
            DocumentKind::ReferralLetter => "referral_letter",
            DocumentKind::SickNote => "sick_note",
            DocumentKind::DisabilityLetter => "disability_letter",
            DocumentKind::PaSupportLetter => "pa_support_letter",
            DocumentKind::PatientSummary => "patient_summary",
            DocumentKind::SoapNote => "soap_note",
            DocumentKind::HpiPeMdmNote => "hpi_pe_mdm_note",
            DocumentKind::Avs => "avs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim())
    }

    /// Kinds whose output carries footnoted evidence.
    pub fn cites_evidence(self) -> bool {
        matches!(
            self,
            DocumentKind::PaPack | DocumentKind::AppealLetter | DocumentKind::PaSupportLetter
        )
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub footnote_number: usize,
    pub evidence_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub title: String,
    pub content_md: String,
    pub citations: Vec<Citation>,
    pub missing_info_checklist: Vec<String>,
    pub risk_warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_json_uses_stored_shape() {
        let raw = r#"{
            "id": "c-1",
            "diagnosis": "MDD",
            "serviceOrDrug": "Drug X",
            "priorTreatments": [{"name": "Sertraline", "outcome": "failed"}],
            "riskFactors": ["substanceUse"],
            "riskFactorNotes": {"substanceUse": "remote"},
            "payer": {"payerName": "Aetna", "denialText": "Not necessary"},
            "status": "in_progress",
            "pinnedEvidenceIds": ["e2", "e1"]
        }"#;
        let c: CaseRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(c.status, CaseStatus::InProgress);
        assert_eq!(c.prior_treatments[0].outcome, TreatmentOutcome::Failed);
        assert_eq!(c.risk_factor_notes.get(&RiskFactor::SubstanceUse).map(String::as_str), Some("remote"));
        assert_eq!(c.payer.as_ref().and_then(|p| p.plan_type.as_deref()), None);
        assert!(c.severity.is_none());

        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(back["serviceOrDrug"], "Drug X");
        assert_eq!(back["status"], "in_progress");
    }

    #[test]
    fn kinds_round_trip_through_their_names() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
        assert_eq!(DocumentKind::parse("memo"), None);
    }
}
