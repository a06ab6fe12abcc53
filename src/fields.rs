//! Missing-field detection and completeness scoring.
//!
//! Required-field names in templates are dotted paths into an enriched view of a
//! case: the case's own fields plus the payer sub-fields, reachable both as
//! `payer.denialText` and as the flattened `denialText`. Paths are resolved by an
//! explicit match; an unknown path resolves to nothing and therefore counts as
//! missing, the same as an absent value.

use serde::{Deserialize, Serialize};

use crate::catalogue::{default_pa_pack_template, TemplateCatalogue};
use crate::model::{CaseRecord, PayerInfo, Template};

pub const SEVERITY_FIELD: &str = "severity";
pub const DENIAL_TEXT_FIELD: &str = "payer.denialText";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    Id,
    Specialty,
    Diagnosis,
    ServiceOrDrug,
    Dosage,
    Frequency,
    Duration,
    PriorTreatments,
    Severity,
    RiskFactors,
    VisitDate,
    MseSummary,
    FunctionalImpairment,
    MonitoringPlan,
    PayerReferenceNumber,
    Attachments,
    PinnedEvidenceIds,
    Payer,
    PayerName,
    PlanType,
    DenialReasonCode,
    DenialText,
}

impl FieldPath {
    pub fn parse(path: &str) -> Option<Self> {
        let p = match path {
            "id" => FieldPath::Id,
            "specialty" => FieldPath::Specialty,
            "diagnosis" => FieldPath::Diagnosis,
            "serviceOrDrug" => FieldPath::ServiceOrDrug,
            "dosage" => FieldPath::Dosage,
            "frequency" => FieldPath::Frequency,
            "duration" => FieldPath::Duration,
            "priorTreatments" => FieldPath::PriorTreatments,
            "severity" => FieldPath::Severity,
            "riskFactors" => FieldPath::RiskFactors,
            "visitDate" => FieldPath::VisitDate,
            "mseSummary" => FieldPath::MseSummary,
            "functionalImpairment" => FieldPath::FunctionalImpairment,
            "monitoringPlan" => FieldPath::MonitoringPlan,
            "payerReferenceNumber" => FieldPath::PayerReferenceNumber,
            "attachments" => FieldPath::Attachments,
            "pinnedEvidenceIds" => FieldPath::PinnedEvidenceIds,
            "payer" => FieldPath::Payer,
            "payer.payerName" | "payerName" => FieldPath::PayerName,
            "payer.planType" | "planType" => FieldPath::PlanType,
            "payer.denialReasonCode" | "denialReasonCode" => FieldPath::DenialReasonCode,
            "payer.denialText" | "denialText" => FieldPath::DenialText,
            _ => return None,
        };
        Some(p)
    }
}

/// A resolved field, reduced to what emptiness checks need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Absent,
    Text(&'a str),
    List(usize),
    Object,
}

impl FieldValue<'_> {
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(n) => *n == 0,
            FieldValue::Object => false,
        }
    }
}

fn opt_text(v: &Option<String>) -> FieldValue<'_> {
    v.as_deref().map(FieldValue::Text).unwrap_or(FieldValue::Absent)
}

fn payer_text<'a>(payer: &'a Option<PayerInfo>, f: impl Fn(&'a PayerInfo) -> FieldValue<'a>) -> FieldValue<'a> {
    payer.as_ref().map(f).unwrap_or(FieldValue::Absent)
}

pub fn resolve_field(c: &CaseRecord, path: FieldPath) -> FieldValue<'_> {
    match path {
        FieldPath::Id => FieldValue::Text(&c.id),
        FieldPath::Specialty => FieldValue::Text(&c.specialty),
        FieldPath::Diagnosis => FieldValue::Text(&c.diagnosis),
        FieldPath::ServiceOrDrug => FieldValue::Text(&c.service_or_drug),
        FieldPath::Dosage => FieldValue::Text(&c.dosage),
        FieldPath::Frequency => FieldValue::Text(&c.frequency),
        FieldPath::Duration => FieldValue::Text(&c.duration),
        FieldPath::PriorTreatments => FieldValue::List(c.prior_treatments.len()),
        FieldPath::Severity => opt_text(&c.severity),
        FieldPath::RiskFactors => FieldValue::List(c.risk_factors.len()),
        FieldPath::VisitDate => opt_text(&c.visit_date),
        FieldPath::MseSummary => opt_text(&c.mse_summary),
        FieldPath::FunctionalImpairment => opt_text(&c.functional_impairment),
        FieldPath::MonitoringPlan => opt_text(&c.monitoring_plan),
        FieldPath::PayerReferenceNumber => opt_text(&c.payer_reference_number),
        FieldPath::Attachments => FieldValue::List(c.attachments.len()),
        FieldPath::PinnedEvidenceIds => FieldValue::List(c.pinned_evidence_ids.len()),
        FieldPath::Payer => c.payer.as_ref().map(|_| FieldValue::Object).unwrap_or(FieldValue::Absent),
        FieldPath::PayerName => payer_text(&c.payer, |p| FieldValue::Text(&p.payer_name)),
        FieldPath::PlanType => payer_text(&c.payer, |p| opt_text(&p.plan_type)),
        FieldPath::DenialReasonCode => payer_text(&c.payer, |p| opt_text(&p.denial_reason_code)),
        FieldPath::DenialText => payer_text(&c.payer, |p| opt_text(&p.denial_text)),
    }
}

/// True when the dotted `path` has no usable value on the case.
pub fn is_field_missing(c: &CaseRecord, path: &str) -> bool {
    match FieldPath::parse(path) {
        Some(fp) => resolve_field(c, fp).is_missing(),
        None => true,
    }
}

/// Checks that apply to every case regardless of template: severity always,
/// denial text once the case is denied or under appeal.
pub fn deterministic_checks(c: &CaseRecord) -> Vec<&'static str> {
    let mut checks = vec![SEVERITY_FIELD];
    if c.status.requires_denial_text() {
        checks.push(DENIAL_TEXT_FIELD);
    }
    checks
}

fn push_unique(out: &mut Vec<String>, field: &str) {
    if !out.iter().any(|f| f == field) {
        out.push(field.to_string());
    }
}

/// Missing fields for `template`, in template order, followed by the deterministic
/// extras. Duplicates collapse to the first occurrence.
pub fn missing_fields(c: &CaseRecord, template: &Template) -> Vec<String> {
    missing_for_required(c, &template.required_fields)
}

fn missing_for_required(c: &CaseRecord, required: &[String]) -> Vec<String> {
    let mut missing = Vec::new();
    for field in required {
        if is_field_missing(c, field) {
            push_unique(&mut missing, field);
        }
    }
    for field in deterministic_checks(c) {
        if is_field_missing(c, field) {
            push_unique(&mut missing, field);
        }
    }
    missing
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletenessTone {
    Green,
    Amber,
    Red,
}

impl CompletenessTone {
    pub fn for_percent(percent: u8) -> Self {
        if percent >= 85 {
            CompletenessTone::Green
        } else if percent >= 60 {
            CompletenessTone::Amber
        } else {
            CompletenessTone::Red
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseCompleteness {
    pub percent: u8,
    pub missing: Vec<String>,
    pub total_checks: usize,
    pub tone: CompletenessTone,
}

/// Score a case against the reference PA-pack template plus the deterministic checks.
pub fn compute_completeness(c: &CaseRecord, catalogue: &TemplateCatalogue) -> CaseCompleteness {
    let required: &[String] = default_pa_pack_template(catalogue)
        .map(|t| t.required_fields.as_slice())
        .unwrap_or(&[]);

    let mut total: Vec<String> = Vec::new();
    for field in required {
        push_unique(&mut total, field);
    }
    for field in deterministic_checks(c) {
        push_unique(&mut total, field);
    }

    let missing = missing_for_required(c, required);
    let missing_count = total.iter().filter(|k| missing.contains(k)).count();
    let total_checks = total.len().max(1);
    let ratio = 1.0 - missing_count as f64 / total_checks as f64;
    let percent = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;

    CaseCompleteness {
        percent,
        missing,
        total_checks,
        tone: CompletenessTone::for_percent(percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CaseStatus;

    #[test]
    fn unknown_paths_count_as_missing() {
        let c = CaseRecord { id: "c1".into(), ..Default::default() };
        assert!(is_field_missing(&c, "payer.memberId"));
        assert!(is_field_missing(&c, ""));
        assert!(!is_field_missing(&c, "id"));
    }

    #[test]
    fn payer_paths_resolve_both_spellings() {
        let c = CaseRecord {
            payer: Some(PayerInfo {
                payer_name: "Acme".into(),
                denial_text: Some("  ".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!is_field_missing(&c, "payer.payerName"));
        assert!(!is_field_missing(&c, "payerName"));
        assert!(is_field_missing(&c, "payer.denialText"));
        assert!(is_field_missing(&c, "planType"));
        assert!(!is_field_missing(&c, "payer"));
    }

    #[test]
    fn tone_thresholds() {
        assert_eq!(CompletenessTone::for_percent(85), CompletenessTone::Green);
        assert_eq!(CompletenessTone::for_percent(84), CompletenessTone::Amber);
        assert_eq!(CompletenessTone::for_percent(60), CompletenessTone::Amber);
        assert_eq!(CompletenessTone::for_percent(59), CompletenessTone::Red);
    }

    #[test]
    fn empty_catalogue_still_scores_extras() {
        let c = CaseRecord { status: CaseStatus::Denied, ..Default::default() };
        let out = compute_completeness(&c, &TemplateCatalogue::default());
        assert_eq!(out.total_checks, 2);
        assert_eq!(out.percent, 0);
        assert_eq!(out.tone, CompletenessTone::Red);
    }
}
