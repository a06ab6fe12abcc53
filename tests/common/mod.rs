#![allow(dead_code)]

use casedoc::{
    CaseRecord, CaseStatus, EvidenceItem, EvidenceStrength, PayerInfo, PriorTreatment, RiskFactor, Template,
    TemplateCategory, TemplateTone, TreatmentOutcome,
};

pub fn template(id: &str, category: TemplateCategory, required: &[&str], content: &str) -> Template {
    Template {
        id: id.to_string(),
        name: id.to_string(),
        category,
        specialty: "General".to_string(),
        payer: None,
        description: String::new(),
        content: content.to_string(),
        required_fields: required.iter().map(|s| s.to_string()).collect(),
        tone: TemplateTone::Neutral,
        archived_at: None,
    }
}

pub fn evidence(id: &str, title: &str) -> EvidenceItem {
    EvidenceItem {
        id: id.to_string(),
        title: title.to_string(),
        snippet: format!("Snippet for {}", id),
        source_name: "Journal".to_string(),
        year: 2021,
        url_placeholder: String::new(),
        tags: Vec::new(),
        specialty: "Psychiatry".to_string(),
        strength_level: EvidenceStrength::High,
        is_custom: false,
    }
}

/// A fully documented denied case.
pub fn complete_case() -> CaseRecord {
    let mut c = CaseRecord {
        id: "case-001".to_string(),
        specialty: "Psychiatry".to_string(),
        diagnosis: "Major Depressive Disorder, recurrent, severe".to_string(),
        service_or_drug: "Esketamine nasal spray".to_string(),
        dosage: "84 mg".to_string(),
        frequency: "Twice weekly".to_string(),
        duration: "4 weeks".to_string(),
        prior_treatments: vec![
            PriorTreatment {
                id: "t1".to_string(),
                name: "Sertraline".to_string(),
                outcome: TreatmentOutcome::Ineffective,
                note: "12 weeks at 200 mg.".to_string(),
            },
            PriorTreatment {
                id: "t2".to_string(),
                name: "Venlafaxine".to_string(),
                outcome: TreatmentOutcome::Intolerant,
                note: String::new(),
            },
        ],
        severity: Some("PHQ-9: 22 (severe)".to_string()),
        risk_factors: vec![RiskFactor::HospitalizationHistory],
        visit_date: Some("2024-01-15".to_string()),
        functional_impairment: Some("Unable to work for 3 months.".to_string()),
        mse_summary: Some("Flat affect, no psychosis.".to_string()),
        monitoring_plan: Some("2-hour in-clinic observation per dose.".to_string()),
        payer: Some(PayerInfo {
            payer_name: "BlueCross (Demo)".to_string(),
            plan_type: Some("Commercial PPO".to_string()),
            denial_reason_code: Some("MN-01".to_string()),
            denial_text: Some("Medical necessity not established.".to_string()),
        }),
        status: CaseStatus::Denied,
        pinned_evidence_ids: vec!["ev-2".to_string(), "ev-1".to_string()],
        ..Default::default()
    };
    c.risk_factor_notes
        .insert(RiskFactor::HospitalizationHistory, "Inpatient stay 2022".to_string());
    c
}

pub fn sparse_case() -> CaseRecord {
    CaseRecord {
        id: "case-002".to_string(),
        diagnosis: "MDD".to_string(),
        service_or_drug: "Drug X".to_string(),
        ..Default::default()
    }
}
