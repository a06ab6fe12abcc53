//! Derived narrative blocks shared by the document generators. Templates rely on
//! these literal structures, so wording changes here are output changes.

use crate::model::CaseRecord;

pub const NO_PRIOR_TREATMENTS: &str =
    "_No prior treatments recorded. Please add prior trials, outcomes, and notes._";
pub const NO_RISK_FACTORS: &str =
    "No specific high-risk factors recorded in this de-identified case card.";
pub const NO_MISSING_FIELDS: &str = "- [x] No missing required fields detected (review clinically).";

pub(crate) fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn or_marker<'a>(v: &'a str, marker: &'a str) -> &'a str {
    if v.trim().is_empty() {
        marker
    } else {
        v
    }
}

pub fn prior_treatment_section(c: &CaseRecord) -> String {
    if c.prior_treatments.is_empty() {
        return NO_PRIOR_TREATMENTS.to_string();
    }
    c.prior_treatments
        .iter()
        .map(|t| {
            let note = or_marker(&t.note, "[ADD NOTE]");
            format!("- **{}** — _{}_: {} ", t.name, t.outcome, note)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn risk_factor_section(c: &CaseRecord) -> String {
    if c.risk_factors.is_empty() {
        return NO_RISK_FACTORS.to_string();
    }
    c.risk_factors
        .iter()
        .map(|k| match non_blank(c.risk_factor_notes.get(k).map(String::as_str)) {
            Some(note) => format!("- {}: {}", k.label(), note),
            None => format!("- {}", k.label()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn medical_necessity_rationale(c: &CaseRecord) -> String {
    let service = or_marker(&c.service_or_drug, "[SERVICE/DRUG]");
    let diagnosis = or_marker(&c.diagnosis, "[DIAGNOSIS]");

    let visit = match non_blank(c.visit_date.as_deref()) {
        Some(d) => format!("Encounter date (de-identified): **{}**.", d),
        None => "Encounter date: **[ADD VISIT DATE]**.".to_string(),
    };
    let severity = match non_blank(c.severity.as_deref()) {
        Some(s) => format!("Severity/scale: **{}**.", s),
        None => "Severity/scale: **[ADD SEVERITY]**.".to_string(),
    };
    let impairment = match non_blank(c.functional_impairment.as_deref()) {
        Some(f) => format!("Functional impairment: {}", f),
        None => "Functional impairment: **[ADD FUNCTIONAL IMPAIRMENT]**.".to_string(),
    };
    let prior = if c.prior_treatments.is_empty() {
        "Prior therapy history is incomplete; please document prior trials and outcomes."
    } else {
        "Prior therapy history shows multiple trials with documented outcomes."
    };

    [
        format!(
            "The requested therapy (**{}**) is indicated for **{}** in the context of the patient’s clinical course.",
            service, diagnosis
        ),
        visit,
        severity,
        impairment,
        prior.to_string(),
        "The goal is to reduce symptom burden, improve function, and prevent clinical deterioration.".to_string(),
    ]
    .join("\n\n")
}

pub fn missing_checklist_md(missing: &[String]) -> String {
    if missing.is_empty() {
        return NO_MISSING_FIELDS.to_string();
    }
    missing
        .iter()
        .map(|m| format!("- [ ] Missing: **{}**", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed disclaimers attached to every generated document.
pub fn risk_warnings() -> Vec<String> {
    vec![
        "Demo output — **clinician review required**. This content is generated from local templates and rules; it is not medical advice.".to_string(),
        "Do **not** include PHI (names, MRN, phone, email). This workspace is designed for de-identified demo content.".to_string(),
    ]
}
