//! Document generation: one builder per [`DocumentKind`], dispatched by kind.
//!
//! Catalogue-backed builders share the same steps: resolve the template, compute
//! missing fields, build citations when the kind cites evidence, assemble a flat
//! context and render. The HPI/PE/MDM note is the exception and assembles fixed
//! sections without a template.

use std::collections::HashMap;

use crate::catalogue::{resolve_template, TemplateCatalogue};
use crate::citations::{build_citations, EvidenceLookup};
use crate::error::GenerateError;
use crate::fields::missing_fields;
use crate::model::{CaseRecord, Citation, DocumentKind, GeneratedDocument, Template, TemplateCategory};
use crate::narrative::{
    medical_necessity_rationale, missing_checklist_md, non_blank, or_marker, prior_treatment_section,
    risk_factor_section, risk_warnings,
};
use crate::render::{render_template, RenderContext};

/// Optional, kind-specific inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub template_id: Option<String>,
    pub payer_style: Option<String>,
    pub transcript: Option<String>,
}

impl GenerationRequest {
    fn transcript(&self) -> Option<&str> {
        non_blank(self.transcript.as_deref())
    }
}

/// Consistent snapshot handed to a generator.
pub struct GenerationInput<'a> {
    pub case: &'a CaseRecord,
    pub catalogue: &'a TemplateCatalogue,
    pub evidence: &'a dyn EvidenceLookup,
    pub request: &'a GenerationRequest,
}

/// Default template id and fallback category for catalogue-backed kinds.
pub fn template_rule(kind: DocumentKind) -> Option<(&'static str, TemplateCategory)> {
    let rule = match kind {
        DocumentKind::PaPack => ("tmpl-auth-pa-pack-standard", TemplateCategory::Authorization),
        DocumentKind::AppealLetter => ("tmpl-auth-appeal-formal-generic", TemplateCategory::Authorization),
        DocumentKind::SoapNote => ("tmpl-clinical-soap", TemplateCategory::ClinicalNote),
        DocumentKind::Avs => ("tmpl-avs-standard", TemplateCategory::Avs),
        DocumentKind::ReferralLetter => ("tmpl-letters-referral", TemplateCategory::Letters),
        DocumentKind::SickNote => ("tmpl-letters-sick-note", TemplateCategory::Letters),
        DocumentKind::DisabilityLetter => ("tmpl-letters-disability", TemplateCategory::Letters),
        DocumentKind::PaSupportLetter => ("tmpl-letters-pa-support", TemplateCategory::Letters),
        DocumentKind::PatientSummary => ("tmpl-letters-patient-treatment-summary", TemplateCategory::Letters),
        DocumentKind::HpiPeMdmNote => return None,
    };
    Some(rule)
}

pub fn generate_document(
    kind: DocumentKind,
    case: &CaseRecord,
    catalogue: &TemplateCatalogue,
    evidence: &dyn EvidenceLookup,
    request: &GenerationRequest,
) -> Result<GeneratedDocument, GenerateError> {
    let input = GenerationInput { case, catalogue, evidence, request };
    let doc = match kind {
        DocumentKind::PaPack => pa_pack(&input)?,
        DocumentKind::AppealLetter => appeal_letter(&input)?,
        DocumentKind::SoapNote => soap_note(&input)?,
        DocumentKind::Avs => avs(&input)?,
        DocumentKind::ReferralLetter => referral_letter(&input)?,
        DocumentKind::SickNote => sick_note(&input)?,
        DocumentKind::DisabilityLetter => disability_letter(&input)?,
        DocumentKind::PaSupportLetter => pa_support_letter(&input)?,
        DocumentKind::PatientSummary => patient_summary(&input)?,
        DocumentKind::HpiPeMdmNote => hpi_pe_mdm_note(case, request),
    };
    tracing::debug!(
        kind = %kind,
        case_id = %case.id,
        missing = doc.missing_info_checklist.len(),
        citations = doc.citations.len(),
        "generated document"
    );
    Ok(doc)
}

/// Read-only case source for the dispatch layer.
pub trait CaseProvider {
    fn case(&self, id: &str) -> Option<&CaseRecord>;
}

impl CaseProvider for [CaseRecord] {
    fn case(&self, id: &str) -> Option<&CaseRecord> {
        self.iter().find(|c| c.id == id)
    }
}

impl CaseProvider for Vec<CaseRecord> {
    fn case(&self, id: &str) -> Option<&CaseRecord> {
        self.as_slice().case(id)
    }
}

impl CaseProvider for HashMap<String, CaseRecord> {
    fn case(&self, id: &str) -> Option<&CaseRecord> {
        self.get(id)
    }
}

/// Look the case up first; an unknown id is fatal rather than an empty document.
pub fn generate_for_case(
    cases: &dyn CaseProvider,
    case_id: &str,
    kind: DocumentKind,
    catalogue: &TemplateCatalogue,
    evidence: &dyn EvidenceLookup,
    request: &GenerationRequest,
) -> Result<GeneratedDocument, GenerateError> {
    let case = cases
        .case(case_id)
        .ok_or_else(|| GenerateError::CaseNotFound(case_id.to_string()))?;
    generate_document(kind, case, catalogue, evidence, request)
}

fn template_for<'a>(input: &GenerationInput<'a>, kind: DocumentKind) -> Result<&'a Template, GenerateError> {
    let (default_id, category) = template_rule(kind).ok_or(GenerateError::NoTemplate {
        category: TemplateCategory::ClinicalNote,
    })?;
    resolve_template(input.catalogue, input.request.template_id.as_deref(), default_id, category)
}

fn title(prefix: &str, v: &str, fallback: &str) -> String {
    format!("{} — {}", prefix, or_marker(v, fallback))
}

fn trimmed_or(v: Option<&str>, marker: &str) -> String {
    non_blank(v).unwrap_or(marker).to_string()
}

fn set(ctx: &mut RenderContext, key: &str, value: impl Into<String>) {
    ctx.insert(key.to_string(), value.into());
}

/// Direct case fields and payer fields under both bare and dotted keys.
fn base_context(c: &CaseRecord) -> RenderContext {
    let mut ctx = RenderContext::new();
    set(&mut ctx, "diagnosis", c.diagnosis.as_str());
    set(&mut ctx, "serviceOrDrug", c.service_or_drug.as_str());
    set(&mut ctx, "dosage", c.dosage.as_str());
    set(&mut ctx, "frequency", c.frequency.as_str());
    set(&mut ctx, "duration", c.duration.as_str());

    let payer = c.payer.as_ref();
    let fields = [
        ("payerName", payer.map(|p| p.payer_name.clone())),
        ("planType", payer.and_then(|p| p.plan_type.clone())),
        ("denialReasonCode", payer.and_then(|p| p.denial_reason_code.clone())),
        ("denialText", payer.and_then(|p| p.denial_text.clone())),
    ];
    for (key, value) in fields {
        let value = value.unwrap_or_default();
        set(&mut ctx, &format!("payer.{}", key), value.clone());
        set(&mut ctx, key, value);
    }
    ctx
}

/// Narrative fields the authorization documents share.
fn clinical_narrative(ctx: &mut RenderContext, c: &CaseRecord) {
    set(ctx, "severity", trimmed_or(c.severity.as_deref(), "[ADD SEVERITY]"));
    set(ctx, "visitDate", trimmed_or(c.visit_date.as_deref(), "[ADD VISIT DATE]"));
    set(
        ctx,
        "functionalImpairment",
        trimmed_or(c.functional_impairment.as_deref(), "[ADD FUNCTIONAL IMPAIRMENT]"),
    );
    set(ctx, "mseSummary", trimmed_or(c.mse_summary.as_deref(), "[ADD MSE SUMMARY]"));
    set(ctx, "monitoringPlan", trimmed_or(c.monitoring_plan.as_deref(), "[ADD MONITORING PLAN]"));
    set(ctx, "medicalNecessityRationale", medical_necessity_rationale(c));
    set(ctx, "priorTreatmentSection", prior_treatment_section(c));
    set(ctx, "riskSafetySection", risk_factor_section(c));
}

fn finish(title: String, template: &Template, ctx: &RenderContext, citations: Vec<Citation>, missing: Vec<String>) -> GeneratedDocument {
    GeneratedDocument {
        title,
        content_md: render_template(&template.content, ctx),
        citations,
        missing_info_checklist: missing,
        risk_warnings: risk_warnings(),
    }
}

fn pa_pack(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::PaPack)?;
    let missing = missing_fields(c, template);
    let cites = build_citations(&c.id, &c.pinned_evidence_ids, input.evidence);

    let mut ctx = base_context(c);
    clinical_narrative(&mut ctx, c);
    set(&mut ctx, "missingInfoChecklist", missing_checklist_md(&missing));
    set(&mut ctx, "footnotes", cites.footnotes_md);
    set(
        &mut ctx,
        "executiveSummary",
        format!(
            "Requesting PA for **{}** for **{}**.",
            or_marker(&c.service_or_drug, "[SERVICE/DRUG]"),
            or_marker(&c.diagnosis, "[DIAGNOSIS]")
        ),
    );

    Ok(finish(title("PA Evidence Pack", &c.service_or_drug, "Case"), template, &ctx, cites.citations, missing))
}

fn appeal_letter(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::AppealLetter)?;
    let missing = missing_fields(c, template);
    let cites = build_citations(&c.id, &c.pinned_evidence_ids, input.evidence);

    let mut ctx = base_context(c);
    clinical_narrative(&mut ctx, c);
    // Without any payer record the letter still names the slots to fill.
    let payer = c.payer.as_ref();
    set(&mut ctx, "payerName", payer.map(|p| p.payer_name.clone()).unwrap_or_else(|| "[PAYER_NAME]".into()));
    set(
        &mut ctx,
        "denialText",
        payer.and_then(|p| p.denial_text.clone()).unwrap_or_else(|| "[DENIAL_TEXT]".into()),
    );
    set(&mut ctx, "missingInfoChecklist", missing_checklist_md(&missing));
    set(&mut ctx, "footnotes", cites.footnotes_md);
    set(
        &mut ctx,
        "executiveSummary",
        format!(
            "This appeal summarizes the clinical rationale for **{}** in **{}** and addresses denial criteria.",
            or_marker(&c.service_or_drug, "[SERVICE/DRUG]"),
            or_marker(&c.diagnosis, "[DIAGNOSIS]")
        ),
    );

    let style = non_blank(input.request.payer_style.as_deref())
        .map(|s| format!("{} ", s))
        .unwrap_or_default();
    let title = format!("Appeal Letter — {}{}", style, or_marker(&c.service_or_drug, "Case"))
        .trim()
        .to_string();
    Ok(finish(title, template, &ctx, cites.citations, missing))
}

fn soap_note(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::SoapNote)?;
    let missing = missing_fields(c, template);

    let mut ctx = base_context(c);
    let severity = non_blank(c.severity.as_deref());
    set(&mut ctx, "severity", severity.unwrap_or("[ADD SEVERITY]"));
    set(
        &mut ctx,
        "subjective",
        match input.request.transcript() {
            Some(t) => format!("Transcript summary (pasted):\n\n> {}", t),
            None => "_No transcript provided._".to_string(),
        },
    );
    set(
        &mut ctx,
        "objective",
        format!("Severity/scale: **{}**.", severity.unwrap_or("[ADD SEVERITY]")),
    );
    set(&mut ctx, "followUpPlan", "Follow-up plan to be confirmed by clinician.");

    Ok(finish(title("SOAP Note", &c.service_or_drug, "Case"), template, &ctx, Vec::new(), missing))
}

fn avs(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::Avs)?;
    let missing = missing_fields(c, template);

    let mut ctx = base_context(c);
    set(
        &mut ctx,
        "monitoringPlan",
        trimmed_or(c.monitoring_plan.as_deref(), "Monitoring plan to be confirmed by clinician."),
    );
    set(
        &mut ctx,
        "patientSafetyNotes",
        "If you experience worsening symptoms or safety concerns, contact your clinician or seek urgent care according to your local policy.",
    );
    let next_steps = if input.request.transcript().is_some() {
        "Next steps based on today’s discussion:\n\n- Review plan details\n- Schedule follow-up\n- Bring questions from transcript notes"
    } else {
        "- Schedule follow-up as advised\n- Take medication as directed\n- Bring any side effects/concerns to next visit"
    };
    set(&mut ctx, "nextSteps", next_steps);

    Ok(finish(title("After Visit Summary", &c.service_or_drug, "Case"), template, &ctx, Vec::new(), missing))
}

fn referral_letter(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::ReferralLetter)?;
    let missing = missing_fields(c, template);

    let mut ctx = base_context(c);
    set(&mut ctx, "referralReason", "Please evaluate and provide recommendations. (Demo placeholder)");
    set(&mut ctx, "priorTreatmentSection", prior_treatment_section(c));

    Ok(finish(title("Referral Letter", &c.diagnosis, "Case"), template, &ctx, Vec::new(), missing))
}

fn sick_note(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::SickNote)?;
    let missing = missing_fields(c, template);
    let ctx = base_context(c);
    Ok(finish(title("Sick Note", &c.duration, "Duration needed"), template, &ctx, Vec::new(), missing))
}

fn disability_letter(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::DisabilityLetter)?;
    let missing = missing_fields(c, template);
    let ctx = base_context(c);
    Ok(finish(title("Accommodation Letter", &c.diagnosis, "Case"), template, &ctx, Vec::new(), missing))
}

fn pa_support_letter(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::PaSupportLetter)?;
    let missing = missing_fields(c, template);
    let cites = build_citations(&c.id, &c.pinned_evidence_ids, input.evidence);

    let mut ctx = base_context(c);
    set(&mut ctx, "medicalNecessityRationale", medical_necessity_rationale(c));
    set(&mut ctx, "priorTreatmentSection", prior_treatment_section(c));
    set(&mut ctx, "footnotes", cites.footnotes_md);

    Ok(finish(title("PA Support Letter", &c.service_or_drug, "Case"), template, &ctx, cites.citations, missing))
}

fn patient_summary(input: &GenerationInput) -> Result<GeneratedDocument, GenerateError> {
    let c = input.case;
    let template = template_for(input, DocumentKind::PatientSummary)?;
    let missing = missing_fields(c, template);

    let mut ctx = base_context(c);
    set(&mut ctx, "monitoringPlan", trimmed_or(c.monitoring_plan.as_deref(), "[ADD MONITORING PLAN]"));

    Ok(finish(title("Patient-facing Summary", &c.service_or_drug, "Case"), template, &ctx, Vec::new(), missing))
}

/// Fixed-section draft. Its missing list only covers severity and prior
/// treatments and does not consult any template's required fields.
fn hpi_pe_mdm_note(c: &CaseRecord, request: &GenerationRequest) -> GeneratedDocument {
    let hpi = match request.transcript() {
        Some(t) => format!("Transcript excerpt:\n\n> {}", t),
        None => "_No transcript provided._".to_string(),
    };
    let content_md = [
        "# HPI / PE / MDM (Draft)".to_string(),
        String::new(),
        "## HPI".to_string(),
        hpi,
        String::new(),
        "## PE".to_string(),
        "_[Not captured in this demo — add pertinent exam findings as needed]._".to_string(),
        String::new(),
        "## MDM".to_string(),
        format!("Assessment: **{}**", or_marker(&c.diagnosis, "[DIAGNOSIS]")),
        format!(
            "Plan: **{}** ({}, {}, {})",
            or_marker(&c.service_or_drug, "[SERVICE/DRUG]"),
            or_marker(&c.dosage, "[DOSAGE]"),
            or_marker(&c.frequency, "[FREQUENCY]"),
            or_marker(&c.duration, "[DURATION]")
        ),
        String::new(),
        "### Safety / Risk".to_string(),
        risk_factor_section(c),
    ]
    .join("\n");

    let mut missing = Vec::new();
    if non_blank(c.severity.as_deref()).is_none() {
        missing.push("severity".to_string());
    }
    if c.prior_treatments.is_empty() {
        missing.push("priorTreatments".to_string());
    }

    GeneratedDocument {
        title: title("HPI/PE/MDM", &c.service_or_drug, "Case"),
        content_md,
        citations: Vec::new(),
        missing_info_checklist: missing,
        risk_warnings: risk_warnings(),
    }
}
