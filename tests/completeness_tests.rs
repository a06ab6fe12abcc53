mod common;

use casedoc::{
    compute_completeness, is_field_missing, missing_fields, CaseStatus, CompletenessTone, PayerInfo, TemplateCatalogue,
    TemplateCategory, DEFAULT_PA_PACK_TEMPLATE_ID,
};
use common::{complete_case, sparse_case, template};

fn scenario_catalogue() -> TemplateCatalogue {
    TemplateCatalogue::new(vec![template(
        DEFAULT_PA_PACK_TEMPLATE_ID,
        TemplateCategory::Authorization,
        &["diagnosis", "serviceOrDrug", "severity"],
        "{{diagnosis}}",
    )])
}

#[test]
fn severity_duplicate_collapses_and_scores_amber() {
    let catalogue = scenario_catalogue();
    let tpl = catalogue.get(DEFAULT_PA_PACK_TEMPLATE_ID).unwrap();
    let c = sparse_case();

    assert_eq!(missing_fields(&c, tpl), vec!["severity".to_string()]);

    let comp = compute_completeness(&c, &catalogue);
    assert_eq!(comp.total_checks, 3);
    assert_eq!(comp.percent, 67);
    assert_eq!(comp.tone, CompletenessTone::Amber);
    assert_eq!(comp.missing, vec!["severity".to_string()]);
}

#[test]
fn denial_text_required_once_denied_or_appealed() {
    let tpl = template("t", TemplateCategory::Letters, &["diagnosis"], "x");
    for status in [CaseStatus::Denied, CaseStatus::Appeal] {
        let mut c = sparse_case();
        c.severity = Some("moderate".into());
        c.status = status;
        assert_eq!(missing_fields(&c, &tpl), vec!["payer.denialText".to_string()]);

        c.payer = Some(PayerInfo { denial_text: Some("   ".into()), ..Default::default() });
        assert!(missing_fields(&c, &tpl).contains(&"payer.denialText".to_string()));

        c.payer = Some(PayerInfo { denial_text: Some("Not covered".into()), ..Default::default() });
        assert!(missing_fields(&c, &tpl).is_empty());
    }

    let mut submitted = sparse_case();
    submitted.severity = Some("moderate".into());
    submitted.status = CaseStatus::Submitted;
    assert!(missing_fields(&submitted, &tpl).is_empty());
}

#[test]
fn filling_a_missing_field_never_lowers_the_score() {
    let catalogue = TemplateCatalogue::builtin().unwrap();
    let base = sparse_case();
    let before = compute_completeness(&base, &catalogue).percent;

    let mut with_dosage = base.clone();
    with_dosage.dosage = "10 mg".into();
    let mut with_severity = base.clone();
    with_severity.severity = Some("mild".into());
    let mut with_prior = base.clone();
    with_prior.prior_treatments = complete_case().prior_treatments;

    for filled in [with_dosage, with_severity, with_prior] {
        assert!(compute_completeness(&filled, &catalogue).percent >= before);
    }
}

#[test]
fn template_order_then_extras() {
    let tpl = template(
        "t",
        TemplateCategory::Authorization,
        &["payer.payerName", "priorTreatments", "diagnosis", "payer.payerName"],
        "x",
    );
    let mut c = sparse_case();
    c.status = CaseStatus::Appeal;
    assert_eq!(
        missing_fields(&c, &tpl),
        vec!["payer.payerName", "priorTreatments", "severity", "payer.denialText"]
    );
}

#[test]
fn flattened_and_dotted_payer_paths_agree() {
    let mut c = sparse_case();
    c.payer = Some(PayerInfo { payer_name: "Aetna".into(), plan_type: Some(String::new()), ..Default::default() });
    assert!(!is_field_missing(&c, "payer.payerName"));
    assert!(!is_field_missing(&c, "payerName"));
    assert!(is_field_missing(&c, "payer.planType"));
    assert!(is_field_missing(&c, "planType"));
    assert!(!is_field_missing(&c, "payer"));
}

#[test]
fn empty_catalogue_still_scores() {
    let comp = compute_completeness(&sparse_case(), &TemplateCatalogue::default());
    assert_eq!(comp.total_checks, 1);
    assert_eq!(comp.percent, 0);
    assert_eq!(comp.tone, CompletenessTone::Red);

    let full = compute_completeness(&complete_case(), &TemplateCatalogue::default());
    assert_eq!(full.percent, 100);
    assert_eq!(full.tone, CompletenessTone::Green);
}

#[test]
fn builtin_reference_template_scores_complete_case_fully() {
    let catalogue = TemplateCatalogue::builtin().unwrap();
    let comp = compute_completeness(&complete_case(), &catalogue);
    assert!(comp.missing.is_empty());
    assert_eq!(comp.percent, 100);
    // six template fields, severity, denial text
    assert_eq!(comp.total_checks, 8);
}

#[test]
fn falls_back_to_first_authorization_template() {
    let catalogue = TemplateCatalogue::new(vec![
        template("letter", TemplateCategory::Letters, &["dosage"], "x"),
        template("auth-a", TemplateCategory::Authorization, &["diagnosis", "duration"], "x"),
    ]);
    let comp = compute_completeness(&sparse_case(), &catalogue);
    assert_eq!(comp.total_checks, 3);
    assert_eq!(comp.missing, vec!["duration", "severity"]);
    assert_eq!(comp.percent, 33);
    assert_eq!(comp.tone, CompletenessTone::Red);
}
