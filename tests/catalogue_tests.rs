use std::fs;

use casedoc::{CatalogueError, TemplateCatalogue, TemplateCategory, DEFAULT_PA_PACK_TEMPLATE_ID};

const OVERRIDE_PA: &str = r#"
id: tmpl-auth-pa-pack-standard
name: Clinic PA pack
category: Authorization templates
requiredFields: [diagnosis]
content: "Clinic pack for {{diagnosis}}"
"#;

const EXTRA_LETTERS: &str = r#"
- id: clinic-return-to-work
  category: Letters templates
  tone: concise
  content: "Fit to return after {{duration}}."
- id: clinic-school-note
  category: Letters templates
  content: "School note: {{ duration }} / {{diagnosis}}"
"#;

#[test]
fn builtin_has_one_template_per_default_and_category() {
    let cat = TemplateCatalogue::builtin().unwrap();
    for category in [
        TemplateCategory::Authorization,
        TemplateCategory::Letters,
        TemplateCategory::ClinicalNote,
        TemplateCategory::Avs,
    ] {
        assert!(cat.first_in_category(category).is_some(), "{}", category);
    }
    let pa = cat.get(DEFAULT_PA_PACK_TEMPLATE_ID).unwrap();
    assert_eq!(
        pa.required_fields,
        vec!["diagnosis", "serviceOrDrug", "dosage", "frequency", "duration", "priorTreatments"]
    );
    assert!(TemplateCatalogue::placeholders(pa).contains(&"medicalNecessityRationale".to_string()));
}

#[test]
fn load_dir_adds_and_overrides_in_place() {
    let td = tempfile::tempdir().unwrap();
    let dir = td.path().join("templates");
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("a_override.yaml"), OVERRIDE_PA).unwrap();
    fs::write(dir.join("nested").join("letters.yaml"), EXTRA_LETTERS).unwrap();
    fs::write(dir.join("notes.txt"), "not yaml").unwrap();

    let mut cat = TemplateCatalogue::builtin().unwrap();
    let before = cat.templates().len();
    let pos = cat.templates().iter().position(|t| t.id == DEFAULT_PA_PACK_TEMPLATE_ID).unwrap();

    let pattern = format!("{}/**/*.yaml", dir.display());
    let loaded = cat.load_dir(&pattern).unwrap();
    assert_eq!(loaded, 3);
    assert_eq!(cat.templates().len(), before + 2);
    assert_eq!(cat.templates()[pos].content, "Clinic pack for {{diagnosis}}");

    let school = cat.get("clinic-school-note").unwrap();
    assert_eq!(TemplateCatalogue::placeholders(school), vec!["duration", "diagnosis"]);
}

#[test]
fn plain_directory_means_top_level_yaml() {
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("one.yaml"), OVERRIDE_PA).unwrap();
    fs::create_dir_all(td.path().join("deeper")).unwrap();
    fs::write(td.path().join("deeper").join("two.yaml"), EXTRA_LETTERS).unwrap();

    let mut cat = TemplateCatalogue::default();
    let loaded = cat.load_dir(&td.path().display().to_string()).unwrap();
    assert_eq!(loaded, 1);
    assert!(cat.get("clinic-return-to-work").is_none());
}

#[test]
fn missing_directory_loads_nothing() {
    let td = tempfile::tempdir().unwrap();
    let mut cat = TemplateCatalogue::default();
    let pattern = format!("{}/absent/**/*.yaml", td.path().display());
    assert_eq!(cat.load_dir(&pattern).unwrap(), 0);
    assert!(cat.is_empty());
}

#[test]
fn bad_files_name_the_path() {
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("broken.yaml"), "id: [unclosed").unwrap();
    let mut cat = TemplateCatalogue::default();
    match cat.load_dir(&td.path().display().to_string()) {
        Err(CatalogueError::Parse(msg)) => assert!(msg.contains("broken.yaml")),
        other => panic!("expected parse error, got {:?}", other),
    }

    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("blank.yaml"), "id: x\ncategory: AVS templates\ncontent: '  '\n").unwrap();
    match cat.load_dir(&td.path().display().to_string()) {
        Err(CatalogueError::Invalid(msg)) => {
            assert!(msg.contains("blank.yaml"));
            assert!(msg.contains("empty content"));
        }
        other => panic!("expected invalid template, got {:?}", other),
    }
}

#[test]
fn unknown_category_is_rejected() {
    let raw = "id: x\ncategory: Billing templates\ncontent: hi\n";
    assert!(matches!(casedoc::parse_templates(raw), Err(CatalogueError::Parse(_))));
}
