use std::path::{Path, PathBuf};

use casedoc::catalogue::TemplateCatalogue;
use casedoc::config::DEFAULT_CONFIG_FILE;
use casedoc::{
    compute_completeness, diff_lines, emit_document, format_diff, generate_document, load_config_or_default,
    sha256_hex, to_portal_text, CaseRecord, CasedocConfig, DiffSummary, DocumentKind, EvidenceItem, GenerationRequest,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = r#"usage: casedoc [--config casedoc.yaml] <command> [args]

commands:
  generate --case <case.json> --kind <kind> [--template <id>] [--payer-style <label>] [--transcript <file>] [--portal]
  completeness --case <case.json>
  diff <old.md> <new.md>
  portal <file.md>
  templates

kinds: pa_pack, appeal_letter, soap_note, avs, referral_letter, sick_note,
       disability_letter, pa_support_letter, patient_summary, hpi_pe_mdm_note"#;

fn fail(tool: &str, error: impl std::fmt::Display, code: i32) -> ! {
    eprintln!(
        "{}",
        serde_json::json!({
            "tool": tool,
            "error": error.to_string(),
            "error_code": code
        })
    );
    std::process::exit(code);
}

fn usage(error: &str) -> ! {
    eprintln!("{}", USAGE);
    fail("usage", error, 2);
}

/// Value following `name`, unless the next token is another flag.
fn flag_value(args: &[String], name: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == name)?;
    args.get(pos + 1).filter(|v| !v.starts_with("--")).cloned()
}

const VALUE_FLAGS: [&str; 6] = ["--config", "--case", "--kind", "--template", "--payer-style", "--transcript"];

/// Non-flag arguments, skipping the values of flags that take one.
fn positionals(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip = false;
    for a in args {
        if skip {
            skip = false;
        } else if VALUE_FLAGS.contains(&a.as_str()) {
            skip = true;
        } else if !a.starts_with("--") {
            out.push(a.clone());
        }
    }
    out
}

fn slugify(base: &str) -> String {
    let mut s = String::with_capacity(base.len());
    let mut prev_dash = false;
    for ch in base.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            s.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            s.push('-');
            prev_dash = true;
        }
    }
    let trimmed = s.trim_matches('-');
    if trimmed.is_empty() { "case".to_string() } else { trimmed.to_string() }
}

fn read_text(tool: &str, path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| fail(tool, format!("{}: {}", path.display(), e), 4))
}

fn read_case(path: &Path) -> CaseRecord {
    let raw = read_text("read_case", path);
    serde_json::from_str(&raw).unwrap_or_else(|e| fail("read_case", format!("{}: {}", path.display(), e), 4))
}

fn load_catalogue(cfg: &CasedocConfig) -> TemplateCatalogue {
    let mut catalogue = TemplateCatalogue::builtin().unwrap_or_else(|e| fail("load_templates", e, 3));
    if let Some(glob) = cfg.templates_glob() {
        match catalogue.load_dir(&glob) {
            Ok(n) => eprintln!(
                "{}",
                serde_json::json!({"tool":"load_templates", "glob": glob, "count": n, "total": catalogue.templates().len()})
            ),
            Err(e) => fail("load_templates", e, 3),
        }
    }
    catalogue
}

fn load_evidence(cfg: &CasedocConfig) -> Vec<EvidenceItem> {
    let Some(path) = cfg.evidence_path() else {
        return Vec::new();
    };
    let raw = read_text("load_evidence", Path::new(&path));
    let items: Vec<EvidenceItem> =
        serde_json::from_str(&raw).unwrap_or_else(|e| fail("load_evidence", format!("{}: {}", path, e), 4));
    eprintln!("{}", serde_json::json!({"tool":"load_evidence", "file": path, "count": items.len()}));
    items
}

fn cmd_generate(args: &[String], cfg: &CasedocConfig) {
    let case_path = flag_value(args, "--case").unwrap_or_else(|| usage("generate requires --case"));
    let kind_arg = flag_value(args, "--kind").unwrap_or_else(|| usage("generate requires --kind"));
    let kind = DocumentKind::parse(&kind_arg).unwrap_or_else(|| usage(&format!("unknown kind: {}", kind_arg)));

    let case = read_case(Path::new(&case_path));
    let catalogue = load_catalogue(cfg);
    let evidence = load_evidence(cfg);
    let transcript = flag_value(args, "--transcript").map(|p| read_text("read_transcript", Path::new(&p)));
    let request = GenerationRequest {
        template_id: flag_value(args, "--template"),
        payer_style: flag_value(args, "--payer-style"),
        transcript,
    };

    let doc = generate_document(kind, &case, &catalogue, &evidence, &request)
        .unwrap_or_else(|e| fail("generate", e, 5));
    let completeness = compute_completeness(&case, &catalogue);
    eprintln!(
        "{}",
        serde_json::json!({
            "tool":"generate",
            "case_id": case.id,
            "kind": kind.as_str(),
            "missing": doc.missing_info_checklist,
            "citations": doc.citations.len(),
            "completeness": completeness.percent
        })
    );

    let meta = serde_json::json!({
        "caseId": case.id,
        "kind": kind,
        "title": doc.title,
        "templateId": request.template_id,
        "payerStyle": request.payer_style,
        "citations": doc.citations,
        "missingInfoChecklist": doc.missing_info_checklist,
        "riskWarnings": doc.risk_warnings,
        "completeness": completeness,
        "contentSha256": sha256_hex(doc.content_md.as_bytes()),
    });
    let portal = args.iter().any(|a| a == "--portal").then(|| to_portal_text(&doc.content_md));

    let outdir = PathBuf::from(cfg.output_dir()).join(slugify(&case.id));
    match emit_document(&doc.content_md, &meta, portal.as_deref(), &outdir, kind.as_str()) {
        Ok(paths) => eprintln!(
            "{}",
            serde_json::json!({
                "tool":"emit_document",
                "md_path": paths.md_path,
                "meta_path": paths.meta_path,
                "portal_path": paths.portal_path
            })
        ),
        Err(e) => fail("emit_document", e, 6),
    }
}

fn cmd_completeness(args: &[String], cfg: &CasedocConfig) {
    let case_path = flag_value(args, "--case").unwrap_or_else(|| usage("completeness requires --case"));
    let case = read_case(Path::new(&case_path));
    let catalogue = load_catalogue(cfg);
    let completeness = compute_completeness(&case, &catalogue);
    match serde_json::to_string_pretty(&completeness) {
        Ok(s) => println!("{}", s),
        Err(e) => fail("completeness", e, 5),
    }
}

fn cmd_diff(rest: &[String]) {
    let [old, new] = rest else {
        usage("diff requires <old.md> <new.md>");
    };
    let ops = diff_lines(&read_text("diff", Path::new(old)), &read_text("diff", Path::new(new)));
    println!("{}", format_diff(&ops));
    let summary = DiffSummary::of(&ops);
    eprintln!(
        "{}",
        serde_json::json!({"tool":"diff", "same": summary.same, "added": summary.added, "deleted": summary.deleted})
    );
}

fn cmd_portal(rest: &[String]) {
    let [file] = rest else {
        usage("portal requires <file.md>");
    };
    println!("{}", to_portal_text(&read_text("portal", Path::new(file))));
}

fn cmd_templates(cfg: &CasedocConfig) {
    let catalogue = load_catalogue(cfg);
    for t in catalogue.templates().iter().filter(|t| t.archived_at.is_none()) {
        println!(
            "{}",
            serde_json::json!({
                "id": t.id,
                "category": t.category,
                "requiredFields": t.required_fields,
                "placeholders": TemplateCatalogue::placeholders(t)
            })
        );
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("casedoc=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = flag_value(&args, "--config").unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let pos = positionals(&args);
    let Some((command, rest)) = pos.split_first() else {
        usage("missing command");
    };

    let cfg = match load_config_or_default(Path::new(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", serde_json::json!({"tool":"load_config", "file": config_path, "error": e.to_string()}));
            std::process::exit(3);
        }
    };
    eprintln!(
        "{}",
        serde_json::json!({
            "tool":"load_config",
            "file": config_path,
            "status":"ok",
            "output_dir": cfg.output_dir()
        })
    );

    match command.as_str() {
        "generate" => cmd_generate(&args, &cfg),
        "completeness" => cmd_completeness(&args, &cfg),
        "diff" => cmd_diff(rest),
        "portal" => cmd_portal(rest),
        "templates" => cmd_templates(&cfg),
        other => usage(&format!("unknown command: {}", other)),
    }
}
