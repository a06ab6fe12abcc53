use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globwalk::GlobWalkerBuilder;
use serde::Deserialize;

use crate::error::{CatalogueError, GenerateError};
use crate::model::{Template, TemplateCategory};
use crate::render::placeholder_keys;

pub const DEFAULT_PA_PACK_TEMPLATE_ID: &str = "tmpl-auth-pa-pack-standard";

static DEFAULT_TEMPLATES_YAML: &str = include_str!("../templates/default_templates.yaml");

/// Ordered, read-only set of templates. Generation never mutates it.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalogue {
    templates: Vec<Template>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateFile {
    Many(Vec<Template>),
    One(Box<Template>),
}

impl TemplateCatalogue {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// The catalogue shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogueError> {
        let templates = parse_templates(DEFAULT_TEMPLATES_YAML)?;
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.active().find(|t| t.id == id)
    }

    pub fn first_in_category(&self, category: TemplateCategory) -> Option<&Template> {
        self.active().find(|t| t.category == category)
    }

    fn active(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter().filter(|t| t.archived_at.is_none())
    }

    /// Insert or replace by id. Replacement keeps the original catalogue position.
    pub fn upsert(&mut self, template: Template) {
        if let Some(slot) = self.templates.iter_mut().find(|t| t.id == template.id) {
            tracing::debug!(template_id = %template.id, "replacing catalogue template");
            *slot = template;
        } else {
            self.templates.push(template);
        }
    }

    /// Add every template found in `*.yaml` files matching `glob_pattern`.
    /// Files are read in sorted path order so later files win on id clashes.
    pub fn load_dir(&mut self, glob_pattern: &str) -> Result<usize, CatalogueError> {
        let mut loaded = 0usize;
        for path in enumerate_template_files(glob_pattern)? {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| CatalogueError::Read(format!("{}: {}", path.display(), e)))?;
            let templates = parse_templates(&raw).map_err(|e| match e {
                CatalogueError::Invalid(m) => CatalogueError::Invalid(format!("{}: {}", path.display(), m)),
                CatalogueError::Parse(m) | CatalogueError::Read(m) => {
                    CatalogueError::Parse(format!("{}: {}", path.display(), m))
                }
            })?;
            for t in templates {
                self.upsert(t);
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Placeholder keys a template body references, for authoring checks.
    pub fn placeholders(template: &Template) -> Vec<String> {
        placeholder_keys(&template.content)
    }
}

/// Parse one YAML document holding either a single template or a list of them.
pub fn parse_templates(raw: &str) -> Result<Vec<Template>, CatalogueError> {
    let parsed: TemplateFile =
        serde_yaml::from_str(raw).map_err(|e| CatalogueError::Parse(e.to_string()))?;
    let templates = match parsed {
        TemplateFile::Many(v) => v,
        TemplateFile::One(t) => vec![*t],
    };

    let mut ids = HashSet::new();
    for t in &templates {
        if t.id.trim().is_empty() {
            return Err(CatalogueError::Invalid("missing id".into()));
        }
        if t.content.trim().is_empty() {
            return Err(CatalogueError::Invalid(format!("empty content: {}", t.id)));
        }
        if !ids.insert(t.id.as_str()) {
            return Err(CatalogueError::Invalid(format!("duplicate id: {}", t.id)));
        }
    }
    Ok(templates)
}

fn enumerate_template_files(glob_pattern: &str) -> Result<Vec<PathBuf>, CatalogueError> {
    let (root, pat) = split_glob_base(glob_pattern);
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    // Bare `*.yaml` would match at any depth; only `**` recurses.
    let depth = if pat.contains("**") { usize::MAX } else { pat.split('/').count() };
    let mut paths: Vec<PathBuf> = GlobWalkerBuilder::from_patterns(&root, &[pat.as_str()])
        .case_insensitive(false)
        .follow_links(false)
        .max_depth(depth)
        .build()
        .map_err(|e| CatalogueError::Read(e.to_string()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .collect();

    paths.sort();
    paths.retain(|p| p.is_file());
    Ok(paths)
}

/// Split `./dir/sub/**/*.yaml` into the literal directory prefix and the glob tail.
fn split_glob_base(glob_pattern: &str) -> (PathBuf, String) {
    let is_glob = |s: &str| s.contains(&['*', '?', '[', '{'][..]);
    let mut base = PathBuf::new();
    let mut rest: Vec<&str> = Vec::new();
    for comp in glob_pattern.split('/') {
        if rest.is_empty() && !is_glob(comp) {
            if comp.is_empty() && base.as_os_str().is_empty() {
                base.push("/");
            } else if !comp.is_empty() {
                base.push(comp);
            }
        } else {
            rest.push(comp);
        }
    }
    if rest.is_empty() {
        // Plain path: treat it as a directory of yaml files.
        return (base, "*.yaml".to_string());
    }
    if base.as_os_str().is_empty() {
        base = Path::new(".").to_path_buf();
    }
    (base, rest.join("/"))
}

/// Shared template resolution: explicit override, then the kind's default id,
/// then the first active template of the category.
pub fn resolve_template<'a>(
    catalogue: &'a TemplateCatalogue,
    override_id: Option<&str>,
    default_id: &str,
    category: TemplateCategory,
) -> Result<&'a Template, GenerateError> {
    if let Some(id) = override_id {
        match catalogue.get(id) {
            Some(t) => return Ok(t),
            None => tracing::warn!(template_id = id, "template override not found, falling back"),
        }
    }
    catalogue
        .get(default_id)
        .or_else(|| catalogue.first_in_category(category))
        .ok_or(GenerateError::NoTemplate { category })
}

/// Reference template for completeness scoring.
pub fn default_pa_pack_template(catalogue: &TemplateCatalogue) -> Option<&Template> {
    catalogue
        .get(DEFAULT_PA_PACK_TEMPLATE_ID)
        .or_else(|| catalogue.first_in_category(TemplateCategory::Authorization))
}
