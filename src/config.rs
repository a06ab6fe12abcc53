use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "casedoc.yaml";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CasedocConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub templates: Option<TemplatesSection>,
    #[serde(default)]
    pub evidence: Option<EvidenceSection>,
    #[serde(default)]
    pub outputs: Option<OutputsSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplatesSection {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputsSection {
    pub dir: Option<String>,
}

/// Parse and validate a workspace config file.
pub fn load_config(path: &Path) -> Result<CasedocConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
    parse_config(&raw)
}

/// Like [`load_config`], but a file that does not exist yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<CasedocConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(CasedocConfig::default());
    }
    load_config(path)
}

pub fn parse_config(raw: &str) -> Result<CasedocConfig, ConfigError> {
    let cfg: CasedocConfig = serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;

    if cfg.id.trim().is_empty() {
        return Err(ConfigError::Invalid("missing id".into()));
    }
    // A section that is present must say something.
    if matches!(&cfg.templates, Some(t) if blank(t.dir.as_deref())) {
        return Err(ConfigError::Invalid("templates.dir is empty".into()));
    }
    if matches!(&cfg.evidence, Some(e) if blank(e.path.as_deref())) {
        return Err(ConfigError::Invalid("evidence.path is empty".into()));
    }
    if matches!(&cfg.outputs, Some(o) if blank(o.dir.as_deref())) {
        return Err(ConfigError::Invalid("outputs.dir is empty".into()));
    }

    Ok(cfg)
}

fn blank(v: Option<&str>) -> bool {
    v.map_or(true, |s| s.trim().is_empty())
}

impl CasedocConfig {
    pub fn templates_glob(&self) -> Option<String> {
        self.templates.as_ref().and_then(|t| t.dir.clone())
    }
    pub fn evidence_path(&self) -> Option<String> {
        self.evidence.as_ref().and_then(|e| e.path.clone())
    }
    pub fn output_dir(&self) -> String {
        self.outputs
            .as_ref()
            .and_then(|o| o.dir.clone())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())
    }
}
