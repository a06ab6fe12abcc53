use thiserror::Error;

use crate::model::TemplateCategory;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// The catalogue holds nothing usable for the category. A setup defect, not a case defect.
    #[error("NoTemplate: no template available for category '{category}'")]
    NoTemplate { category: TemplateCategory },
    #[error("CaseNotFound: {0}")]
    CaseNotFound(String),
}

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Failed to read template file: {0}")]
    Read(String),
    #[error("Failed to parse template file: {0}")]
    Parse(String),
    #[error("Invalid template: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read casedoc.yaml: {0}")]
    Read(String),
    #[error("Failed to parse casedoc.yaml: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("WriteFailed: {0}")]
    WriteFailed(String),
}
