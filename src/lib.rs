//! Local-first clinical documentation drafts: template rendering, per-kind
//! document builders, missing-field checks, evidence footnotes, line diffs and
//! portal-safe plain text. Everything is pure and deterministic over the inputs
//! it is handed; persistence belongs to the caller.

pub mod catalogue;
pub mod citations;
pub mod config;
pub mod diff;
pub mod emit;
pub mod error;
pub mod fields;
pub mod generate;
pub mod metrics;
pub mod model;
pub mod narrative;
pub mod portal;
pub mod render;
pub mod versions;

pub use catalogue::{default_pa_pack_template, parse_templates, resolve_template, TemplateCatalogue, DEFAULT_PA_PACK_TEMPLATE_ID};
pub use citations::{build_citations, evidence_deep_link, CitationBlock, EvidenceLookup};
pub use config::{load_config, load_config_or_default, parse_config, CasedocConfig};
pub use diff::{diff_lines, format_diff, DiffOp, DiffSummary, DiffTag};
pub use emit::{emit_document, sha256_hex, EmitPaths};
pub use error::{CatalogueError, ConfigError, EmitError, GenerateError};
pub use fields::{compute_completeness, is_field_missing, missing_fields, CaseCompleteness, CompletenessTone};
pub use generate::{generate_document, generate_for_case, CaseProvider, GenerationRequest};
pub use metrics::{case_pipeline_counts, cases_needing_attention, compute_workspace_kpis, kpis_for_cases, AuditLogEntry, WorkspaceKpis};
pub use model::*;
pub use portal::to_portal_text;
pub use render::{placeholder_keys, render_template, RenderContext};
pub use versions::{DocumentArtifact, DocumentVersion};
