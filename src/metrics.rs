//! Workspace dashboard figures derived from the audit log and case list.

use serde::{Deserialize, Serialize};

use crate::catalogue::TemplateCatalogue;
use crate::fields::{compute_completeness, CaseCompleteness};
use crate::model::{CaseRecord, CaseStatus};

/// Completeness below this flags a case on the dashboard.
pub const ATTENTION_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActorRole {
    #[default]
    Doctor,
    Nurse,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActionType {
    Create,
    Edit,
    Delete,
    Duplicate,
    Archive,
    Generate,
    QaAck,
    SaveVersion,
    StatusChange,
    Export,
    Copy,
    Import,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditEntityType {
    Case,
    Document,
    Template,
    Evidence,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: i64,
    #[serde(default)]
    pub actor_role: ActorRole,
    pub action_type: AuditActionType,
    pub entity_type: AuditEntityType,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceKpis {
    pub cases_total: usize,
    pub cases_in_progress: usize,
    pub cases_denied: usize,
    pub docs_generated: usize,
    pub versions_saved: usize,
    pub copies: usize,
    pub exports: usize,
    pub estimated_minutes_saved: usize,
}

fn document_actions(log: &[AuditLogEntry], action: AuditActionType) -> usize {
    log.iter()
        .filter(|e| e.entity_type == AuditEntityType::Document && e.action_type == action)
        .count()
}

pub fn compute_workspace_kpis(
    log: &[AuditLogEntry],
    cases_total: usize,
    cases_in_progress: usize,
    cases_denied: usize,
) -> WorkspaceKpis {
    let docs_generated = document_actions(log, AuditActionType::Generate);
    let versions_saved = document_actions(log, AuditActionType::SaveVersion);
    let copies = document_actions(log, AuditActionType::Copy);
    let exports = document_actions(log, AuditActionType::Export);

    WorkspaceKpis {
        cases_total,
        cases_in_progress,
        cases_denied,
        docs_generated,
        versions_saved,
        copies,
        exports,
        // minutes per action: generate 8, copy 2, export 2, save 1
        estimated_minutes_saved: docs_generated * 8 + copies * 2 + exports * 2 + versions_saved,
    }
}

/// Non-archived case count per status, in workflow order.
pub fn case_pipeline_counts(cases: &[CaseRecord]) -> Vec<(CaseStatus, usize)> {
    CaseStatus::ALL
        .iter()
        .map(|s| (*s, cases.iter().filter(|c| c.archived_at.is_none() && c.status == *s).count()))
        .collect()
}

/// KPIs over active cases: drafts count as in progress, appeals as denied.
pub fn kpis_for_cases(log: &[AuditLogEntry], cases: &[CaseRecord]) -> WorkspaceKpis {
    let active: Vec<&CaseRecord> = cases.iter().filter(|c| c.archived_at.is_none()).collect();
    let in_progress = active
        .iter()
        .filter(|c| matches!(c.status, CaseStatus::Draft | CaseStatus::InProgress))
        .count();
    let denied = active.iter().filter(|c| c.status.requires_denial_text()).count();
    compute_workspace_kpis(log, active.len(), in_progress, denied)
}

/// Active cases that are denied, under appeal, or below the completeness threshold.
pub fn cases_needing_attention<'a>(
    cases: &'a [CaseRecord],
    catalogue: &TemplateCatalogue,
) -> Vec<(&'a CaseRecord, CaseCompleteness)> {
    cases
        .iter()
        .filter(|c| c.archived_at.is_none())
        .map(|c| (c, compute_completeness(c, catalogue)))
        .filter(|(c, comp)| c.status.requires_denial_text() || comp.percent < ATTENTION_THRESHOLD)
        .collect()
}
