use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::auth::entities::Actor;

define_string_enum! {
    /// 审计动作
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
    pub enum AuditAction {
        IndividualReset => "individual_reset",
        BulkCandidateReset => "bulk_candidate_reset",
        BulkJuryReset => "bulk_jury_reset",
        PhaseTransition => "phase_transition",
        FullReset => "full_reset",
        BackupCreated => "backup_created",
        BackupRestored => "backup_restored",
        BackupsPurged => "backups_purged",
        AuditLogCleaned => "audit_log_cleaned",
        AssignmentsDistributed => "assignments_distributed",
        AssignmentsRebalanced => "assignments_rebalanced",
        AssignmentsCleared => "assignments_cleared",
        AssignmentsCreated => "assignments_created",
        AssignmentRemoved => "assignment_removed",
        PhaseLocked => "phase_locked",
        PhaseUnlocked => "phase_unlocked",
        Unknown => "unknown",
    }
}

impl AuditAction {
    /// 重置类动作
    pub const RESETS: &'static [AuditAction] = &[
        AuditAction::IndividualReset,
        AuditAction::BulkCandidateReset,
        AuditAction::BulkJuryReset,
        AuditAction::PhaseTransition,
        AuditAction::FullReset,
    ];
}

define_string_enum! {
    /// 受影响范围
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
    pub enum AuditScope {
        Individual => "individual",
        Evaluator => "evaluator",
        Candidate => "candidate",
        Phase => "phase",
        All => "all",
    }
}

// 审计日志条目，只追加
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct AuditEntry {
    pub id: i64,
    pub action: AuditAction,
    pub scope: AuditScope,
    pub actor_id: i64,
    pub actor_role: String,
    pub evaluator_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub phase: Option<String>,
    pub affected_rows: i64,
    pub reason: Option<String>,
    pub details: Option<serde_json::Value>,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

/// 待写入的审计条目
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub scope: AuditScope,
    pub actor_id: i64,
    pub actor_role: String,
    pub evaluator_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub phase: Option<String>,
    pub affected_rows: i64,
    pub reason: Option<String>,
    pub details: Option<serde_json::Value>,
    pub success: bool,
}

impl NewAuditEntry {
    pub fn new(action: AuditAction, scope: AuditScope, actor: &Actor) -> Self {
        Self {
            action,
            scope,
            actor_id: actor.account_id,
            actor_role: actor.role_label(),
            evaluator_id: None,
            candidate_id: None,
            phase: None,
            affected_rows: 0,
            reason: None,
            details: None,
            success: true,
        }
    }

    pub fn evaluator(mut self, evaluator_id: Option<i64>) -> Self {
        self.evaluator_id = evaluator_id;
        self
    }

    pub fn candidate(mut self, candidate_id: Option<i64>) -> Self {
        self.candidate_id = candidate_id;
        self
    }

    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    pub fn reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// 标记为失败，并把错误写入 details
    pub fn failed(mut self, error: &str) -> Self {
        self.success = false;
        self.affected_rows = 0;
        self.details = Some(serde_json::json!({ "error": error }));
        self
    }
}
