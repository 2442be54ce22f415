//! 审计日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub action: String,
    pub scope: String,
    pub actor_id: i64,
    pub actor_role: String,
    pub evaluator_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub phase: Option<String>,
    pub affected_rows: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    pub success: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_audit_entry(self) -> crate::models::audit::entities::AuditEntry {
        use crate::models::audit::entities::{AuditAction, AuditEntry, AuditScope};

        AuditEntry {
            id: self.id,
            action: self
                .action
                .parse::<AuditAction>()
                .unwrap_or(AuditAction::Unknown),
            scope: self
                .scope
                .parse::<AuditScope>()
                .unwrap_or(AuditScope::All),
            actor_id: self.actor_id,
            actor_role: self.actor_role,
            evaluator_id: self.evaluator_id,
            candidate_id: self.candidate_id,
            phase: self.phase,
            affected_rows: self.affected_rows,
            reason: self.reason,
            details: self.details.and_then(|d| serde_json::from_str(&d).ok()),
            success: self.success,
            created_at: super::ts(self.created_at),
        }
    }
}
