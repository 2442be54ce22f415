//! 审计日志，只追加；按时间清理是唯一的删除途径

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use super::audited;
use crate::errors::{JuryError, Result};
use crate::models::{
    audit::{
        entities::{AuditAction, AuditEntry, AuditScope, NewAuditEntry},
        requests::AuditListQuery,
        responses::{AuditListResponse, AuditStatistics},
    },
    auth::entities::{Actor, Capability},
    resets::responses::ResetHistoryItem,
};
use crate::storage::{AuditFilter, Storage};

const DEFAULT_LOOKUP_LIMIT: u64 = 100;
const MAX_LOOKUP_LIMIT: u64 = 1000;

#[derive(Clone)]
pub struct AuditService {
    storage: Arc<dyn Storage>,
    retention_days: i64,
}

fn lookup_limit(limit: Option<u64>) -> Option<u64> {
    Some(limit.unwrap_or(DEFAULT_LOOKUP_LIMIT).clamp(1, MAX_LOOKUP_LIMIT))
}

impl From<AuditEntry> for ResetHistoryItem {
    fn from(entry: AuditEntry) -> Self {
        Self {
            audit_id: entry.id,
            reset_at: entry.created_at,
            reset_type: entry.action.to_string(),
            user: entry.evaluator_id,
            candidate: entry.candidate_id,
            phase: entry.phase,
            initiated_by: entry.actor_id,
            reason: entry.reason,
            affected_rows: entry.affected_rows,
            success: entry.success,
        }
    }
}

impl AuditService {
    pub fn new(storage: Arc<dyn Storage>, retention_days: i64) -> Self {
        Self {
            storage,
            retention_days,
        }
    }

    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    // 追加一条审计记录
    pub async fn log(&self, entry: NewAuditEntry) -> Result<i64> {
        let id = self.storage.append_audit(entry).await?;
        debug!("Audit entry {} appended", id);
        Ok(id)
    }

    // 按操作者查询
    pub async fn get_by_actor(
        &self,
        actor: &Actor,
        actor_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<AuditEntry>> {
        actor.require(Capability::ViewAuditLog)?;
        self.storage
            .find_audit(AuditFilter {
                actor_id: Some(actor_id),
                limit: lookup_limit(limit),
                ..Default::default()
            })
            .await
    }

    // 按范围查询
    pub async fn get_by_scope(
        &self,
        actor: &Actor,
        scope: AuditScope,
        limit: Option<u64>,
    ) -> Result<Vec<AuditEntry>> {
        actor.require(Capability::ViewAuditLog)?;
        self.storage
            .find_audit(AuditFilter {
                scope: Some(scope),
                limit: lookup_limit(limit),
                ..Default::default()
            })
            .await
    }

    // 按动作查询
    pub async fn get_by_action(
        &self,
        actor: &Actor,
        action: AuditAction,
        limit: Option<u64>,
    ) -> Result<Vec<AuditEntry>> {
        actor.require(Capability::ViewAuditLog)?;
        self.storage
            .find_audit(AuditFilter {
                actions: vec![action],
                limit: lookup_limit(limit),
                ..Default::default()
            })
            .await
    }

    // 分页列出
    pub async fn list(&self, actor: &Actor, query: AuditListQuery) -> Result<AuditListResponse> {
        actor.require(Capability::ViewAuditLog)?;
        self.storage.list_audit(query).await
    }

    // 统计
    pub async fn statistics(&self, actor: &Actor) -> Result<AuditStatistics> {
        actor.require(Capability::ViewAuditLog)?;
        self.storage.audit_statistics().await
    }

    // 重置历史，由重置类审计记录派生
    pub async fn reset_history(
        &self,
        actor: &Actor,
        limit: Option<u64>,
    ) -> Result<Vec<ResetHistoryItem>> {
        actor.require(Capability::ViewAuditLog)?;
        let entries = self
            .storage
            .find_audit(AuditFilter {
                actions: AuditAction::RESETS.to_vec(),
                limit: lookup_limit(limit),
                ..Default::default()
            })
            .await?;
        Ok(entries.into_iter().map(ResetHistoryItem::from).collect())
    }

    // 删除早于 days 天的审计记录
    pub async fn clean_old_logs(&self, actor: &Actor, days: i64) -> Result<u64> {
        actor.require(Capability::ManageBackups)?;
        if days < 1 {
            return Err(JuryError::validation("保留天数必须大于 0"));
        }

        let older_than = (Utc::now() - Duration::days(days)).timestamp();
        let entry = NewAuditEntry::new(AuditAction::AuditLogCleaned, AuditScope::All, actor)
            .details(serde_json::json!({ "retention_days": days }));
        let deleted = audited(
            &self.storage,
            entry.clone(),
            self.storage.clean_audit(older_than, entry),
        )
        .await?;
        if deleted > 0 {
            warn!(
                "Deleted {} audit entries older than {} days (account {})",
                deleted, days, actor.account_id
            );
        }
        Ok(deleted)
    }
}
