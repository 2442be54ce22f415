//! 审计日志存储操作
//!
//! 只追加；唯一的删除路径是按时间清理。

use std::collections::BTreeMap;

use super::{SeaOrmStorage, now};
use crate::entity::audit_log::{self, Entity as AuditLog};
use crate::errors::{JuryError, Result};
use crate::models::{
    PaginationInfo,
    audit::{
        entities::{AuditAction, AuditEntry, NewAuditEntry},
        requests::AuditListQuery,
        responses::{ActionCount, AuditListResponse, AuditStatistics},
    },
};
use crate::storage::AuditFilter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 写入一条审计记录，可在事务内调用
pub(super) async fn insert_audit<C: ConnectionTrait>(conn: &C, entry: NewAuditEntry) -> Result<i64> {
    let details = entry
        .details
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let model = audit_log::ActiveModel {
        action: Set(entry.action.to_string()),
        scope: Set(entry.scope.to_string()),
        actor_id: Set(entry.actor_id),
        actor_role: Set(entry.actor_role),
        evaluator_id: Set(entry.evaluator_id),
        candidate_id: Set(entry.candidate_id),
        phase: Set(entry.phase),
        affected_rows: Set(entry.affected_rows),
        reason: Set(entry.reason),
        details: Set(details),
        success: Set(entry.success),
        created_at: Set(now()),
        ..Default::default()
    };

    let result = model
        .insert(conn)
        .await
        .map_err(|e| JuryError::storage(format!("写入审计日志失败: {e}")))?;

    Ok(result.id)
}

impl SeaOrmStorage {
    /// 按条件查询审计记录，按时间倒序
    pub async fn find_audit_impl(&self, filter: AuditFilter) -> Result<Vec<AuditEntry>> {
        let mut select = AuditLog::find();
        if let Some(actor_id) = filter.actor_id {
            select = select.filter(audit_log::Column::ActorId.eq(actor_id));
        }
        if let Some(scope) = filter.scope {
            select = select.filter(audit_log::Column::Scope.eq(scope.to_string()));
        }
        if !filter.actions.is_empty() {
            select = select.filter(
                audit_log::Column::Action
                    .is_in(filter.actions.iter().map(|a| a.to_string()).collect::<Vec<_>>()),
            );
        }
        if let Some(limit) = filter.limit {
            select = select.limit(limit);
        }

        let result = select
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询审计日志失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_audit_entry()).collect())
    }

    /// 分页列出审计记录
    pub async fn list_audit_impl(&self, query: AuditListQuery) -> Result<AuditListResponse> {
        let page = query.pagination.page();
        let size = query.pagination.size();

        let mut select = AuditLog::find();
        if let Some(action) = query.action {
            select = select.filter(audit_log::Column::Action.eq(action.to_string()));
        }
        if let Some(scope) = query.scope {
            select = select.filter(audit_log::Column::Scope.eq(scope.to_string()));
        }
        if let Some(actor_id) = query.actor_id {
            select = select.filter(audit_log::Column::ActorId.eq(actor_id));
        }

        let paginator = select
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| JuryError::storage(format!("查询审计日志总数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| JuryError::storage(format!("查询审计日志失败: {e}")))?;

        Ok(AuditListResponse {
            items: items.into_iter().map(|m| m.into_audit_entry()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 审计统计
    pub async fn audit_statistics_impl(&self) -> Result<AuditStatistics> {
        let rows: Vec<(String, bool)> = AuditLog::find()
            .select_only()
            .column(audit_log::Column::Action)
            .column(audit_log::Column::Success)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询审计统计失败: {e}")))?;

        let mut by_action: BTreeMap<AuditAction, i64> = BTreeMap::new();
        let mut failures = 0;
        for (action, success) in &rows {
            let action = action.parse().unwrap_or(AuditAction::Unknown);
            *by_action.entry(action).or_default() += 1;
            if !success {
                failures += 1;
            }
        }

        Ok(AuditStatistics {
            total: rows.len() as i64,
            failures,
            by_action: by_action
                .into_iter()
                .map(|(action, count)| ActionCount { action, count })
                .collect(),
        })
    }

    /// 删除早于给定时间的审计记录，并在同一事务内记录本次清理
    pub async fn clean_audit_impl(&self, older_than: i64, mut audit: NewAuditEntry) -> Result<u64> {
        let txn = self.db.begin().await?;

        let deleted = AuditLog::delete_many()
            .filter(audit_log::Column::CreatedAt.lt(older_than))
            .exec(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("清理审计日志失败: {e}")))?
            .rows_affected;

        if deleted == 0 {
            return Ok(0);
        }

        audit.affected_rows = deleted as i64;
        let mut details = audit.details.take().unwrap_or_else(|| serde_json::json!({}));
        details["older_than"] = serde_json::json!(older_than);
        audit.details = Some(details);
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交清理事务失败: {e}")))?;

        Ok(deleted)
    }
}
