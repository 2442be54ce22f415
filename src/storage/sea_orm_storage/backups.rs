//! 备份存储操作

use std::collections::BTreeMap;

use super::{SeaOrmStorage, audit::insert_audit, now, phases::current_phase_in};
use crate::entity::backups::{self, Entity as Backups};
use crate::entity::evaluations::{self, Entity as Evaluations};
use crate::entity::votes::{self, Entity as Votes};
use crate::errors::{JuryError, Result};
use crate::models::{
    audit::entities::NewAuditEntry,
    backups::{
        entities::{Backup, BackupPayload, BackupSource, BackupType},
        responses::{BackupStatistics, RestoreBackupResponse, SourceCount},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

/// 写入一条备份，可在事务内调用
pub(super) async fn insert_backup<C: ConnectionTrait>(
    conn: &C,
    backup_type: BackupType,
    source: BackupSource,
    reason: String,
    payload: &BackupPayload,
    created_by: i64,
) -> Result<backups::Model> {
    let json = serde_json::to_string(payload)?;

    let model = backups::ActiveModel {
        backup_type: Set(backup_type.to_string()),
        source: Set(source.to_string()),
        reason: Set(reason),
        payload_size: Set(json.len() as i64),
        payload: Set(json),
        votes_count: Set(payload.votes.len() as i32),
        scores_count: Set(payload.evaluations.len() as i32),
        created_at: Set(now()),
        created_by: Set(created_by),
        restored_at: Set(None),
        restored_by: Set(None),
        ..Default::default()
    };

    model
        .insert(conn)
        .await
        .map_err(|e| JuryError::storage(format!("写入备份失败: {e}")))
}

impl SeaOrmStorage {
    /// 手动备份当前有效数据，不做任何变更
    pub async fn create_backup_impl(
        &self,
        backup_type: BackupType,
        reason: String,
        mut audit: NewAuditEntry,
    ) -> Result<Backup> {
        let txn = self.db.begin().await?;

        let mut payload = BackupPayload::default();
        if backup_type.includes_votes() {
            payload.votes = Votes::find()
                .filter(votes::Column::IsActive.eq(true))
                .order_by_asc(votes::Column::Id)
                .all(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("查询投票失败: {e}")))?;
        }
        if backup_type.includes_scores() {
            payload.evaluations = Evaluations::find()
                .filter(evaluations::Column::IsActive.eq(true))
                .order_by_asc(evaluations::Column::Id)
                .all(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("查询评分记录失败: {e}")))?;
        }

        let backup = insert_backup(
            &txn,
            backup_type,
            BackupSource::Manual,
            reason,
            &payload,
            audit.actor_id,
        )
        .await?;

        audit.affected_rows = i64::from(backup.votes_count) + i64::from(backup.scores_count);
        audit.details = Some(serde_json::json!({
            "backup_id": backup.id,
            "backup_type": backup_type,
        }));
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交备份事务失败: {e}")))?;

        Ok(backup.into_backup())
    }

    /// 恢复备份
    ///
    /// 按主键回放载荷中的行，覆盖主键或唯一键冲突的现有行；
    /// restored_at 只能设置一次，重复恢复返回 Conflict。
    pub async fn restore_backup_impl(
        &self,
        backup_id: i64,
        expected_type: Option<BackupType>,
        mut audit: NewAuditEntry,
    ) -> Result<RestoreBackupResponse> {
        let txn = self.db.begin().await?;

        let backup = Backups::find_by_id(backup_id)
            .one(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("查询备份失败: {e}")))?
            .ok_or_else(|| JuryError::not_found(format!("备份 {backup_id} 不存在")))?;

        if backup.restored_at.is_some() {
            return Err(JuryError::conflict(format!("备份 {backup_id} 已被恢复过")));
        }

        if let Some(expected) = expected_type {
            if expected.as_str() != backup.backup_type {
                return Err(JuryError::validation(format!(
                    "备份 {backup_id} 的类型为 {}，与请求的 {expected} 不符",
                    backup.backup_type
                )));
            }
        }

        let payload: BackupPayload = serde_json::from_str(&backup.payload)?;
        let now = now();
        // 非当前阶段的行只作为归档恢复，不重新生效
        let current = current_phase_in(&txn).await?.name;
        let mut archived = 0i64;

        for row in &payload.evaluations {
            // 主键冲突或 (评委, 候选人, 阶段) 冲突的行都被覆盖
            Evaluations::delete_many()
                .filter(
                    Condition::any()
                        .add(evaluations::Column::Id.eq(row.id))
                        .add(
                            Condition::all()
                                .add(evaluations::Column::EvaluatorId.eq(row.evaluator_id))
                                .add(evaluations::Column::CandidateId.eq(row.candidate_id))
                                .add(evaluations::Column::Phase.eq(row.phase.as_str())),
                        ),
                )
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("覆盖评分记录失败: {e}")))?;

            let mut model = row.clone().into_active_model().reset_all();
            if row.phase != current {
                model.is_active = Set(false);
                archived += 1;
            }
            Evaluations::insert(model)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("恢复评分记录失败: {e}")))?;
        }

        for row in &payload.votes {
            Votes::delete_by_id(row.id)
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("覆盖投票失败: {e}")))?;

            let mut model = row.clone().into_active_model().reset_all();
            if row.phase != current {
                model.is_active = Set(false);
                archived += 1;
            } else if row.is_active {
                // 同一阶段同一组合只保留一条有效投票
                Votes::update_many()
                    .col_expr(votes::Column::IsActive, Expr::value(false))
                    .col_expr(votes::Column::ResetAt, Expr::value(Some(now)))
                    .col_expr(votes::Column::ResetBy, Expr::value(Some(audit.actor_id)))
                    .col_expr(votes::Column::UpdatedAt, Expr::value(now))
                    .filter(votes::Column::EvaluatorId.eq(row.evaluator_id))
                    .filter(votes::Column::CandidateId.eq(row.candidate_id))
                    .filter(votes::Column::Phase.eq(row.phase.as_str()))
                    .filter(votes::Column::IsActive.eq(true))
                    .exec(&txn)
                    .await
                    .map_err(|e| JuryError::storage(format!("覆盖投票失败: {e}")))?;
            }

            Votes::insert(model)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("恢复投票失败: {e}")))?;
        }

        let marked = Backups::update_many()
            .col_expr(backups::Column::RestoredAt, Expr::value(Some(now)))
            .col_expr(backups::Column::RestoredBy, Expr::value(Some(audit.actor_id)))
            .filter(backups::Column::Id.eq(backup_id))
            .filter(backups::Column::RestoredAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("更新备份状态失败: {e}")))?;

        if marked.rows_affected == 0 {
            return Err(JuryError::conflict(format!("备份 {backup_id} 已被恢复过")));
        }

        let response = RestoreBackupResponse {
            backup_id,
            votes_restored: payload.votes.len() as i64,
            scores_restored: payload.evaluations.len() as i64,
        };

        audit.affected_rows = response.votes_restored + response.scores_restored;
        audit.details = Some(serde_json::json!({
            "backup_id": backup_id,
            "backup_type": backup.backup_type,
            "source": backup.source,
            "phase": current,
            "archived_rows": archived,
        }));
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交恢复事务失败: {e}")))?;

        Ok(response)
    }

    /// 通过 ID 获取备份
    pub async fn get_backup_impl(&self, id: i64) -> Result<Option<Backup>> {
        let result = Backups::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询备份失败: {e}")))?;

        Ok(result.map(|m| m.into_backup()))
    }

    /// 备份历史，按时间倒序
    pub async fn list_backups_impl(&self, limit: u64) -> Result<Vec<Backup>> {
        let result = Backups::find()
            .order_by_desc(backups::Column::CreatedAt)
            .order_by_desc(backups::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询备份历史失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_backup()).collect())
    }

    /// 备份统计
    pub async fn backup_statistics_impl(&self, recent_since: i64) -> Result<BackupStatistics> {
        let rows: Vec<(String, i64, i64, Option<i64>)> = Backups::find()
            .select_only()
            .column(backups::Column::Source)
            .column(backups::Column::PayloadSize)
            .column(backups::Column::CreatedAt)
            .column(backups::Column::RestoredAt)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询备份统计失败: {e}")))?;

        let mut by_source: BTreeMap<BackupSource, i64> = BTreeMap::new();
        let mut stats = BackupStatistics {
            total_backups: rows.len() as i64,
            recent_backups: 0,
            storage_size: 0,
            restorations: 0,
            by_source: Vec::new(),
        };

        for (source, size, created_at, restored_at) in rows {
            stats.storage_size += size;
            if created_at >= recent_since {
                stats.recent_backups += 1;
            }
            if restored_at.is_some() {
                stats.restorations += 1;
            }
            let source = source.parse().unwrap_or(BackupSource::Manual);
            *by_source.entry(source).or_default() += 1;
        }

        stats.by_source = by_source
            .into_iter()
            .map(|(source, count)| SourceCount { source, count })
            .collect();

        Ok(stats)
    }

    /// 删除早于给定时间且从未恢复过的备份
    pub async fn purge_backups_impl(&self, older_than: i64, mut audit: NewAuditEntry) -> Result<u64> {
        let txn = self.db.begin().await?;

        let expired = Backups::find()
            .filter(backups::Column::CreatedAt.lt(older_than))
            .filter(backups::Column::RestoredAt.is_null())
            .count(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("查询过期备份失败: {e}")))?;

        if expired == 0 {
            return Ok(0);
        }

        let deleted = Backups::delete_many()
            .filter(backups::Column::CreatedAt.lt(older_than))
            .filter(backups::Column::RestoredAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("清理过期备份失败: {e}")))?
            .rows_affected;

        audit.affected_rows = deleted as i64;
        audit.details = Some(serde_json::json!({ "older_than": older_than }));
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交清理事务失败: {e}")))?;

        Ok(deleted)
    }
}
