//! 分配存储操作

use std::collections::HashSet;

use super::{SeaOrmStorage, audit::insert_audit, now, phases::current_phase_in};
use crate::entity::assignments::{self, Entity as Assignments};
use crate::entity::evaluations::{self, Entity as Evaluations};
use crate::errors::{JuryError, Result};
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentMove, AssignmentPair},
        responses::ClearAssignmentsResult,
    },
    audit::entities::NewAuditEntry,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::OnConflict,
};

/// 分配是否存在，可在事务内调用
pub(super) async fn assignment_exists_in<C: ConnectionTrait>(
    conn: &C,
    evaluator_id: i64,
    candidate_id: i64,
) -> Result<bool> {
    let count = Assignments::find()
        .filter(assignments::Column::EvaluatorId.eq(evaluator_id))
        .filter(assignments::Column::CandidateId.eq(candidate_id))
        .count(conn)
        .await
        .map_err(|e| JuryError::storage(format!("查询分配失败: {e}")))?;

    Ok(count > 0)
}

/// 全部分配组合
pub(super) async fn assignment_pairs_in<C: ConnectionTrait>(
    conn: &C,
) -> Result<HashSet<(i64, i64)>> {
    let pairs: Vec<(i64, i64)> = Assignments::find()
        .select_only()
        .column(assignments::Column::EvaluatorId)
        .column(assignments::Column::CandidateId)
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| JuryError::storage(format!("查询分配失败: {e}")))?;

    Ok(pairs.into_iter().collect())
}

/// 持有当前阶段有效评分的组合，再平衡时不可迁移
pub(super) async fn pinned_pairs_in<C: ConnectionTrait>(conn: &C) -> Result<HashSet<(i64, i64)>> {
    let phase = current_phase_in(conn).await?.name;
    let pairs: Vec<(i64, i64)> = Evaluations::find()
        .select_only()
        .column(evaluations::Column::EvaluatorId)
        .column(evaluations::Column::CandidateId)
        .filter(evaluations::Column::IsActive.eq(true))
        .filter(evaluations::Column::Phase.eq(phase))
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| JuryError::storage(format!("查询评分记录失败: {e}")))?;

    Ok(pairs.into_iter().collect())
}

/// 插入一条分配，组合已存在时忽略；返回是否新增
async fn insert_assignment<C: ConnectionTrait>(
    conn: &C,
    pair: AssignmentPair,
    assigned_by: i64,
) -> Result<bool> {
    let model = assignments::ActiveModel {
        evaluator_id: Set(pair.evaluator_id),
        candidate_id: Set(pair.candidate_id),
        assigned_by: Set(Some(assigned_by)),
        created_at: Set(now()),
        ..Default::default()
    };

    let inserted = Assignments::insert(model)
        .on_conflict(
            OnConflict::columns([
                assignments::Column::EvaluatorId,
                assignments::Column::CandidateId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| JuryError::storage(format!("创建分配失败: {e}")))?;

    Ok(inserted > 0)
}

impl SeaOrmStorage {
    /// 列出分配
    pub async fn list_assignments_impl(
        &self,
        evaluator_id: Option<i64>,
        candidate_id: Option<i64>,
    ) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find();
        if let Some(evaluator_id) = evaluator_id {
            select = select.filter(assignments::Column::EvaluatorId.eq(evaluator_id));
        }
        if let Some(candidate_id) = candidate_id {
            select = select.filter(assignments::Column::CandidateId.eq(candidate_id));
        }

        let result = select
            .order_by_asc(assignments::Column::EvaluatorId)
            .order_by_asc(assignments::Column::CandidateId)
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询分配列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 批量写入分配；clear_existing 时先清空，清空与写入同一事务
    pub async fn apply_assignments_impl(
        &self,
        pairs: Vec<AssignmentPair>,
        clear_existing: bool,
        mut audit: NewAuditEntry,
    ) -> Result<u64> {
        let txn = self.db.begin().await?;

        let mut removed = 0;
        if clear_existing {
            removed = Assignments::delete_many()
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("清空分配失败: {e}")))?
                .rows_affected;
        }

        let mut created = 0;
        for pair in pairs {
            if insert_assignment(&txn, pair, audit.actor_id).await? {
                created += 1;
            }
        }

        audit.affected_rows = created as i64;
        if clear_existing {
            let mut details = audit.details.take().unwrap_or_else(|| serde_json::json!({}));
            details["assignments_cleared"] = serde_json::json!(removed);
            audit.details = Some(details);
        }
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交分配事务失败: {e}")))?;

        Ok(created)
    }

    /// 执行再平衡迁移；事务内重新检查，持有有效评分或目标已持有的组合跳过
    pub async fn apply_moves_impl(
        &self,
        moves: Vec<AssignmentMove>,
        mut audit: NewAuditEntry,
    ) -> Result<Vec<AssignmentMove>> {
        let txn = self.db.begin().await?;

        let pinned = pinned_pairs_in(&txn).await?;
        let mut applied = Vec::with_capacity(moves.len());

        for mv in moves {
            if pinned.contains(&(mv.from_evaluator_id, mv.candidate_id)) {
                continue;
            }
            if assignment_exists_in(&txn, mv.to_evaluator_id, mv.candidate_id).await? {
                continue;
            }

            let deleted = Assignments::delete_many()
                .filter(assignments::Column::EvaluatorId.eq(mv.from_evaluator_id))
                .filter(assignments::Column::CandidateId.eq(mv.candidate_id))
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("删除分配失败: {e}")))?;
            if deleted.rows_affected == 0 {
                continue;
            }

            let pair = AssignmentPair {
                evaluator_id: mv.to_evaluator_id,
                candidate_id: mv.candidate_id,
            };
            insert_assignment(&txn, pair, audit.actor_id).await?;
            applied.push(mv);
        }

        audit.affected_rows = applied.len() as i64;
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交再平衡事务失败: {e}")))?;

        Ok(applied)
    }

    /// 删除单条分配，可选级联删除评分
    pub async fn remove_assignment_impl(
        &self,
        evaluator_id: i64,
        candidate_id: i64,
        cascade_evaluations: bool,
        mut audit: NewAuditEntry,
    ) -> Result<bool> {
        let txn = self.db.begin().await?;

        let deleted = Assignments::delete_many()
            .filter(assignments::Column::EvaluatorId.eq(evaluator_id))
            .filter(assignments::Column::CandidateId.eq(candidate_id))
            .exec(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("删除分配失败: {e}")))?
            .rows_affected;

        if deleted == 0 {
            return Ok(false);
        }

        let mut evaluations_removed = 0;
        if cascade_evaluations {
            evaluations_removed = Evaluations::delete_many()
                .filter(evaluations::Column::EvaluatorId.eq(evaluator_id))
                .filter(evaluations::Column::CandidateId.eq(candidate_id))
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("删除评分记录失败: {e}")))?
                .rows_affected;
        }

        audit.affected_rows = (deleted + evaluations_removed) as i64;
        audit.details = Some(serde_json::json!({
            "cascade_evaluations": cascade_evaluations,
            "evaluations_removed": evaluations_removed,
        }));
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交删除分配事务失败: {e}")))?;

        Ok(true)
    }

    /// 清空全部分配
    pub async fn clear_assignments_impl(
        &self,
        cascade_evaluations: bool,
        mut audit: NewAuditEntry,
    ) -> Result<ClearAssignmentsResult> {
        let txn = self.db.begin().await?;

        let assignments_removed = Assignments::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("清空分配失败: {e}")))?
            .rows_affected;

        let mut evaluations_removed = 0;
        if cascade_evaluations {
            evaluations_removed = Evaluations::delete_many()
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("删除评分记录失败: {e}")))?
                .rows_affected;
        }

        audit.affected_rows = (assignments_removed + evaluations_removed) as i64;
        audit.details = Some(serde_json::json!({
            "cascade_evaluations": cascade_evaluations,
            "evaluations_removed": evaluations_removed,
        }));
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交清空分配事务失败: {e}")))?;

        Ok(ClearAssignmentsResult {
            assignments_removed,
            evaluations_removed,
        })
    }
}
