//! 重置存储操作
//!
//! 每次重置在一个事务内依次完成：读取阶段与锁状态、选出受影响行、
//! 写入备份、执行变更、写入审计。任一步失败整体回滚，备份写入失败时不会有任何删除。

use super::{
    SeaOrmStorage,
    audit::insert_audit,
    backups::insert_backup,
    now,
    phases::{current_phase_in, switch_phase_in},
};
use crate::entity::evaluations::{self, Entity as Evaluations};
use crate::entity::phases::Entity as Phases;
use crate::entity::votes::{self, Entity as Votes};
use crate::errors::{JuryError, Result};
use crate::models::{
    audit::entities::NewAuditEntry,
    backups::entities::{BackupPayload, BackupType},
    evaluations::entities::EvaluationStatus,
    resets::{entities::ResetCommand, responses::ResetOutcome},
};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};
use tracing::warn;

/// 受影响评分的筛选条件
fn evaluation_scope(command: &ResetCommand, phase: &str) -> Condition {
    let active = Condition::all().add(evaluations::Column::IsActive.eq(true));
    let submitted = evaluations::Column::Status.eq(EvaluationStatus::Submitted.as_str());

    match command {
        ResetCommand::Individual {
            evaluator_id,
            candidate_id,
        } => active
            .add(evaluations::Column::EvaluatorId.eq(*evaluator_id))
            .add(evaluations::Column::CandidateId.eq(*candidate_id)),
        ResetCommand::Candidate { candidate_id } => active
            .add(evaluations::Column::CandidateId.eq(*candidate_id))
            .add(submitted),
        ResetCommand::Jury { evaluator_id } => active
            .add(evaluations::Column::EvaluatorId.eq(*evaluator_id))
            .add(submitted),
        ResetCommand::PhaseTransition { .. } => {
            active.add(evaluations::Column::Phase.eq(phase))
        }
        ResetCommand::Full => Condition::all(),
    }
}

/// 受影响投票的筛选条件
fn vote_scope(command: &ResetCommand, phase: &str) -> Condition {
    let active = Condition::all().add(votes::Column::IsActive.eq(true));

    match command {
        ResetCommand::Individual {
            evaluator_id,
            candidate_id,
        } => active
            .add(votes::Column::EvaluatorId.eq(*evaluator_id))
            .add(votes::Column::CandidateId.eq(*candidate_id)),
        ResetCommand::Candidate { candidate_id } => {
            active.add(votes::Column::CandidateId.eq(*candidate_id))
        }
        ResetCommand::Jury { evaluator_id } => {
            active.add(votes::Column::EvaluatorId.eq(*evaluator_id))
        }
        ResetCommand::PhaseTransition { .. } => active.add(votes::Column::Phase.eq(phase)),
        ResetCommand::Full => active,
    }
}

async fn ensure_new_phase<C: ConnectionTrait>(conn: &C, current: &str, to_phase: &str) -> Result<()> {
    if to_phase == current {
        return Err(JuryError::conflict(format!("已处于阶段 {to_phase}")));
    }

    let exists = Phases::find_by_id(to_phase.to_string())
        .count(conn)
        .await
        .map_err(|e| JuryError::storage(format!("查询阶段失败: {e}")))?;
    if exists > 0 {
        return Err(JuryError::conflict(format!("阶段 {to_phase} 已存在")));
    }

    Ok(())
}

impl SeaOrmStorage {
    /// 执行重置
    pub async fn execute_reset_impl(
        &self,
        command: ResetCommand,
        mut audit: NewAuditEntry,
    ) -> Result<ResetOutcome> {
        let txn = self.db.begin().await?;

        let phase = current_phase_in(&txn).await?;
        if command.blocked_by_lock() && phase.locked {
            return Err(JuryError::conflict(format!(
                "阶段 {} 已锁定，不允许重置",
                phase.name
            )));
        }
        if let ResetCommand::PhaseTransition { to_phase } = &command {
            ensure_new_phase(&txn, &phase.name, to_phase).await?;
        }

        // 1. 选出受影响的行
        let payload = BackupPayload {
            evaluations: Evaluations::find()
                .filter(evaluation_scope(&command, &phase.name))
                .order_by_asc(evaluations::Column::Id)
                .all(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("查询评分记录失败: {e}")))?,
            votes: Votes::find()
                .filter(vote_scope(&command, &phase.name))
                .order_by_asc(votes::Column::Id)
                .all(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("查询投票失败: {e}")))?,
        };

        if matches!(command, ResetCommand::Individual { .. }) && payload.is_empty() {
            return Err(JuryError::not_found("没有可重置的评分或投票"));
        }

        // 2. 先写备份
        let reason = audit.reason.clone().unwrap_or_default();
        let backup = insert_backup(
            &txn,
            BackupType::Full,
            command.source(),
            reason,
            &payload,
            audit.actor_id,
        )
        .await?;

        // 3. 再变更
        let now = now();
        let evaluation_ids: Vec<i64> = payload.evaluations.iter().map(|e| e.id).collect();
        let vote_ids: Vec<i64> = payload.votes.iter().map(|v| v.id).collect();

        let evaluations_reset = if evaluation_ids.is_empty() {
            0
        } else if matches!(command, ResetCommand::PhaseTransition { .. }) {
            Evaluations::update_many()
                .col_expr(evaluations::Column::IsActive, Expr::value(false))
                .col_expr(evaluations::Column::UpdatedAt, Expr::value(now))
                .filter(evaluations::Column::Id.is_in(evaluation_ids))
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("归档评分记录失败: {e}")))?
                .rows_affected
        } else {
            Evaluations::delete_many()
                .filter(evaluations::Column::Id.is_in(evaluation_ids))
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("删除评分记录失败: {e}")))?
                .rows_affected
        };

        let votes_reset = if vote_ids.is_empty() {
            0
        } else {
            Votes::update_many()
                .col_expr(votes::Column::IsActive, Expr::value(false))
                .col_expr(votes::Column::ResetAt, Expr::value(Some(now)))
                .col_expr(votes::Column::ResetBy, Expr::value(Some(audit.actor_id)))
                .col_expr(votes::Column::UpdatedAt, Expr::value(now))
                .filter(votes::Column::Id.is_in(vote_ids))
                .exec(&txn)
                .await
                .map_err(|e| JuryError::storage(format!("重置投票失败: {e}")))?
                .rows_affected
        };

        if let ResetCommand::PhaseTransition { to_phase } = &command {
            switch_phase_in(&txn, to_phase).await?;
        }

        let outcome = ResetOutcome {
            votes_reset: votes_reset as i64,
            evaluations_reset: evaluations_reset as i64,
            backup_count: 1,
            backup_id: Some(backup.id),
        };

        // 4. 审计
        audit.affected_rows = outcome.affected_rows();
        audit.phase = Some(phase.name.clone());
        audit.details = Some(serde_json::json!({
            "backup_id": backup.id,
            "votes_reset": outcome.votes_reset,
            "evaluations_reset": outcome.evaluations_reset,
            "to_phase": match &command {
                ResetCommand::PhaseTransition { to_phase } => Some(to_phase.as_str()),
                _ => None,
            },
        }));
        insert_audit(&txn, audit).await?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交重置事务失败: {e}")))?;

        warn!(
            "Reset {:?} committed: {} evaluations, {} votes, backup {}",
            command, outcome.evaluations_reset, outcome.votes_reset, backup.id
        );

        Ok(outcome)
    }
}
