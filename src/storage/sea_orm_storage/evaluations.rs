//! 评分存储操作

use super::{
    SeaOrmStorage,
    assignments::{assignment_exists_in, assignment_pairs_in},
    is_unique_violation, now,
    phases::current_phase_in,
};
use crate::entity::evaluations::{self, Entity as Evaluations};
use crate::errors::{JuryError, Result};
use crate::models::evaluations::entities::{Evaluation, EvaluationStatus, ValidatedEvaluation};
use crate::storage::EvaluationFilter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};

fn already_submitted(evaluator_id: i64, candidate_id: i64) -> JuryError {
    JuryError::conflict(format!(
        "评委 {evaluator_id} 已提交对候选人 {candidate_id} 的评分"
    ))
}

/// 按胜出记录的状态选择冲突错误
fn write_conflict(evaluator_id: i64, candidate_id: i64, winner_status: Option<&str>) -> JuryError {
    if winner_status == Some(EvaluationStatus::Draft.as_str()) {
        JuryError::conflict(format!(
            "评委 {evaluator_id} 对候选人 {candidate_id} 的草稿正被同时写入，请重试"
        ))
    } else {
        already_submitted(evaluator_id, candidate_id)
    }
}

impl SeaOrmStorage {
    /// 插入撞上唯一索引时，读取胜出的记录区分已提交与草稿
    async fn concurrent_write_conflict(&self, evaluator_id: i64, candidate_id: i64) -> JuryError {
        let phase = match current_phase_in(&self.db).await {
            Ok(phase) => phase.name,
            Err(err) => return err,
        };
        let winner = Evaluations::find()
            .filter(evaluations::Column::EvaluatorId.eq(evaluator_id))
            .filter(evaluations::Column::CandidateId.eq(candidate_id))
            .filter(evaluations::Column::Phase.eq(phase))
            .one(&self.db)
            .await;

        match winner {
            Ok(row) => write_conflict(
                evaluator_id,
                candidate_id,
                row.as_ref().map(|r| r.status.as_str()),
            ),
            Err(e) => JuryError::storage(format!("查询评分记录失败: {e}")),
        }
    }

    /// 保存评分
    ///
    /// 同一事务内：校验分配存在、读取当前阶段、检查已有记录后写入。
    /// 已提交的记录不可再次写入；并发提交由唯一索引与带状态条件的更新兜底。
    pub async fn save_evaluation_impl(&self, input: ValidatedEvaluation) -> Result<Evaluation> {
        let evaluator_id = input.evaluator_id;
        let candidate_id = input.candidate_id;
        let txn = self.db.begin().await?;

        if !assignment_exists_in(&txn, evaluator_id, candidate_id).await? {
            return Err(JuryError::not_found(format!(
                "评委 {evaluator_id} 未被分配候选人 {candidate_id}"
            )));
        }

        let phase = current_phase_in(&txn).await?.name;
        let now = now();
        let submitted = input.status == EvaluationStatus::Submitted;
        let submitted_at = submitted.then_some(now);

        let existing = Evaluations::find()
            .filter(evaluations::Column::EvaluatorId.eq(evaluator_id))
            .filter(evaluations::Column::CandidateId.eq(candidate_id))
            .filter(evaluations::Column::Phase.eq(phase.as_str()))
            .one(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("查询评分记录失败: {e}")))?;

        let id = match existing {
            Some(row) if row.status == EvaluationStatus::Submitted.as_str() => {
                return Err(already_submitted(evaluator_id, candidate_id));
            }
            Some(row) => {
                // 仅当记录仍为草稿时更新
                let result = Evaluations::update_many()
                    .col_expr(evaluations::Column::CourageScore, Expr::value(input.scores.courage))
                    .col_expr(
                        evaluations::Column::InnovationScore,
                        Expr::value(input.scores.innovation),
                    )
                    .col_expr(
                        evaluations::Column::ImplementationScore,
                        Expr::value(input.scores.implementation),
                    )
                    .col_expr(
                        evaluations::Column::RelevanceScore,
                        Expr::value(input.scores.relevance),
                    )
                    .col_expr(
                        evaluations::Column::VisibilityScore,
                        Expr::value(input.scores.visibility),
                    )
                    .col_expr(evaluations::Column::TotalScore, Expr::value(input.total_score))
                    .col_expr(evaluations::Column::Comments, Expr::value(input.comments.clone()))
                    .col_expr(evaluations::Column::Status, Expr::value(input.status.as_str()))
                    .col_expr(evaluations::Column::IsActive, Expr::value(true))
                    .col_expr(evaluations::Column::UpdatedAt, Expr::value(now))
                    .col_expr(evaluations::Column::SubmittedAt, Expr::value(submitted_at))
                    .filter(evaluations::Column::Id.eq(row.id))
                    .filter(evaluations::Column::Status.eq(EvaluationStatus::Draft.as_str()))
                    .exec(&txn)
                    .await
                    .map_err(|e| JuryError::storage(format!("更新评分失败: {e}")))?;

                if result.rows_affected == 0 {
                    return Err(already_submitted(evaluator_id, candidate_id));
                }
                row.id
            }
            None => {
                let model = evaluations::ActiveModel {
                    evaluator_id: Set(evaluator_id),
                    candidate_id: Set(candidate_id),
                    phase: Set(phase),
                    courage_score: Set(input.scores.courage),
                    innovation_score: Set(input.scores.innovation),
                    implementation_score: Set(input.scores.implementation),
                    relevance_score: Set(input.scores.relevance),
                    visibility_score: Set(input.scores.visibility),
                    total_score: Set(input.total_score),
                    comments: Set(input.comments),
                    status: Set(input.status.to_string()),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    submitted_at: Set(submitted_at),
                    ..Default::default()
                };

                match model.insert(&txn).await {
                    Ok(created) => created.id,
                    Err(e) if is_unique_violation(&e) => {
                        // 并发写入抢先落库，回滚后按胜出记录的状态报告冲突
                        txn.rollback()
                            .await
                            .map_err(|e| JuryError::storage(format!("回滚评分事务失败: {e}")))?;
                        return Err(self.concurrent_write_conflict(evaluator_id, candidate_id).await);
                    }
                    Err(e) => return Err(JuryError::storage(format!("创建评分失败: {e}"))),
                }
            }
        };

        let saved = Evaluations::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("查询评分记录失败: {e}")))?
            .ok_or_else(|| JuryError::storage(format!("评分记录 {id} 写入后丢失")))?;

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交评分事务失败: {e}")))?;

        Ok(saved.into_evaluation())
    }

    /// 获取当前阶段的有效评分；对应分配已不存在时拒绝读取
    pub async fn get_evaluation_impl(
        &self,
        evaluator_id: i64,
        candidate_id: i64,
    ) -> Result<Option<Evaluation>> {
        let phase = current_phase_in(&self.db).await?.name;

        let Some(row) = Evaluations::find()
            .filter(evaluations::Column::EvaluatorId.eq(evaluator_id))
            .filter(evaluations::Column::CandidateId.eq(candidate_id))
            .filter(evaluations::Column::Phase.eq(phase))
            .filter(evaluations::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询评分记录失败: {e}")))?
        else {
            return Ok(None);
        };

        if !assignment_exists_in(&self.db, evaluator_id, candidate_id).await? {
            return Err(JuryError::conflict(format!(
                "评分记录 {} 缺少对应分配（评委 {evaluator_id}，候选人 {candidate_id}）",
                row.id
            )));
        }

        Ok(Some(row.into_evaluation()))
    }

    /// 列出当前阶段仍有分配支撑的有效评分，孤儿记录不参与任何统计
    pub async fn list_evaluations_impl(&self, filter: EvaluationFilter) -> Result<Vec<Evaluation>> {
        let phase = current_phase_in(&self.db).await?.name;
        let mut select = Evaluations::find()
            .filter(evaluations::Column::IsActive.eq(true))
            .filter(evaluations::Column::Phase.eq(phase));
        if let Some(evaluator_id) = filter.evaluator_id {
            select = select.filter(evaluations::Column::EvaluatorId.eq(evaluator_id));
        }
        if let Some(candidate_id) = filter.candidate_id {
            select = select.filter(evaluations::Column::CandidateId.eq(candidate_id));
        }
        if filter.submitted_only {
            select = select
                .filter(evaluations::Column::Status.eq(EvaluationStatus::Submitted.as_str()));
        }

        let rows = select
            .order_by_asc(evaluations::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询评分记录失败: {e}")))?;

        let assigned = assignment_pairs_in(&self.db).await?;

        Ok(rows
            .into_iter()
            .filter(|row| assigned.contains(&(row.evaluator_id, row.candidate_id)))
            .map(|row| row.into_evaluation())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_conflict_reports_draft_winner() {
        let err = write_conflict(3, 9, Some("draft"));
        assert!(matches!(err, JuryError::Conflict(_)));
        assert!(err.message().contains("草稿"));
    }

    #[test]
    fn test_write_conflict_reports_submitted_winner() {
        let err = write_conflict(3, 9, Some("submitted"));
        assert!(err.message().contains("已提交"));

        // 胜出记录已被清除时按已提交处理
        let err = write_conflict(3, 9, None);
        assert!(err.message().contains("已提交"));
    }
}
