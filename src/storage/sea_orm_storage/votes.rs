//! 投票存储操作

use super::{
    SeaOrmStorage, assignments::assignment_exists_in, now, phases::current_phase_in,
};
use crate::entity::votes::{self, Entity as Votes};
use crate::errors::{JuryError, Result};
use crate::models::votes::entities::Vote;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 投票：当前阶段同一组合只保留一条有效投票
    pub async fn cast_vote_impl(
        &self,
        evaluator_id: i64,
        candidate_id: i64,
        rating: i32,
        comments: Option<String>,
    ) -> Result<Vote> {
        let txn = self.db.begin().await?;

        if !assignment_exists_in(&txn, evaluator_id, candidate_id).await? {
            return Err(JuryError::not_found(format!(
                "评委 {evaluator_id} 未被分配候选人 {candidate_id}"
            )));
        }

        let phase = current_phase_in(&txn).await?.name;
        let now = now();

        let existing = Votes::find()
            .filter(votes::Column::EvaluatorId.eq(evaluator_id))
            .filter(votes::Column::CandidateId.eq(candidate_id))
            .filter(votes::Column::Phase.eq(phase.as_str()))
            .filter(votes::Column::IsActive.eq(true))
            .one(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("查询投票失败: {e}")))?;

        let saved = match existing {
            Some(row) => {
                let mut model: votes::ActiveModel = row.into();
                model.rating = Set(rating);
                model.comments = Set(comments);
                model.updated_at = Set(now);
                model
                    .update(&txn)
                    .await
                    .map_err(|e| JuryError::storage(format!("更新投票失败: {e}")))?
            }
            None => votes::ActiveModel {
                evaluator_id: Set(evaluator_id),
                candidate_id: Set(candidate_id),
                phase: Set(phase),
                rating: Set(rating),
                comments: Set(comments),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                reset_at: Set(None),
                reset_by: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| JuryError::storage(format!("创建投票失败: {e}")))?,
        };

        txn.commit()
            .await
            .map_err(|e| JuryError::storage(format!("提交投票事务失败: {e}")))?;

        Ok(saved.into_vote())
    }

    /// 获取当前阶段的有效投票
    pub async fn get_vote_impl(&self, evaluator_id: i64, candidate_id: i64) -> Result<Option<Vote>> {
        let phase = current_phase_in(&self.db).await?.name;

        let result = Votes::find()
            .filter(votes::Column::EvaluatorId.eq(evaluator_id))
            .filter(votes::Column::CandidateId.eq(candidate_id))
            .filter(votes::Column::Phase.eq(phase))
            .filter(votes::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询投票失败: {e}")))?;

        Ok(result.map(|m| m.into_vote()))
    }

    /// 通过 ID 获取投票
    pub async fn get_vote_by_id_impl(&self, id: i64) -> Result<Option<Vote>> {
        let result = Votes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| JuryError::storage(format!("查询投票失败: {e}")))?;

        Ok(result.map(|m| m.into_vote()))
    }
}
