//! 评分记录实体
//!
//! 不设置外键：分配被清除后评分行保留为孤儿记录，由读取路径拒绝。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluator_id: i64,
    pub candidate_id: i64,
    pub phase: String,
    pub courage_score: i32,
    pub innovation_score: i32,
    pub implementation_score: i32,
    pub relevance_score: i32,
    pub visibility_score: i32,
    pub total_score: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub submitted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::evaluations::entities::{Evaluation, EvaluationStatus, Scores};

        Evaluation {
            id: self.id,
            evaluator_id: self.evaluator_id,
            candidate_id: self.candidate_id,
            phase: self.phase,
            scores: Scores {
                courage: self.courage_score,
                innovation: self.innovation_score,
                implementation: self.implementation_score,
                relevance: self.relevance_score,
                visibility: self.visibility_score,
            },
            total_score: self.total_score,
            comments: self.comments,
            status: self
                .status
                .parse::<EvaluationStatus>()
                .unwrap_or(EvaluationStatus::Draft),
            is_active: self.is_active,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
            submitted_at: self.submitted_at.map(super::ts),
        }
    }
}
